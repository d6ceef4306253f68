//! Patch files and render settings for piano roll sequencer modules.
//!
//! # Features
//!
//! - **Patch Files**: Save and load a module's state in a JSON envelope
//!   naming its model
//! - **Render Settings**: TOML settings for driving a patch offline
//!
//! # Example
//!
//! ```rust,no_run
//! use pianoroll_config::{PatchFile, RenderConfig};
//! use pianoroll_registry::ModelRegistry;
//!
//! let registry = ModelRegistry::new();
//!
//! // Write a fresh patch and read it back
//! let patch = PatchFile::fresh(&registry, "piano-roll").unwrap();
//! patch.save("bassline.json").unwrap();
//! let module = PatchFile::load("bassline.json").unwrap().instantiate(&registry).unwrap();
//!
//! // Render settings with every field defaulted
//! let config = RenderConfig::load("render.toml").unwrap_or_default();
//! ```

mod error;
mod patch;
mod render;

pub use error::ConfigError;
pub use patch::{PATCH_VERSION, PatchFile};
pub use render::RenderConfig;
