//! Model registry and factory for piano roll sequencer modules.
//!
//! A host builds one [`ModelRegistry`] at start-up and creates module
//! instances from it by slug. Nothing here is global: two registries are
//! independent, and a host may register its own models next to the built-ins.
//!
//! # Features
//!
//! - **Model Discovery**: List every model with its jack layout
//! - **Factory Pattern**: Create modules by slug at runtime
//! - **Tag System**: Models carry browser tags (sequencer, utility)
//!
//! # Example
//!
//! ```rust
//! use pianoroll_core::Module;
//! use pianoroll_registry::{ModelRegistry, ModelTag};
//!
//! let registry = ModelRegistry::new();
//!
//! for model in registry.all_models() {
//!     println!("{}: {}", model.slug, model.description);
//! }
//!
//! let module = registry.create("piano-roll").expect("built-in model");
//! assert!(module.data_to_json().get("patterns").is_some());
//!
//! assert_eq!(registry.models_with_tag(ModelTag::Sequencer).len(), 2);
//! ```

pub mod song_roll;

pub use song_roll::SongRoll;

use pianoroll_core::{Input, Module, Output, PianoRoll, Ports};

/// Browser tag of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTag {
    /// Step sequencers and pattern recorders
    Sequencer,
    /// Clock and transport helpers
    Utility,
}

impl ModelTag {
    /// Returns a human-readable name for the tag.
    pub const fn name(&self) -> &'static str {
        match self {
            ModelTag::Sequencer => "Sequencer",
            ModelTag::Utility => "Utility",
        }
    }
}

/// Describes a model in the registry.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    /// Unique identifier (lowercase, hyphenated). Never changes once published.
    pub slug: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the model.
    pub description: &'static str,
    /// Browser tags.
    pub tags: &'static [ModelTag],
    /// Input jack labels, in port index order.
    pub inputs: &'static [&'static str],
    /// Output jack labels, in port index order.
    pub outputs: &'static [&'static str],
}

impl ModelDescriptor {
    /// Unpatched jacks sized for this model.
    pub fn ports(&self) -> Ports {
        Ports::new(self.inputs.len(), self.outputs.len())
    }
}

/// Factory function type for creating modules.
pub type ModelFactory = fn() -> Box<dyn Module + Send>;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: ModelDescriptor,
    factory: ModelFactory,
}

const PIANO_ROLL_INPUTS: [&str; Input::COUNT] = {
    let mut names = [""; Input::COUNT];
    let mut i = 0;
    while i < Input::COUNT {
        names[i] = Input::ALL[i].name();
        i += 1;
    }
    names
};

const PIANO_ROLL_OUTPUTS: [&str; Output::COUNT] = {
    let mut names = [""; Output::COUNT];
    let mut i = 0;
    while i < Output::COUNT {
        names[i] = Output::ALL[i].name();
        i += 1;
    }
    names
};

/// Registry of available models.
pub struct ModelRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    /// Create a new registry with the built-in models registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_models();
        registry
    }

    /// Create a registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            entries: Vec::with_capacity(2),
        }
    }

    fn register_builtin_models(&mut self) {
        self.register(
            ModelDescriptor {
                slug: "piano-roll",
                name: "Piano Roll",
                description: "Clocked pattern recorder and player with chainable transport",
                tags: &[ModelTag::Sequencer],
                inputs: &PIANO_ROLL_INPUTS,
                outputs: &PIANO_ROLL_OUTPUTS,
            },
            || Box::new(PianoRoll::new()),
        );

        self.register(
            ModelDescriptor {
                slug: "song-roll",
                name: "Song Roll",
                description: "Pattern arrangement placeholder",
                tags: &[ModelTag::Sequencer],
                inputs: &[],
                outputs: &[],
            },
            || Box::new(SongRoll::new()),
        );
    }

    /// Register a model. A later registration with the same slug shadows the
    /// earlier one for lookups.
    pub fn register(&mut self, descriptor: ModelDescriptor, factory: ModelFactory) {
        self.entries.insert(
            0,
            RegistryEntry {
                descriptor,
                factory,
            },
        );
    }

    /// Returns descriptors for all registered models, oldest first.
    pub fn all_models(&self) -> Vec<&ModelDescriptor> {
        self.entries.iter().rev().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors of models carrying `tag`.
    pub fn models_with_tag(&self, tag: ModelTag) -> Vec<&ModelDescriptor> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.descriptor.tags.contains(&tag))
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by slug.
    pub fn get(&self, slug: &str) -> Option<&ModelDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.slug == slug)
            .map(|e| &e.descriptor)
    }

    /// Create a module instance by slug.
    ///
    /// Returns `None` if the slug is not registered.
    pub fn create(&self, slug: &str) -> Option<Box<dyn Module + Send>> {
        self.entries
            .iter()
            .find(|e| e.descriptor.slug == slug)
            .map(|e| (e.factory)())
    }

    /// Returns the number of registered models.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no models are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
