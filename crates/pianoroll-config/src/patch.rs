//! Patch files: one module's saved state in a JSON envelope.
//!
//! ```json
//! { "model": "piano-roll", "version": 1, "data": { "patterns": [ ... ] } }
//! ```
//!
//! `data` is exactly the tree the module produced from `data_to_json`; this
//! crate never looks inside it.

use crate::ConfigError;
use pianoroll_core::Module;
use pianoroll_registry::ModelRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Newest patch format version this crate reads and the one it writes.
pub const PATCH_VERSION: u32 = 1;

/// A saved module instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchFile {
    /// Model slug, e.g. `piano-roll`.
    pub model: String,

    /// Envelope format version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// The module's persisted state.
    #[serde(default)]
    pub data: Value,
}

fn default_version() -> u32 {
    PATCH_VERSION
}

impl PatchFile {
    /// Wrap an already-serialized state tree.
    pub fn new(model: impl Into<String>, data: Value) -> Self {
        Self {
            model: model.into(),
            version: PATCH_VERSION,
            data,
        }
    }

    /// Capture the state of a live module.
    pub fn from_module(model: impl Into<String>, module: &dyn Module) -> Self {
        Self::new(model, module.data_to_json())
    }

    /// A fresh instance of `model` with its default state.
    pub fn fresh(registry: &ModelRegistry, model: &str) -> Result<Self, ConfigError> {
        let module = registry
            .create(model)
            .ok_or_else(|| ConfigError::UnknownModel(model.to_string()))?;
        Ok(Self::from_module(model, &*module))
    }

    /// Load a patch from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_json(&content)
    }

    /// Parse a patch from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let patch: PatchFile = serde_json::from_str(json)?;
        if patch.version > PATCH_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: patch.version,
                supported: PATCH_VERSION,
            });
        }
        Ok(patch)
    }

    /// Save the patch as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Pretty-printed JSON text.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Create the module named by the patch and load the saved state into it.
    pub fn instantiate(
        &self,
        registry: &ModelRegistry,
    ) -> Result<Box<dyn Module + Send>, ConfigError> {
        let mut module = registry
            .create(&self.model)
            .ok_or_else(|| ConfigError::UnknownModel(self.model.clone()))?;
        module.data_from_json(&self.data);
        Ok(module)
    }

    /// Replace the saved state with the current state of `module`.
    pub fn update_from(&mut self, module: &dyn Module) {
        self.data = module.data_to_json();
        self.version = PATCH_VERSION;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fresh_piano_roll_has_default_state() {
        let registry = ModelRegistry::new();
        let patch = PatchFile::fresh(&registry, "piano-roll").unwrap();
        assert_eq!(patch.model, "piano-roll");
        assert_eq!(patch.version, PATCH_VERSION);
        assert_eq!(patch.data["currentStep"], -1);
        assert_eq!(patch.data["patterns"].as_array().unwrap().len(), 64);
    }

    #[test]
    fn fresh_unknown_model_fails() {
        let registry = ModelRegistry::new();
        let err = PatchFile::fresh(&registry, "drum-roll").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownModel(ref m) if m == "drum-roll"));
    }

    #[test]
    fn envelope_fields_default() {
        let patch = PatchFile::from_json(r#"{ "model": "song-roll" }"#).unwrap();
        assert_eq!(patch.version, PATCH_VERSION);
        assert_eq!(patch.data, Value::Null);
    }

    #[test]
    fn missing_model_is_a_parse_error() {
        let err = PatchFile::from_json(r#"{ "data": {} }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = PatchFile::from_json(r#"{ "model": "piano-roll", "version": 2 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedVersion {
                found: 2,
                supported: 1
            }
        ));
    }

    #[test]
    fn instantiate_applies_state() {
        let registry = ModelRegistry::new();
        let patch = PatchFile::new("piano-roll", json!({ "currentPattern": 12, "clockDelay": 2 }));
        let module = patch.instantiate(&registry).unwrap();

        let state = module.data_to_json();
        assert_eq!(state["currentPattern"], 12);
        assert_eq!(state["clockDelay"], 2);
    }

    #[test]
    fn update_from_captures_module() {
        let registry = ModelRegistry::new();
        let mut patch = PatchFile::fresh(&registry, "piano-roll").unwrap();
        let mut module = patch.instantiate(&registry).unwrap();
        module.data_from_json(&json!({ "sequenceRunning": true }));

        patch.update_from(&*module);
        assert_eq!(patch.data["sequenceRunning"], true);
    }
}
