use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AlignmentError;

/// One model in the registry file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelEntry {
    /// Hub repository of the acoustic model.
    pub model: String,
    /// Revision the model is pinned to.
    pub pin: String,
    pub sampling_rate: u32,
    pub language: String,
}

/// Keyed registry of known alignment models, e.g. `english`, `german`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelEntry>,
}

impl ModelRegistry {
    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read model registry", e))?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, AlignmentError> {
        serde_json::from_str(data).map_err(|e| AlignmentError::json("parse model registry", e))
    }

    pub fn get(&self, key: &str) -> Option<&ModelEntry> {
        self.models.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

/// Per-run knobs that do not live in the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignerOptions {
    pub k_shingles: usize,
    pub local_files_only: bool,
    pub cache_dir: Option<PathBuf>,
}

impl Default for AlignerOptions {
    fn default() -> Self {
        Self {
            k_shingles: AlignerConfig::DEFAULT_K_SHINGLES,
            local_files_only: false,
            cache_dir: None,
        }
    }
}

/// Settings handed to the external aligner.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignerConfig {
    pub hugging_model: String,
    pub hugging_pin: String,
    pub sampling_rate: u32,
    pub language: String,
    pub k_shingles: usize,
    pub local_files_only: bool,
    pub cache_dir: PathBuf,
}

impl AlignerConfig {
    pub const DEFAULT_K_SHINGLES: usize = 5;
    pub const DEFAULT_CACHE_DIR: &'static str = "models";

    pub fn from_registry(
        registry: &ModelRegistry,
        key: &str,
        options: AlignerOptions,
    ) -> Result<Self, AlignmentError> {
        let entry = registry.get(key).ok_or_else(|| {
            let known = registry.keys().collect::<Vec<_>>().join(", ");
            AlignmentError::invalid_input(format!("unknown model {key:?}; known models: {known}"))
        })?;
        Ok(Self {
            hugging_model: entry.model.clone(),
            hugging_pin: entry.pin.clone(),
            sampling_rate: entry.sampling_rate,
            language: entry.language.clone(),
            k_shingles: options.k_shingles,
            local_files_only: options.local_files_only,
            cache_dir: options
                .cache_dir
                .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CACHE_DIR)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY_JSON: &str = r#"{
        "english": {
            "model": "jonatasgrosman/wav2vec2-large-xlsr-53-english",
            "pin": "main",
            "sampling_rate": 16000,
            "language": "english"
        },
        "german": {
            "model": "jonatasgrosman/wav2vec2-large-xlsr-53-german",
            "pin": "v1.0",
            "sampling_rate": 16000,
            "language": "german"
        }
    }"#;

    #[test]
    fn registry_parses_entries() {
        let registry = ModelRegistry::from_json_str(REGISTRY_JSON).expect("valid registry");
        assert_eq!(registry.keys().collect::<Vec<_>>(), ["english", "german"]);
        let english = registry.get("english").unwrap();
        assert_eq!(english.sampling_rate, 16_000);
        assert_eq!(english.language, "english");
    }

    #[test]
    fn config_defaults_options() {
        let registry = ModelRegistry::from_json_str(REGISTRY_JSON).unwrap();
        let config =
            AlignerConfig::from_registry(&registry, "german", AlignerOptions::default()).unwrap();
        assert_eq!(
            config.hugging_model,
            "jonatasgrosman/wav2vec2-large-xlsr-53-german"
        );
        assert_eq!(config.k_shingles, 5);
        assert!(!config.local_files_only);
        assert_eq!(config.cache_dir, PathBuf::from("models"));
    }

    #[test]
    fn config_keeps_explicit_options() {
        let registry = ModelRegistry::from_json_str(REGISTRY_JSON).unwrap();
        let options = AlignerOptions {
            k_shingles: 3,
            local_files_only: true,
            cache_dir: Some(PathBuf::from("/tmp/cache")),
        };
        let config = AlignerConfig::from_registry(&registry, "english", options).unwrap();
        assert_eq!(config.k_shingles, 3);
        assert!(config.local_files_only);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
    }

    #[test]
    fn unknown_model_lists_known_keys() {
        let registry = ModelRegistry::from_json_str(REGISTRY_JSON).unwrap();
        let err = AlignerConfig::from_registry(&registry, "klingon", AlignerOptions::default())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("klingon"));
        assert!(message.contains("english, german"));
    }

    #[test]
    fn registry_entry_missing_field_fails() {
        let err = ModelRegistry::from_json_str(r#"{"x": {"model": "m"}}"#).unwrap_err();
        assert!(matches!(err, AlignmentError::Json { .. }));
    }

    #[test]
    fn registry_load_reports_missing_file() {
        let err = ModelRegistry::load(Path::new("/nonexistent/models.json")).unwrap_err();
        assert!(matches!(err, AlignmentError::Io { .. }));
    }
}
