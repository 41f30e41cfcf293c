use crate::error::Result;
use crate::index::IndexConfig;
use crate::link_rank::LinkRankConfig;
use crate::spelling::SpellingConfig;
use crate::vector::VectorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for every engine. Missing sections and fields take their defaults,
/// so `{}` is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub index: IndexConfig,
    pub vector: VectorConfig,
    pub spelling: SpellingConfig,
    pub link_rank: LinkRankConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.link_rank.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link_rank::DanglingPolicy;
    use crate::tokenizer::Analyzer;
    use crate::vector::TfWeighting;
    use crate::Error;

    #[test]
    fn empty_object_is_default() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config.index.analyzer, Analyzer::Whitespace);
        assert_eq!(config.vector.analyzer, Analyzer::Word);
        assert!(config.vector.normalize);
        assert_eq!(config.link_rank.max_iterations, 100);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r#"{
            "index": { "analyzer": "stemmed" },
            "vector": { "tf": "log_scaled", "normalize": false },
            "link_rank": { "damping": 0.5, "dangling": "redistribute" }
        }"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        assert_eq!(config.index.analyzer, Analyzer::Stemmed);
        assert_eq!(config.vector.tf, TfWeighting::LogScaled);
        assert_eq!(config.vector.analyzer, Analyzer::Word);
        assert!(!config.vector.normalize);
        assert_eq!(config.link_rank.damping, 0.5);
        assert_eq!(config.link_rank.dangling, DanglingPolicy::Redistribute);
        assert_eq!(config.link_rank.tolerance, 1e-6);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "link_rank": { "damping": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        let err = EngineConfig::from_json_str(r#"{ "index": { "analyzer": "bogus" } }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
