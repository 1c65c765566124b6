use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::PipelineConfig;
use crate::segmenter::SegmenterConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuración completa. Todos los campos tienen valor por defecto, así que
/// un JSON parcial (o `{}`) es válido.
///
/// `pipeline.resample.target_count` fija la longitud del vector
/// (`18 + 2 * target_count`); cambiarlo exige un clasificador entrenado con
/// esa misma longitud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub segmenter: SegmenterConfig,
    pub pipeline: PipelineConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let normalize = &self.pipeline.normalize;
        if normalize.window <= normalize.padding.saturating_mul(2) {
            return Err(ConfigError::Invalid(format!(
                "window ({}) must exceed 2 * padding ({})",
                normalize.window, normalize.padding
            )));
        }
        if self.pipeline.resample.target_count < 2 {
            return Err(ConfigError::Invalid(format!(
                "target_count must be at least 2, got {}",
                self.pipeline.resample.target_count
            )));
        }
        Ok(())
    }

    pub fn feature_len(&self) -> usize {
        self.pipeline.feature_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_extractor::Rounding;
    use crate::resample::EndpointPolicy;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.segmenter.gap_threshold_ms, 3000);
        assert_eq!(config.pipeline.resample.target_count, 100);
        assert_eq!(config.pipeline.resample.endpoint_policy, EndpointPolicy::Truncate);
        assert_eq!(config.pipeline.normalize.window, 64);
        assert_eq!(config.pipeline.normalize.padding, 2);
        assert_eq!(config.pipeline.rounding, Rounding::HalfUp);
        assert_eq!(config.feature_len(), 218);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Config::from_json_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json_str(
            r#"{
                "segmenter": { "gap_threshold_ms": 1500 },
                "pipeline": {
                    "resample": { "target_count": 50, "endpoint_policy": "preserve_ends" },
                    "rounding": "half_even"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.segmenter.gap_threshold_ms, 1500);
        assert_eq!(config.pipeline.resample.target_count, 50);
        assert_eq!(
            config.pipeline.resample.endpoint_policy,
            EndpointPolicy::PreserveEnds
        );
        assert_eq!(config.pipeline.normalize.window, 64);
        assert_eq!(config.pipeline.rounding, Rounding::HalfEven);
        assert_eq!(config.feature_len(), 118);
    }

    #[test]
    fn test_invalid_window() {
        let err = Config::from_json_str(r#"{"pipeline": {"normalize": {"window": 4, "padding": 2}}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_huge_padding_is_rejected() {
        let err = Config::from_json_str(r#"{"pipeline": {"normalize": {"padding": 4294967295}}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_policy_is_json_error() {
        let err = Config::from_json_str(
            r#"{"pipeline": {"resample": {"endpoint_policy": "keep_all"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::JsonError(_)));
    }
}
