//! Operator-facing pipeline configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_GRID_SIZE: f64 = 0.001;
pub const DEFAULT_THRESHOLD: f64 = 0.0005;
pub const DEFAULT_MIN_SEVERITY: u8 = 3;

/// Join and rollup parameters.
///
/// Stored as a JSON object on disk; missing keys fall back to defaults:
/// ```json
/// {
///   "grid_size": 0.001,
///   "threshold": 0.0005,
///   "min_severity": 3,
///   "threads": 8
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Grid cell edge, in degrees.
    pub grid_size: f64,
    /// Per-axis match distance, in degrees. Must be at most `grid_size / 2`.
    pub threshold: f64,
    /// Lowest severity counted as impactful by the rollups.
    pub min_severity: u8,
    /// Size of a dedicated join pool; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            threshold: DEFAULT_THRESHOLD,
            min_severity: DEFAULT_MIN_SEVERITY,
            threads: None,
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Checks that the grid-indexed join is complete under these settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid_size.is_finite() || self.grid_size <= 0.0 {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.threshold > self.grid_size / 2.0 {
            return Err(ConfigError::ThresholdExceedsHalfCell {
                threshold: self.threshold,
                grid_size: self.grid_size,
            });
        }
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(PipelineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_threshold_at_half_cell_is_accepted() {
        let config = PipelineConfig {
            grid_size: 0.002,
            threshold: 0.001,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_over_half_cell_is_rejected() {
        let config = PipelineConfig {
            threshold: 0.0006,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ThresholdExceedsHalfCell {
                threshold: 0.0006,
                grid_size: 0.001,
            })
        );
    }

    #[test]
    fn test_bad_numbers_are_rejected() {
        let zero_grid = PipelineConfig {
            grid_size: 0.0,
            ..Default::default()
        };
        assert_eq!(zero_grid.validate(), Err(ConfigError::InvalidGridSize(0.0)));

        let nan_threshold = PipelineConfig {
            threshold: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            nan_threshold.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));

        let no_threads = PipelineConfig {
            threads: Some(0),
            ..Default::default()
        };
        assert_eq!(no_threads.validate(), Err(ConfigError::ZeroThreads));
    }

    #[test]
    fn test_load_fills_missing_keys() {
        let path = temp_path("transit_friction_test_config.json");
        fs::write(&path, r#"{ "min_severity": 4, "threads": 2 }"#).unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.min_severity, 4);
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.grid_size, DEFAULT_GRID_SIZE);
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);

        fs::remove_file(&path).unwrap();
    }
}
