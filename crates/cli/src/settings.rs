//! Layered configuration: defaults, optional file, then environment

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use scene_analyzer::AnalyzerConfig;
use serde::{Deserialize, Serialize};

/// Environment variable prefix, e.g. `VISION_GUARD_ANALYZER__MIN_CONFIDENCE=0.3`
pub const ENV_PREFIX: &str = "VISION_GUARD";

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analyzer: AnalyzerConfig,
}

impl Settings {
    /// Load settings; a given file must exist, its format follows the extension
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.analyzer.min_confidence, 0.20);
        assert_eq!(settings.analyzer.estimator.image_size, 640);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[analyzer]
min_confidence = 0.35

[analyzer.estimator]
stop_distance_m = 1.5
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.analyzer.min_confidence, 0.35);
        assert_eq!(settings.analyzer.estimator.stop_distance_m, 1.5);
        assert_eq!(settings.analyzer.estimator.warning_distance_m, 4.0);
    }

    #[test]
    fn test_environment_overrides_nested_keys() {
        // No other test reads this key
        let key = "VISION_GUARD_ANALYZER__ESTIMATOR__GROUND_BIAS_FACTOR";
        std::env::set_var(key, "0.8");
        let settings = Settings::load(None);
        std::env::remove_var(key);

        assert_eq!(settings.unwrap().analyzer.estimator.ground_bias_factor, 0.8);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/vision-guard.toml")));
        assert!(result.is_err());
    }
}
