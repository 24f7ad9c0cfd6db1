//! Configuration loading and parsing

use anyhow::{Context, Result};
use mania_stats::AnalyzerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Weight table, intensity exponent and stream selection
    #[serde(default)]
    pub analysis: AnalyzerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Pretty-print the JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .analysis
        .validate()
        .with_context(|| format!("Invalid analysis settings in {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mania_stats::{PatternWeights, StreamSelection};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [analysis]
            intensity_exponent = 1.33
            streams = "both"

            [analysis.weights]
            SPEED_JACK = 2.5
            SPLIT_TRILL = 5.5

            [output]
            pretty = false
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.analysis.intensity_exponent, 1.33);
        assert_eq!(config.analysis.streams, StreamSelection::Both);
        assert_eq!(config.analysis.weights.speed_jack, 2.5);
        assert_eq!(config.analysis.weights.split_trill, 5.5);
        assert_eq!(config.analysis.weights.hand_stream, 4.2);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.analysis.weights, PatternWeights::default());
        assert_eq!(config.analysis.intensity_exponent, 1.275);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_config_rejects_negative_weight() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[analysis.weights]\nJUMP_STREAM = -1.0").unwrap();
        file.flush().unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("JUMP_STREAM"));
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Path::new("missing/config.toml")).is_err());
    }
}
