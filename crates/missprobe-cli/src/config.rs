//! Analysis settings loaded from TOML.

use std::path::Path;

use anyhow::{Context, Result};
use missprobe_core::AnalysisConfig;
use tracing::{info, warn};

/// Parse an `AnalysisConfig` from TOML text. Missing keys keep their defaults.
pub fn parse_config(content: &str) -> Result<AnalysisConfig> {
    toml::from_str(content).context("Invalid analysis config")
}

fn read_config(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content)
}

/// Load the config file if given; any failure falls back to defaults
pub fn load_config(path: Option<&Path>) -> AnalysisConfig {
    let Some(path) = path else {
        return AnalysisConfig::default();
    };
    match read_config(path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load config: {:#}, using defaults", e);
            AnalysisConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("pixel_perfect_threshold = 0.05\n").unwrap();
        assert_eq!(config.pixel_perfect_threshold, 0.05);
        assert_eq!(
            config.max_listed_pixel_perfects,
            AnalysisConfig::default().max_listed_pixel_perfects
        );
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(parse_config("scale_window_by_mods = \"yes\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "miss_context_span_ms = 500.0").unwrap();
        let config = load_config(Some(file.path()));
        assert_eq!(config.miss_context_span_ms, 500.0);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("missing.toml")));
        assert_eq!(config, AnalysisConfig::default());
    }
}
