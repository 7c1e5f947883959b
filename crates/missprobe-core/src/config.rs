//! Tunable analysis settings.
//!
//! The fixed empirical thresholds live in [`crate::constants`]; this struct
//! only carries the knobs a caller may reasonably want to change.

use serde::{Deserialize, Serialize};

/// Configuration for a single analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Scale the association window by the time multiplier of the mods
    pub scale_window_by_mods: bool,
    /// Hits with perfectness below this are listed as edge hits
    pub pixel_perfect_threshold: f64,
    /// Upper bound on edge hits listed in the report
    pub max_listed_pixel_perfects: usize,
    /// More unrealistic edge hits than this triggers the relax warning
    pub relax_pixel_perfect_count: usize,
    /// Time span either side of a miss captured as context (ms)
    pub miss_context_span_ms: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scale_window_by_mods: true,
            pixel_perfect_threshold: 0.02,
            max_listed_pixel_perfects: 50,
            relax_pixel_perfect_count: 15,
            miss_context_span_ms: 1000.0,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }
}

/// Builder for AnalysisConfig
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfigBuilder {
    scale_window_by_mods: Option<bool>,
    pixel_perfect_threshold: Option<f64>,
    max_listed_pixel_perfects: Option<usize>,
    relax_pixel_perfect_count: Option<usize>,
    miss_context_span_ms: Option<f64>,
}

impl AnalysisConfigBuilder {
    pub fn scale_window_by_mods(mut self, enabled: bool) -> Self {
        self.scale_window_by_mods = Some(enabled);
        self
    }

    pub fn pixel_perfect_threshold(mut self, threshold: f64) -> Self {
        self.pixel_perfect_threshold = Some(threshold);
        self
    }

    pub fn max_listed_pixel_perfects(mut self, count: usize) -> Self {
        self.max_listed_pixel_perfects = Some(count);
        self
    }

    pub fn relax_pixel_perfect_count(mut self, count: usize) -> Self {
        self.relax_pixel_perfect_count = Some(count);
        self
    }

    /// Set the miss context span in milliseconds
    pub fn miss_context_span_ms(mut self, span: f64) -> Self {
        self.miss_context_span_ms = Some(span);
        self
    }

    /// Build the configuration
    pub fn build(self) -> AnalysisConfig {
        let default = AnalysisConfig::default();
        AnalysisConfig {
            scale_window_by_mods: self
                .scale_window_by_mods
                .unwrap_or(default.scale_window_by_mods),
            pixel_perfect_threshold: self
                .pixel_perfect_threshold
                .unwrap_or(default.pixel_perfect_threshold),
            max_listed_pixel_perfects: self
                .max_listed_pixel_perfects
                .unwrap_or(default.max_listed_pixel_perfects),
            relax_pixel_perfect_count: self
                .relax_pixel_perfect_count
                .unwrap_or(default.relax_pixel_perfect_count),
            miss_context_span_ms: self
                .miss_context_span_ms
                .unwrap_or(default.miss_context_span_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_only_given_fields() {
        let config = AnalysisConfig::builder()
            .scale_window_by_mods(false)
            .miss_context_span_ms(500.0)
            .build();

        assert!(!config.scale_window_by_mods);
        assert_eq!(config.miss_context_span_ms, 500.0);
        assert_eq!(config.relax_pixel_perfect_count, 15);
        assert_eq!(config.pixel_perfect_threshold, 0.02);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"max_listed_pixel_perfects": 5}"#).unwrap();
        assert_eq!(config.max_listed_pixel_perfects, 5);
        assert!(config.scale_window_by_mods);
    }
}
