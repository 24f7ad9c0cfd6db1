//! Analyzer configuration types
//!
//! The per-pattern weight table and the intensity exponent are the only
//! tunable parameters of the engine. They are kept here, outside the
//! classifiers, so they can be retuned against sample charts without touching
//! the decision logic.

use crate::types::{PatternCategory, PatternError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Exponent `p` of the intensity function `(1000 / gap) ^ p`
    #[serde(default = "default_intensity_exponent")]
    pub intensity_exponent: f64,

    /// Which note streams of a chart to analyze
    #[serde(default)]
    pub streams: StreamSelection,

    /// Weight applied to each pattern category before normalization
    #[serde(default)]
    pub weights: PatternWeights,
}

fn default_intensity_exponent() -> f64 {
    1.275
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            intensity_exponent: default_intensity_exponent(),
            streams: StreamSelection::default(),
            weights: PatternWeights::default(),
        }
    }
}

/// Note streams fed to the aggregator
///
/// Release times of long notes form their own stream, analyzed with the same
/// engine as the onsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamSelection {
    /// Note onsets only
    #[default]
    Onsets,
    /// Long note releases only
    Releases,
    /// Onsets and releases, each analyzed on its own
    Both,
}

impl StreamSelection {
    pub fn includes_onsets(&self) -> bool {
        matches!(self, StreamSelection::Onsets | StreamSelection::Both)
    }

    pub fn includes_releases(&self) -> bool {
        matches!(self, StreamSelection::Releases | StreamSelection::Both)
    }
}

/// Weight table, one entry per pattern category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct PatternWeights {
    pub single_stream: f64,
    pub jump_stream: f64,
    pub hand_stream: f64,
    pub speed_jack: f64,
    pub light_chord_jack: f64,
    pub dense_chord_jack: f64,
    pub jump_trill: f64,
    pub split_trill: f64,
}

impl Default for PatternWeights {
    fn default() -> Self {
        Self {
            single_stream: 0.91,
            jump_stream: 1.92,
            hand_stream: 4.2,
            speed_jack: 2.2,
            light_chord_jack: 2.8,
            dense_chord_jack: 5.3,
            jump_trill: 2.7,
            split_trill: 6.0,
        }
    }
}

impl PatternWeights {
    /// Weight of a category (`OVERALL` has none and always reports 0)
    pub fn get(&self, category: PatternCategory) -> f64 {
        match category {
            PatternCategory::SingleStream => self.single_stream,
            PatternCategory::JumpStream => self.jump_stream,
            PatternCategory::HandStream => self.hand_stream,
            PatternCategory::SpeedJack => self.speed_jack,
            PatternCategory::LightChordJack => self.light_chord_jack,
            PatternCategory::DenseChordJack => self.dense_chord_jack,
            PatternCategory::JumpTrill => self.jump_trill,
            PatternCategory::SplitTrill => self.split_trill,
            PatternCategory::Overall => 0.0,
        }
    }

    /// Set the weight of a category
    pub fn set(&mut self, category: PatternCategory, weight: f64) -> Result<()> {
        let slot = match category {
            PatternCategory::SingleStream => &mut self.single_stream,
            PatternCategory::JumpStream => &mut self.jump_stream,
            PatternCategory::HandStream => &mut self.hand_stream,
            PatternCategory::SpeedJack => &mut self.speed_jack,
            PatternCategory::LightChordJack => &mut self.light_chord_jack,
            PatternCategory::DenseChordJack => &mut self.dense_chord_jack,
            PatternCategory::JumpTrill => &mut self.jump_trill,
            PatternCategory::SplitTrill => &mut self.split_trill,
            PatternCategory::Overall => {
                return Err(PatternError::InvalidConfig(
                    "OVERALL is derived and cannot be weighted".to_string(),
                ))
            }
        };
        *slot = weight;
        Ok(())
    }

    /// Every weight multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            single_stream: self.single_stream * factor,
            jump_stream: self.jump_stream * factor,
            hand_stream: self.hand_stream * factor,
            speed_jack: self.speed_jack * factor,
            light_chord_jack: self.light_chord_jack * factor,
            dense_chord_jack: self.dense_chord_jack * factor,
            jump_trill: self.jump_trill * factor,
            split_trill: self.split_trill * factor,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new analyzer configuration with the tuned defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: replace the whole weight table
    pub fn with_weights(mut self, weights: PatternWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Builder method: override a single category weight
    pub fn with_weight(mut self, category: PatternCategory, weight: f64) -> Result<Self> {
        self.weights.set(category, weight)?;
        Ok(self)
    }

    /// Builder method: set the intensity exponent
    pub fn with_intensity_exponent(mut self, exponent: f64) -> Self {
        self.intensity_exponent = exponent;
        self
    }

    /// Builder method: choose which note streams to analyze
    pub fn with_streams(mut self, streams: StreamSelection) -> Self {
        self.streams = streams;
        self
    }

    /// Reject weight tables and exponents that would produce meaningless scores
    pub fn validate(&self) -> Result<()> {
        for category in PatternCategory::PATTERNS {
            let weight = self.weights.get(category);
            if !weight.is_finite() || weight < 0.0 {
                return Err(PatternError::InvalidConfig(format!(
                    "weight for {} must be a finite non-negative number, got {}",
                    category, weight
                )));
            }
        }

        if !self.intensity_exponent.is_finite() || self.intensity_exponent <= 0.0 {
            return Err(PatternError::InvalidConfig(format!(
                "intensity exponent must be a finite positive number, got {}",
                self.intensity_exponent
            )));
        }

        Ok(())
    }
}
