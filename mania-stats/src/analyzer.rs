//! Main analyzer API
//!
//! This module provides the primary interface for the library. The Analyzer
//! struct reads chart files, checks the key mode and runs the aggregator over
//! the selected note streams.

use crate::config::AnalyzerConfig;
use crate::formats::OsuParser;
use crate::stats::aggregate;
use crate::types::{Chart, PatternError, Result, ScoreVector};
use serde::Serialize;
use std::path::Path;

/// The only key mode the pattern classifier understands
pub const SUPPORTED_KEY_COUNT: u8 = 4;

/// Scores of one chart, one vector per analyzed stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartReport {
    /// Number of lanes of the analyzed chart
    #[serde(skip)]
    pub key_count: u8,
    /// Scores of the note onsets (if analyzed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onsets: Option<ScoreVector>,
    /// Scores of the long note releases (if analyzed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub releases: Option<ScoreVector>,
}

impl ChartReport {
    /// The onset scores, or the release scores when only releases were analyzed
    pub fn primary(&self) -> Option<&ScoreVector> {
        self.onsets.as_ref().or(self.releases.as_ref())
    }
}

/// The main analyzer struct - entry point for chart analysis
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Read a chart file and compute its pattern scores
    ///
    /// # Example
    /// ```no_run
    /// use mania_stats::Analyzer;
    /// use std::path::Path;
    ///
    /// let analyzer = Analyzer::default();
    /// let report = analyzer.analyze_file(Path::new("chart.osu")).unwrap();
    /// println!("{:?}", report.primary().map(|scores| scores.overall()));
    /// ```
    pub fn analyze_file(&self, path: &Path) -> Result<ChartReport> {
        log::info!("Analyzing chart file: {:?}", path);

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        let chart = match extension.as_deref() {
            Some("osu") => {
                log::debug!("Detected osu! chart format");
                OsuParser::parse(path)?
            }
            _ => {
                return Err(PatternError::ChartParseError(format!(
                    "Unsupported chart format: {:?}",
                    extension
                )))
            }
        };

        self.analyze_chart(&chart)
    }

    /// Compute the pattern scores of an already parsed chart
    ///
    /// Each selected stream runs through the aggregator on its own.
    pub fn analyze_chart(&self, chart: &Chart) -> Result<ChartReport> {
        if chart.key_count != SUPPORTED_KEY_COUNT {
            return Err(PatternError::UnsupportedKeyMode(chart.key_count));
        }

        self.config.validate()?;

        let streams = self.config.streams;

        let onsets = if streams.includes_onsets() {
            log::debug!("Aggregating {} onset chords", chart.onsets.len());
            Some(aggregate(&chart.onsets, &self.config)?)
        } else {
            None
        };

        let releases = if streams.includes_releases() {
            log::debug!("Aggregating {} release chords", chart.releases.len());
            Some(aggregate(&chart.releases, &self.config)?)
        } else {
            None
        };

        Ok(ChartReport {
            key_count: chart.key_count,
            onsets,
            releases,
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
