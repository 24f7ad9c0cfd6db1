//! Mania Pattern Stats Library
//!
//! A stateless library that characterizes 4-lane rhythm game charts by the
//! movement patterns they contain.
//!
//! # Architecture
//!
//! - Chord classification: the lanes pressed at one instant → a chord shape
//! - Pattern classification: a window of three chords → a movement pattern
//! - Aggregation: the whole chart → weighted intensity per pattern, plus `OVERALL`
//! - Chart reading: osu!mania `.osu` files → onset and release chord streams
//!
//! The library does NOT:
//! - Model player accuracy or timing judgement
//! - Support key modes other than 4K in the classifiers
//! - Print, serialize to files or keep results between calls
//!
//! Output formatting and the command line live in the application layer
//! (mania-stats-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use mania_stats::{Analyzer, AnalyzerConfig, PatternCategory, StreamSelection};
//! use std::path::Path;
//!
//! let config = AnalyzerConfig::new()
//!     .with_intensity_exponent(1.3)
//!     .with_streams(StreamSelection::Both);
//!
//! let analyzer = Analyzer::new(config);
//! let report = analyzer.analyze_file(Path::new("chart.osu")).unwrap();
//!
//! if let Some(onsets) = &report.onsets {
//!     println!("jacks: {:.3}", onsets.get(PatternCategory::SpeedJack));
//!     println!("overall: {:.3}", onsets.overall());
//! }
//! ```

// Public modules
pub mod analyzer;
pub mod chord;
pub mod config;
pub mod formats;
pub mod pattern;
pub mod stats;
pub mod types;

// Re-export main types for convenience
pub use analyzer::{Analyzer, ChartReport, SUPPORTED_KEY_COUNT};
pub use chord::classify_chord;
pub use config::{AnalyzerConfig, PatternWeights, StreamSelection};
pub use formats::OsuParser;
pub use pattern::classify_pattern;
pub use stats::{aggregate, count_patterns, intensity};
pub use types::{
    Chart, ChordShape, LaneSet, NoteEvent, PatternCategory, PatternCounts, PatternError,
    Result, ScoreVector, Timestamp,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
