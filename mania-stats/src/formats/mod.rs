//! Chart file format readers
//!
//! Each reader turns a chart file into a [`Chart`](crate::types::Chart): the
//! key count plus onset and release chord streams, grouped by timestamp and
//! sorted in time.

pub mod osu;

// Re-export parser types
pub use osu::OsuParser;
