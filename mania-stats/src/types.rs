//! Core types for the mania pattern stats library
//!
//! This module defines the value types that flow through the classifiers and
//! the aggregator: lane sets, note events, chord shapes, pattern categories
//! and the final score vector. None of them carry state between analyses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Timestamp type used throughout the library (milliseconds, as in `.osu` files)
pub type Timestamp = i64;

/// Result type for pattern stats operations
pub type Result<T> = std::result::Result<T, PatternError>;

/// Number of lanes a [`LaneSet`] can represent
pub const MAX_LANES: u8 = 32;

/// Errors that can occur while reading or analyzing a chart
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Unsupported chord {lanes}: {} lanes pressed, only 4-lane charts are supported", .lanes.len())]
    UnsupportedChord { lanes: LaneSet },

    #[error("Insufficient data: at least 2 note events are required, got {0}")]
    InsufficientData(usize),

    #[error("Degenerate gap: event at {current}ms does not come after event at {previous}ms")]
    DegenerateGap {
        previous: Timestamp,
        current: Timestamp,
    },

    #[error("Time gap between events at {previous}ms and {current}ms is out of range")]
    GapOverflow {
        previous: Timestamp,
        current: Timestamp,
    },

    #[error("Unsupported key mode: {0}K (only 4K is supported)")]
    UnsupportedKeyMode(u8),

    #[error("Failed to parse chart file: {0}")]
    ChartParseError(String),

    #[error("Invalid lane set: {0}")]
    InvalidLaneSet(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The lanes pressed (or released) at one instant
///
/// Stored as a lane mask, so duplicate lanes collapse and iteration is always
/// in ascending lane order. A `LaneSet` is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaneSet {
    mask: u32,
}

impl LaneSet {
    /// Placeholder chord used as the look-ahead for the last transition of a chart.
    ///
    /// Lane 31 can never appear in a 4-lane chart, so it never overlaps or
    /// equals a real chord.
    pub const SENTINEL: LaneSet = LaneSet {
        mask: 1 << (MAX_LANES - 1),
    };

    /// Create a lane set containing a single lane
    pub fn single(lane: u8) -> Result<Self> {
        Ok(Self {
            mask: Self::bit(lane)?,
        })
    }

    /// Create a lane set from any collection of lane indices
    pub fn from_lanes<I>(lanes: I) -> Result<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut mask = 0u32;
        for lane in lanes {
            mask |= Self::bit(lane)?;
        }

        if mask == 0 {
            return Err(PatternError::InvalidLaneSet(
                "a chord must contain at least one lane".to_string(),
            ));
        }

        Ok(Self { mask })
    }

    /// Add a lane to the set (no-op if already present)
    pub fn insert(&mut self, lane: u8) -> Result<()> {
        self.mask |= Self::bit(lane)?;
        Ok(())
    }

    fn bit(lane: u8) -> Result<u32> {
        if lane >= MAX_LANES {
            return Err(PatternError::InvalidLaneSet(format!(
                "lane {} is out of range (max {})",
                lane,
                MAX_LANES - 1
            )));
        }
        Ok(1u32 << lane)
    }

    /// Number of lanes in the chord
    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Lowest lane index in the chord
    pub fn first(&self) -> u8 {
        self.mask.trailing_zeros() as u8
    }

    /// True if the two chords share at least one lane
    pub fn overlaps(&self, other: &LaneSet) -> bool {
        self.mask & other.mask != 0
    }

    /// Lane indices in ascending order
    pub fn lanes(&self) -> impl Iterator<Item = u8> {
        let mask = self.mask;
        (0..MAX_LANES).filter(move |&lane| mask & (1 << lane) != 0)
    }
}

impl fmt::Display for LaneSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, lane) in self.lanes().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", lane)?;
        }
        write!(f, "}}")
    }
}

/// A chord at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// Time of the chord in milliseconds
    pub time: Timestamp,
    /// Lanes pressed (or released) at that time
    pub lanes: LaneSet,
}

impl NoteEvent {
    pub fn new(time: Timestamp, lanes: LaneSet) -> Self {
        Self { time, lanes }
    }
}

/// A chart reduced to its chord streams
///
/// Both streams are strictly increasing in time with one chord per timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    /// Number of lanes (4 for 4K)
    pub key_count: u8,
    /// Chords of note onsets (every note, including long note heads)
    pub onsets: Vec<NoteEvent>,
    /// Chords of long note releases
    pub releases: Vec<NoteEvent>,
}

/// Shape of a single chord, ordered by lane count then brokenness
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChordShape {
    /// One lane
    Single,
    /// Two adjacent lanes (`##xx`)
    Jump,
    /// Two non-adjacent lanes (`#x#x`)
    BrokenJump,
    /// Three adjacent lanes (`x###`)
    Hand,
    /// Three lanes with a gap (`#x##`)
    BrokenHand,
    /// All four lanes
    Quad,
    /// More than four lanes; only reachable outside 4K
    Unsupported,
}

impl fmt::Display for ChordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChordShape::Single => "SINGLE",
            ChordShape::Jump => "JUMP",
            ChordShape::BrokenJump => "BROKEN_JUMP",
            ChordShape::Hand => "HAND",
            ChordShape::BrokenHand => "BROKEN_HAND",
            ChordShape::Quad => "QUAD",
            ChordShape::Unsupported => "UNSUPPORTED",
        };
        write!(f, "{}", name)
    }
}

/// Movement pattern assigned to a chord transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternCategory {
    SingleStream,
    JumpStream,
    HandStream,
    SpeedJack,
    LightChordJack,
    DenseChordJack,
    /// Two-hand single trills also fall into this category
    JumpTrill,
    /// One-hand single trills also fall into this category
    SplitTrill,
    /// Sum of all other categories
    Overall,
}

impl PatternCategory {
    /// Every category, `Overall` last
    pub const ALL: [PatternCategory; 9] = [
        PatternCategory::SingleStream,
        PatternCategory::JumpStream,
        PatternCategory::HandStream,
        PatternCategory::SpeedJack,
        PatternCategory::LightChordJack,
        PatternCategory::DenseChordJack,
        PatternCategory::JumpTrill,
        PatternCategory::SplitTrill,
        PatternCategory::Overall,
    ];

    /// Every category a transition can be classified into
    pub const PATTERNS: [PatternCategory; 8] = [
        PatternCategory::SingleStream,
        PatternCategory::JumpStream,
        PatternCategory::HandStream,
        PatternCategory::SpeedJack,
        PatternCategory::LightChordJack,
        PatternCategory::DenseChordJack,
        PatternCategory::JumpTrill,
        PatternCategory::SplitTrill,
    ];

    /// Name used in JSON output and configuration
    pub fn name(&self) -> &'static str {
        match self {
            PatternCategory::SingleStream => "SINGLE_STREAM",
            PatternCategory::JumpStream => "JUMP_STREAM",
            PatternCategory::HandStream => "HAND_STREAM",
            PatternCategory::SpeedJack => "SPEED_JACK",
            PatternCategory::LightChordJack => "LIGHT_CHORD_JACK",
            PatternCategory::DenseChordJack => "DENSE_CHORD_JACK",
            PatternCategory::JumpTrill => "JUMP_TRILL",
            PatternCategory::SplitTrill => "SPLIT_TRILL",
            PatternCategory::Overall => "OVERALL",
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, PatternCategory::Overall)
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Final weighted score per pattern category, including `OVERALL`
///
/// Serializes as a flat JSON object keyed by category name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreVector {
    scores: BTreeMap<PatternCategory, f64>,
}

impl ScoreVector {
    /// A score vector with every category present and set to zero
    pub fn zeroed() -> Self {
        Self {
            scores: PatternCategory::ALL.iter().map(|&c| (c, 0.0)).collect(),
        }
    }

    pub(crate) fn add(&mut self, category: PatternCategory, value: f64) {
        *self.scores.entry(category).or_insert(0.0) += value;
    }

    pub(crate) fn set(&mut self, category: PatternCategory, value: f64) {
        self.scores.insert(category, value);
    }

    /// Score of a single category
    pub fn get(&self, category: PatternCategory) -> f64 {
        self.scores.get(&category).copied().unwrap_or(0.0)
    }

    /// The aggregate `OVERALL` score
    pub fn overall(&self) -> f64 {
        self.get(PatternCategory::Overall)
    }

    /// Iterate over `(category, score)` in category order
    pub fn iter(&self) -> impl Iterator<Item = (PatternCategory, f64)> + '_ {
        self.scores.iter().map(|(&c, &v)| (c, v))
    }
}

/// Unweighted number of transitions per pattern category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PatternCounts {
    counts: BTreeMap<PatternCategory, usize>,
}

impl PatternCounts {
    pub fn new() -> Self {
        Self {
            counts: PatternCategory::PATTERNS.iter().map(|&c| (c, 0)).collect(),
        }
    }

    pub(crate) fn increment(&mut self, category: PatternCategory) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    pub fn get(&self, category: PatternCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Total number of classified transitions
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatternCategory, usize)> + '_ {
        self.counts.iter().map(|(&c, &n)| (c, n))
    }
}

impl Default for PatternCounts {
    fn default() -> Self {
        Self::new()
    }
}
