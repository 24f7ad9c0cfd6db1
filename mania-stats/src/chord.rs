//! Chord shape classification
//!
//! Maps the set of lanes pressed at one instant to a [`ChordShape`].

use crate::types::{ChordShape, LaneSet};

/// Classify a chord by lane count and whether its lanes are adjacent
///
/// Chords wider than four lanes are reported as [`ChordShape::Unsupported`];
/// the caller decides whether that is an error.
pub fn classify_chord(lanes: &LaneSet) -> ChordShape {
    match lanes.len() {
        1 => ChordShape::Single,
        // Very dense single streams may also land here
        2 if is_consecutive(lanes) => ChordShape::Jump,
        2 => ChordShape::BrokenJump,
        3 if is_consecutive(lanes) => ChordShape::Hand,
        3 => ChordShape::BrokenHand,
        4 => ChordShape::Quad,
        _ => ChordShape::Unsupported,
    }
}

/// True if the sorted lanes form a run without gaps
fn is_consecutive(lanes: &LaneSet) -> bool {
    let first = lanes.first();
    lanes
        .lanes()
        .enumerate()
        .all(|(i, lane)| (lane - first) as usize == i)
}
