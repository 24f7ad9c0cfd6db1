//! Movement pattern classification
//!
//! Classifies the transition between two consecutive chords into a
//! [`PatternCategory`]. A third chord (the one after the transition) is used
//! only as look-ahead for trills and broken-jump streams.
//!
//! The whole decision tree lives in [`classify_pattern`]. Its thresholds are
//! empirically tuned against ranked dan courses; treat the branches as a
//! contract, not as rhythm-game common sense.

use crate::chord::classify_chord;
use crate::types::{ChordShape, LaneSet, PatternCategory, PatternError, Result};

/// Classify the transition `oldest -> middle`, looking ahead to `newest`
///
/// The wider of `oldest` and `middle` selects the branch (ties go to
/// `middle`). Overlap between the two marks a jack, and `oldest == newest`
/// marks a trill.
///
/// # Errors
/// Returns [`PatternError::UnsupportedChord`] if either chord of the
/// transition is wider than four lanes.
pub fn classify_pattern(
    oldest: &LaneSet,
    middle: &LaneSet,
    newest: &LaneSet,
) -> Result<PatternCategory> {
    use ChordShape::{BrokenHand, BrokenJump, Hand, Jump, Quad, Single, Unsupported};
    use PatternCategory::*;

    let higher_is_oldest = oldest.len() > middle.len();
    let (higher, lower) = if higher_is_oldest {
        (oldest, middle)
    } else {
        (middle, oldest)
    };

    let lower_shape = classify_chord(lower);
    let jack = higher.overlaps(lower);
    let repeats = oldest == newest;

    let category = match classify_chord(higher) {
        Single if jack => SpeedJack,
        Single if repeats && matches!(middle.first(), 1 | 2) => JumpTrill,
        Single if repeats => SplitTrill,
        Single => SingleStream,

        Jump | BrokenJump if jack && lower_shape == Single => SpeedJack,
        Jump | BrokenJump if jack => LightChordJack,

        Jump if lower_shape == Jump && repeats => JumpTrill,
        Jump => JumpStream,

        // A broken jump followed by a single on the free lanes reads as a dense single stream
        BrokenJump if broken_jump_resolves_to_single(higher_is_oldest, higher, lower, newest) => {
            SingleStream
        }
        BrokenJump if lower_shape == Jump && repeats => SplitTrill,
        BrokenJump => JumpStream,

        Hand | BrokenHand if jack && lower_shape != Single => DenseChordJack,
        Hand | BrokenHand if jack => SpeedJack,
        Hand | BrokenHand => HandStream,

        Quad if lower_shape == Jump => SpeedJack,
        Quad => DenseChordJack,

        Unsupported => return Err(PatternError::UnsupportedChord { lanes: *higher }),
    };

    Ok(category)
}

/// Look-ahead rule for non-jacking broken jumps
fn broken_jump_resolves_to_single(
    higher_is_oldest: bool,
    higher: &LaneSet,
    lower: &LaneSet,
    newest: &LaneSet,
) -> bool {
    if classify_chord(newest) != ChordShape::Single {
        return false;
    }

    let reference = if higher_is_oldest { lower } else { higher };
    !newest.overlaps(reference)
}
