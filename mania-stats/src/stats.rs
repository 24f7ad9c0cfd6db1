//! Pattern statistics aggregation
//!
//! Folds an ordered chart through a three-chord sliding window, classifies
//! every transition and accumulates an inverse-time-gap intensity per
//! pattern category. The final pass applies the weight table and normalizes
//! by the number of chords in the chart.
//!
//! A chart with `n` chords has `n - 1` transitions: the main pass covers
//! `n - 2` of them, and the last one is classified against
//! [`LaneSet::SENTINEL`] because it has no real look-ahead chord.

use crate::config::AnalyzerConfig;
use crate::pattern::classify_pattern;
use crate::types::{
    LaneSet, NoteEvent, PatternCategory, PatternCounts, PatternError, Result, ScoreVector,
    Timestamp,
};

/// Intensity contributed by a transition whose gap is `gap` milliseconds
///
/// `(1000 / gap) ^ exponent`: a gap of one second scores 1.
pub fn intensity(gap: Timestamp, exponent: f64) -> f64 {
    (1000.0 / gap as f64).powf(exponent)
}

/// Compute the weighted pattern scores of a chart
///
/// # Arguments
/// * `events` - Chords in strictly increasing time order
/// * `config` - Weight table and intensity exponent
///
/// # Errors
/// * [`PatternError::InsufficientData`] if there are fewer than 2 chords
/// * [`PatternError::DegenerateGap`] if two consecutive chords are not strictly increasing in time
/// * [`PatternError::GapOverflow`] if a gap does not fit in a [`Timestamp`]
/// * [`PatternError::UnsupportedChord`] if a chord is wider than 4 lanes
/// * [`PatternError::InvalidConfig`] if the configuration fails validation
///
/// # Example
/// ```
/// use mania_stats::{aggregate, AnalyzerConfig, LaneSet, NoteEvent, PatternCategory};
///
/// let events = vec![
///     NoteEvent::new(0, LaneSet::single(0).unwrap()),
///     NoteEvent::new(125, LaneSet::single(1).unwrap()),
///     NoteEvent::new(250, LaneSet::single(2).unwrap()),
/// ];
///
/// let scores = aggregate(&events, &AnalyzerConfig::default()).unwrap();
/// assert!(scores.get(PatternCategory::SingleStream) > 0.0);
/// assert_eq!(scores.overall(), scores.get(PatternCategory::SingleStream));
/// ```
pub fn aggregate(events: &[NoteEvent], config: &AnalyzerConfig) -> Result<ScoreVector> {
    config.validate()?;

    let mut raw = ScoreVector::zeroed();
    walk_transitions(events, |category, gap| {
        raw.add(category, intensity(gap, config.intensity_exponent));
    })?;

    let line_count = events.len() as f64;
    let mut scaled = ScoreVector::zeroed();
    let mut overall = 0.0;

    for category in PatternCategory::PATTERNS {
        let value = raw.get(category) * config.weights.get(category) / line_count;
        scaled.set(category, value);
        overall += value;
    }
    scaled.set(PatternCategory::Overall, overall);

    log::debug!(
        "Aggregated {} chords, overall score {:.4}",
        events.len(),
        overall
    );

    Ok(scaled)
}

/// Count how many transitions fall into each pattern category
///
/// Uses the same window walk as [`aggregate`] without intensities or
/// weights, so `total()` is always `events.len() - 1`.
pub fn count_patterns(events: &[NoteEvent]) -> Result<PatternCounts> {
    let mut counts = PatternCounts::new();
    walk_transitions(events, |category, _| counts.increment(category))?;
    Ok(counts)
}

/// Ordering preconditions the chart reader must guarantee
fn check_preconditions(events: &[NoteEvent]) -> Result<()> {
    if events.len() < 2 {
        return Err(PatternError::InsufficientData(events.len()));
    }

    for pair in events.windows(2) {
        checked_gap(pair[0].time, pair[1].time)?;
    }

    Ok(())
}

fn checked_gap(previous: Timestamp, current: Timestamp) -> Result<Timestamp> {
    let gap = current
        .checked_sub(previous)
        .ok_or(PatternError::GapOverflow { previous, current })?;
    if gap <= 0 {
        return Err(PatternError::DegenerateGap { previous, current });
    }
    Ok(gap)
}

/// Classify every transition of the chart and hand `(category, gap)` to `visit`
///
/// Nothing is visited unless the whole chart passes the precondition checks,
/// so a failure never leaves a half-filled accumulator behind.
fn walk_transitions<F>(events: &[NoteEvent], mut visit: F) -> Result<()>
where
    F: FnMut(PatternCategory, Timestamp),
{
    check_preconditions(events)?;

    let mut transitions = Vec::with_capacity(events.len() - 1);

    let mut prev_prev = events[0].lanes;
    let mut prev = events[1].lanes;
    let mut prev_time = events[0].time;

    for event in &events[2..] {
        let category = classify_pattern(&prev_prev, &prev, &event.lanes)?;
        let gap = checked_gap(prev_time, event.time)?;

        log::trace!(
            "{} -> {} (next {}) at {}ms: {}",
            prev_prev,
            prev,
            event.lanes,
            event.time,
            category
        );
        transitions.push((category, gap));

        prev_prev = prev;
        prev = event.lanes;
        prev_time = event.time;
    }

    let last = events.len() - 1;
    transitions.push(classify_final_transition(&events[last - 1], &events[last])?);

    for (category, gap) in transitions {
        visit(category, gap);
    }

    Ok(())
}

/// The last transition has no look-ahead chord, so trill detection here is
/// necessarily inaccurate.
fn classify_final_transition(
    second_last: &NoteEvent,
    last: &NoteEvent,
) -> Result<(PatternCategory, Timestamp)> {
    let category = classify_pattern(&second_last.lanes, &last.lanes, &LaneSet::SENTINEL)?;
    let gap = checked_gap(second_last.time, last.time)?;

    log::trace!(
        "{} -> {} (final) at {}ms: {}",
        second_last.lanes,
        last.lanes,
        last.time,
        category
    );

    Ok((category, gap))
}
