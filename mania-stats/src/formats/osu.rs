//! osu!mania (`.osu`) chart parser
//!
//! Reads the key count from `[Difficulty]` and the notes from `[HitObjects]`.
//!
//! ## Hit object layout
//! `x,y,time,type,hitSound,objectParams,hitSample`
//! - The lane is derived from `x`: `floor(x * keys / 512 + 0.1)`
//! - `type` bit 7 (`128`) marks a long note, whose end time is the first
//!   `:`-separated field of `objectParams`
//!
//! Notes sharing a timestamp are merged into a single chord. Fractional times
//! are rounded to the nearest millisecond first, so two notes less than a
//! millisecond apart (e.g. `99.6` and `100.4`) become one chord.

use crate::types::{Chart, LaneSet, NoteEvent, PatternError, Result, Timestamp, MAX_LANES};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;

/// Width of the osu! playfield in osu!pixels
const PLAYFIELD_WIDTH: f64 = 512.0;

/// Added before flooring so columns placed on exact boundaries land in the right lane
const LANE_TOLERANCE: f64 = 0.1;

const HOLD_NOTE_FLAG: u32 = 1 << 7;

const MANIA_MODE: u32 = 3;

/// A single note as read from a hit object line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HitNote {
    lane: u8,
    time: Timestamp,
    end_time: Option<Timestamp>,
}

/// osu!mania chart parser
pub struct OsuParser;

impl OsuParser {
    /// Parse a `.osu` file into onset and release chord streams
    pub fn parse(path: &Path) -> Result<Chart> {
        log::info!("Parsing osu! chart: {:?}", path);

        if !path.exists() {
            return Err(PatternError::ChartParseError(format!(
                "Chart file not found: {:?}",
                path
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let chart = Self::parse_str(&content)?;

        log::info!(
            "Parsed {}K chart {:?}: {} onset chords, {} release chords",
            chart.key_count,
            path,
            chart.onsets.len(),
            chart.releases.len()
        );

        Ok(chart)
    }

    /// Parse the text of a `.osu` file
    pub fn parse_str(content: &str) -> Result<Chart> {
        let key_count = Self::read_key_count(content)?;

        let mut onsets: BTreeMap<Timestamp, LaneSet> = BTreeMap::new();
        let mut releases: BTreeMap<Timestamp, LaneSet> = BTreeMap::new();
        let mut in_hit_objects = false;
        let mut skipped = 0usize;

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_hit_objects = line == "[HitObjects]";
                continue;
            }

            if !in_hit_objects {
                continue;
            }

            match Self::parse_hit_object(line, key_count) {
                Ok(note) => {
                    add_to_chord(&mut onsets, note.time, note.lane)?;
                    if let Some(end_time) = note.end_time {
                        add_to_chord(&mut releases, end_time, note.lane)?;
                    }
                }
                Err(e) => {
                    skipped += 1;
                    log::warn!("Skipping hit object on line {}: {}", index + 1, e);
                }
            }
        }

        if skipped > 0 {
            log::debug!("{} malformed hit objects skipped", skipped);
        }

        Ok(Chart {
            key_count,
            onsets: into_events(onsets),
            releases: into_events(releases),
        })
    }

    /// Key count from `CircleSize`, after checking the chart is an osu!mania chart
    fn read_key_count(content: &str) -> Result<u8> {
        let mut key_count = None;

        for line in content.lines() {
            let line = line.trim();
            if line == "[HitObjects]" {
                break;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            match key.trim() {
                "Mode" => {
                    let mode: u32 = value.trim().parse().map_err(|_| {
                        PatternError::ChartParseError(format!("Invalid mode: {:?}", value.trim()))
                    })?;
                    if mode != MANIA_MODE {
                        return Err(PatternError::ChartParseError(format!(
                            "Not an osu!mania chart (mode {})",
                            mode
                        )));
                    }
                }
                "CircleSize" => {
                    let size: f64 = value.trim().parse().map_err(|_| {
                        PatternError::ChartParseError(format!(
                            "Invalid key count: {:?}",
                            value.trim()
                        ))
                    })?;
                    if !size.is_finite() {
                        return Err(PatternError::ChartParseError(format!(
                            "Invalid key count: {:?}",
                            value.trim()
                        )));
                    }
                    if size < 1.0 || size >= MAX_LANES as f64 {
                        return Err(PatternError::ChartParseError(format!(
                            "Key count out of range: {}",
                            size
                        )));
                    }
                    key_count = Some(size as u8);
                }
                _ => {}
            }
        }

        key_count.ok_or_else(|| {
            PatternError::ChartParseError("Key count (CircleSize) not found".to_string())
        })
    }

    fn parse_hit_object(line: &str, key_count: u8) -> Result<HitNote> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 4 {
            return Err(PatternError::ChartParseError(format!(
                "expected at least 4 fields, got {}",
                fields.len()
            )));
        }

        let x: f64 = parse_field(fields[0], "x position")?;
        let time = parse_time(fields[2])?;
        let object_type: u32 = parse_field(fields[3], "object type")?;

        if x < 0.0 {
            return Err(PatternError::ChartParseError(format!(
                "negative x position {}",
                x
            )));
        }

        let column = (x * key_count as f64 / PLAYFIELD_WIDTH + LANE_TOLERANCE).floor();
        let lane = (column as u8).min(key_count - 1);

        let end_time = if object_type & HOLD_NOTE_FLAG != 0 {
            let params = fields.get(5).ok_or_else(|| {
                PatternError::ChartParseError("long note without end time".to_string())
            })?;
            let end = params.split(':').next().unwrap_or_default();
            let end_time = parse_time(end)?;
            if end_time <= time {
                return Err(PatternError::ChartParseError(format!(
                    "long note ends at {}ms before it starts at {}ms",
                    end_time, time
                )));
            }
            Some(end_time)
        } else {
            None
        };

        Ok(HitNote {
            lane,
            time,
            end_time,
        })
    }
}

fn parse_field<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| PatternError::ChartParseError(format!("invalid {}: {:?}", what, value)))
}

/// Times are integers in practice, but some editors write fractional milliseconds
fn parse_time(value: &str) -> Result<Timestamp> {
    if let Ok(time) = value.parse::<Timestamp>() {
        return Ok(time);
    }
    let time: f64 = parse_field(value, "time")?;
    if !time.is_finite() {
        return Err(PatternError::ChartParseError(format!(
            "invalid time: {:?}",
            value
        )));
    }
    Ok(time.round() as Timestamp)
}

fn add_to_chord(
    chords: &mut BTreeMap<Timestamp, LaneSet>,
    time: Timestamp,
    lane: u8,
) -> Result<()> {
    match chords.entry(time) {
        Entry::Vacant(entry) => {
            entry.insert(LaneSet::single(lane)?);
        }
        Entry::Occupied(mut entry) => {
            entry.get_mut().insert(lane)?;
        }
    }
    Ok(())
}

fn into_events(chords: BTreeMap<Timestamp, LaneSet>) -> Vec<NoteEvent> {
    chords
        .into_iter()
        .map(|(time, lanes)| NoteEvent::new(time, lanes))
        .collect()
}
