//! JSON report generation
//!
//! A single onset analysis prints as a flat `{"SINGLE_STREAM": ..., "OVERALL": ...}`
//! object. Release or two-stream analyses nest the vectors under `onsets` /
//! `releases`, and several charts are keyed by their path.

use anyhow::{Context, Result};
use mania_stats::ChartReport;
use serde_json::Value;
use std::path::PathBuf;

/// JSON value for one analyzed chart
pub fn chart_value(report: &ChartReport) -> Result<Value> {
    let value = match (&report.onsets, &report.releases) {
        (Some(onsets), None) => serde_json::to_value(onsets),
        _ => serde_json::to_value(report),
    };
    value.context("Failed to serialize chart report")
}

/// Render the final document printed to stdout
pub fn render(outputs: &[(PathBuf, Value)], pretty: bool) -> Result<String> {
    let document = match outputs {
        [(_, single)] => single.clone(),
        many => Value::Object(
            many.iter()
                .map(|(path, value)| (path.display().to_string(), value.clone()))
                .collect(),
        ),
    };

    let text = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };
    text.context("Failed to render JSON report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mania_stats::{Analyzer, AnalyzerConfig, Chart, LaneSet, NoteEvent, StreamSelection};

    fn chart() -> Chart {
        let events = |lanes: &[u8]| -> Vec<NoteEvent> {
            lanes
                .iter()
                .enumerate()
                .map(|(i, &lane)| NoteEvent::new(i as i64 * 100, LaneSet::single(lane).unwrap()))
                .collect()
        };
        Chart {
            key_count: 4,
            onsets: events(&[0, 1, 2, 3]),
            releases: events(&[3, 3, 2]),
        }
    }

    fn report(streams: StreamSelection) -> ChartReport {
        Analyzer::new(AnalyzerConfig::new().with_streams(streams))
            .analyze_chart(&chart())
            .unwrap()
    }

    #[test]
    fn test_onsets_render_flat() {
        let value = chart_value(&report(StreamSelection::Onsets)).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 9);
        assert!(object["OVERALL"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_both_streams_render_nested() {
        let value = chart_value(&report(StreamSelection::Both)).unwrap();
        assert!(value["onsets"]["OVERALL"].is_number());
        assert!(value["releases"]["SPEED_JACK"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_releases_only_render_nested() {
        let value = chart_value(&report(StreamSelection::Releases)).unwrap();
        assert!(value.get("onsets").is_none());
        assert!(value["releases"].is_object());
    }

    #[test]
    fn test_single_chart_document() {
        let value = chart_value(&report(StreamSelection::Onsets)).unwrap();
        let text = render(&[(PathBuf::from("a.osu"), value.clone())], false).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_multi_chart_document() {
        let value = chart_value(&report(StreamSelection::Onsets)).unwrap();
        let outputs = vec![
            (PathBuf::from("a.osu"), value.clone()),
            (PathBuf::from("b.osu"), value.clone()),
        ];
        let text = render(&outputs, true).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["a.osu"], value);
        assert_eq!(parsed["b.osu"], value);
    }
}
