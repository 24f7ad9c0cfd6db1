// Difficulty calibration checks over graded chart series.
//
// The weight table is tuned, not derived, so these are regression checks:
// a series a human would rank as strictly harder must keep a strictly
// increasing OVERALL score.
use mania_stats::{
    aggregate, count_patterns, Analyzer, AnalyzerConfig, LaneSet, NoteEvent, OsuParser,
    PatternCategory, StreamSelection,
};
use std::io::Write;
use tempfile::NamedTempFile;

const MIXED_LAYOUT: &[&[u8]] = &[
    &[0],
    &[1],
    &[2],
    &[3],
    &[0, 1],
    &[2],
    &[0, 1],
    &[3],
    &[0, 1, 2],
    &[3],
    &[1],
    &[1],
    &[0, 2],
    &[1, 3],
    &[0, 1, 2, 3],
    &[2],
];

fn repeated(layout: &[&[u8]], times: usize, step: i64) -> Vec<NoteEvent> {
    layout
        .iter()
        .cycle()
        .take(layout.len() * times)
        .enumerate()
        .map(|(i, lanes)| {
            NoteEvent::new(
                i as i64 * step,
                LaneSet::from_lanes(lanes.iter().copied()).unwrap(),
            )
        })
        .collect()
}

/// Render a chord layout as a 4K `.osu` file, optionally as long notes
fn osu_chart(layout: &[&[u8]], times: usize, step: i64, hold: Option<i64>) -> String {
    let mut content = String::from(
        "osu file format v14\n\n[General]\nMode: 3\n\n[Difficulty]\nCircleSize:4\n\n[HitObjects]\n",
    );

    for (i, lanes) in layout.iter().cycle().take(layout.len() * times).enumerate() {
        let time = 1000 + i as i64 * step;
        for &lane in lanes.iter() {
            let x = lane as i64 * 128 + 64;
            match hold {
                Some(length) => content.push_str(&format!(
                    "{},192,{},128,0,{}:0:0:0:0:\n",
                    x,
                    time,
                    time + length
                )),
                None => content.push_str(&format!("{},192,{},1,0,0:0:0:0:\n", x, time)),
            }
        }
    }

    content
}

fn write_chart(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".osu").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_strictly_increasing(label: &str, scores: &[f64]) {
    for (i, pair) in scores.windows(2).enumerate() {
        assert!(
            pair[0] < pair[1],
            "{}: chart {} ({}) is not easier than chart {} ({})",
            label,
            i,
            pair[0],
            i + 1,
            pair[1]
        );
    }
}

#[test]
fn denser_charts_score_higher() {
    let config = AnalyzerConfig::default();
    let overall: Vec<f64> = [250, 200, 150, 125, 100, 80]
        .iter()
        .map(|&step| aggregate(&repeated(MIXED_LAYOUT, 8, step), &config).unwrap().overall())
        .collect();

    assert_strictly_increasing("density", &overall);
}

#[test]
fn heavier_chords_score_higher_at_same_tempo() {
    let series: [&[&[u8]]; 4] = [
        &[&[0], &[1], &[2], &[3]],
        &[&[0, 1], &[2], &[0, 1], &[3]],
        &[&[0, 1, 2], &[3]],
        &[&[0, 1, 2], &[1, 2, 3]],
    ];

    let config = AnalyzerConfig::default();
    let overall: Vec<f64> = series
        .iter()
        .map(|layout| {
            // Same number of chords and same timing for every chart
            let chart: Vec<NoteEvent> = repeated(layout, 64 / layout.len(), 120);
            assert_eq!(chart.len(), 64);
            aggregate(&chart, &config).unwrap().overall()
        })
        .collect();

    assert_strictly_increasing("chord load", &overall);
}

#[test]
fn graded_course_through_chart_files() {
    init_logging();
    let analyzer = Analyzer::default();
    let files: Vec<NamedTempFile> = [220, 170, 130, 105]
        .iter()
        .map(|&step| write_chart(&osu_chart(MIXED_LAYOUT, 6, step, None)))
        .collect();

    let overall: Vec<f64> = files
        .iter()
        .map(|file| {
            let report = analyzer.analyze_file(file.path()).unwrap();
            report.primary().unwrap().overall()
        })
        .collect();

    assert_strictly_increasing("course", &overall);
}

#[test]
fn coverage_is_constant_across_charts() {
    let ratios: Vec<f64> = [(MIXED_LAYOUT, 10, 90), (MIXED_LAYOUT, 25, 140)]
        .iter()
        .map(|&(layout, times, step)| {
            let chart = OsuParser::parse_str(&osu_chart(layout, times, step, None)).unwrap();
            let counts = count_patterns(&chart.onsets).unwrap();
            counts.total() as f64 / chart.onsets.len() as f64
        })
        .collect();

    assert!((ratios[0] - ratios[1]).abs() < 0.02);
    for ratio in ratios {
        assert!((ratio - 1.0).abs() < 0.02, "coverage ratio {}", ratio);
    }
}

#[test]
fn long_note_releases_are_a_separate_stream() {
    init_logging();
    let file = write_chart(&osu_chart(&[&[0], &[1], &[2], &[3]], 8, 200, Some(100)));
    let analyzer = Analyzer::new(AnalyzerConfig::new().with_streams(StreamSelection::Both));
    let report = analyzer.analyze_file(file.path()).unwrap();

    let onsets = report.onsets.unwrap();
    let releases = report.releases.unwrap();

    // Releases are the onsets shifted by the hold length, so they score the same
    assert_eq!(onsets, releases);
    assert!(onsets.get(PatternCategory::SingleStream) > 0.0);
}
