use std::fs;
use std::path::PathBuf;

use crate::errors::LoaderError;
use crate::filters::{FilterMode, RowFilter};
use crate::filters::{
    CalibrationState, DerivativeThresholdFilter, MovingAverageFilter, OffsetCalibrationFilter,
};
use crate::{load, load_str, LoadConfig};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn fixture(name: &str) -> String {
    let full_path = fixture_path(name);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "length mismatch: {actual:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "expected {expected:?}, got {actual:?}");
    }
}

#[test]
fn passthrough_reads_literal_values_and_header_title() {
    let config = LoadConfig::new(fixture_path("encoder_spring.csv"), 4, FilterMode::Passthrough);
    let (loaded, report) = load(&config).expect("encoder spring load failed");

    assert_eq!(loaded.title.as_deref(), Some("K = 6 (N/deg)"));
    assert_eq!(loaded.column_count(), 4);
    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded.series(0).unwrap(), &[0.00, 0.01, 0.02, 0.04]);
    assert_eq!(loaded.series(1).unwrap(), &[0.10, 0.12, 0.15, 0.20]);
    assert_eq!(loaded.series(3).unwrap(), &[-1.5, -1.2, -0.8, -0.1]);

    assert_eq!(report.rows_read, 5);
    assert_eq!(report.rows_skipped, 1);
    assert_eq!(report.rows_emitted, 4);
}

#[test]
fn every_mode_keeps_series_aligned() {
    let content = fixture("encoder_vs_vr.csv");
    let modes = [
        FilterMode::Passthrough,
        FilterMode::offset_calibrated(),
        FilterMode::moving_average(),
        FilterMode::derivative_threshold(),
    ];

    for mode in modes {
        let (loaded, _) = load_str(&content, 5, mode).expect("load failed");
        let expected = loaded.len();
        for series in &loaded.series {
            assert_eq!(series.len(), expected, "misaligned series for {mode}");
        }
    }
}

#[test]
fn passthrough_round_trips_through_csv() {
    let content = fixture("controller_height.csv");
    let (loaded, _) = load_str(&content, 2, FilterMode::Passthrough).expect("load failed");

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Time (s)", "Controller Height (m)"])
        .expect("write header");
    for idx in 0..loaded.len() {
        let row: Vec<String> = loaded
            .series
            .iter()
            .map(|series| series[idx].to_string())
            .collect();
        writer.write_record(&row).expect("write row");
    }
    let written = String::from_utf8(writer.into_inner().expect("flush")).expect("utf8");

    let (reloaded, _) = load_str(&written, 2, FilterMode::Passthrough).expect("reload failed");
    assert_eq!(reloaded.len(), loaded.len());
    for (original, again) in loaded.series.iter().zip(&reloaded.series) {
        assert_close(again, original);
    }
}

#[test]
fn offset_calibration_consumes_the_calibrating_row() {
    let content = "\
time,current,torque,angle_reference,angle_measured
0,0,0,90,5
1,0,0,80,60
2,0,0,82,62
";
    let (loaded, report) =
        load_str(content, 5, FilterMode::offset_calibrated()).expect("load failed");

    // The row at t=1 only sets the offset (80 - 60); it is never plotted.
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.series(0).unwrap(), &[2.0]);
    assert_eq!(loaded.series(3).unwrap(), &[82.0]);
    assert_eq!(loaded.series(4).unwrap(), &[82.0]);
    assert_eq!(report.rows_emitted, 1);
}

#[test]
fn offset_calibration_applies_fixed_offset_to_later_rows() {
    let config = LoadConfig::new(
        fixture_path("encoder_vs_vr.csv"),
        5,
        FilterMode::offset_calibrated(),
    );
    let (loaded, _) = load(&config).expect("load failed");

    assert_eq!(loaded.title.as_deref(), Some("K = 4 (N/deg)"));
    assert_close(loaded.series(0).unwrap(), &[0.03, 0.04]);
    assert_close(loaded.series(3).unwrap(), &[82.0, 85.0]);
    assert_close(loaded.series(4).unwrap(), &[82.0, 84.5]);
    assert_close(loaded.series(1).unwrap(), &[0.20, 0.30]);
}

#[test]
fn offset_calibration_without_tracking_yields_empty_series() {
    let content = "\
header
0,0,0,90,5
1,0,0,90,6
";
    let (loaded, _) = load_str(content, 5, FilterMode::offset_calibrated()).expect("load failed");
    assert!(loaded.is_empty());
    assert_eq!(loaded.column_count(), 5);
}

#[test]
fn calibration_state_is_terminal() {
    let mut filter = OffsetCalibrationFilter::new(0, 1, 90.0);
    assert_eq!(filter.state(), CalibrationState::AwaitingCalibration);

    assert!(filter.push(vec![90.0, 1.0]).is_none());
    assert!(filter.push(vec![70.0, 50.0]).is_none());
    assert_eq!(filter.state(), CalibrationState::Calibrated { offset: 20.0 });

    // A later row back at the sentinel is passed through, not re-calibrated.
    assert_eq!(filter.push(vec![90.0, 10.0]), Some(vec![90.0, 30.0]));
    assert_eq!(filter.state(), CalibrationState::Calibrated { offset: 20.0 });
}

#[test]
fn moving_average_drops_trailing_partial_window() {
    let config = LoadConfig::new(
        fixture_path("controller_height.csv"),
        2,
        FilterMode::moving_average(),
    );
    let (loaded, report) = load(&config).expect("load failed");

    assert_eq!(report.rows_read, 7);
    assert_eq!(loaded.len(), 2);
    assert_close(loaded.series(0).unwrap(), &[0.1, 0.4]);
    assert_close(
        loaded.series(1).unwrap(),
        &[(1.00 + 1.02 + 1.05) / 3.0, (1.04 + 1.03 + 1.07) / 3.0],
    );
}

#[test]
fn moving_average_resets_between_windows() {
    let mut filter = MovingAverageFilter::new(2);
    assert!(filter.push(vec![1.0, 10.0]).is_none());
    assert_eq!(filter.pending(), 1);
    assert_eq!(filter.push(vec![3.0, 20.0]), Some(vec![2.0, 15.0]));
    assert_eq!(filter.pending(), 0);
    assert!(filter.push(vec![5.0, 30.0]).is_none());
    assert_eq!(filter.push(vec![7.0, 40.0]), Some(vec![6.0, 35.0]));
}

#[test]
fn derivative_threshold_advances_reference_past_rejected_rows() {
    let config = LoadConfig::new(
        fixture_path("height_spikes.csv"),
        2,
        FilterMode::derivative_threshold(),
    );
    let (loaded, report) = load(&config).expect("load failed");

    assert_eq!(loaded.series(0).unwrap(), &[0.0, 1.0, 3.0]);
    assert_eq!(loaded.series(1).unwrap(), &[0.0, 0.5, 5.4]);
    assert_eq!(report.rows_emitted, 3);
}

#[test]
fn derivative_threshold_rejects_zero_time_step() {
    let content = "\
t,h
0,0
0,0.1
1,0.2
";
    let (loaded, _) =
        load_str(content, 2, FilterMode::derivative_threshold()).expect("load failed");
    assert_eq!(loaded.series(0).unwrap(), &[0.0, 1.0]);
}

#[test]
fn derivative_threshold_limit_is_strict() {
    let content = "\
t,h
0,0
1,1
";
    let (loaded, _) =
        load_str(content, 2, FilterMode::derivative_threshold()).expect("load failed");
    assert_eq!(loaded.series(0).unwrap(), &[0.0]);
}

#[test]
fn header_only_file_is_empty_for_every_mode() {
    let content = fixture("header_only.csv");
    let modes = [
        FilterMode::Passthrough,
        FilterMode::offset_calibrated(),
        FilterMode::moving_average(),
        FilterMode::derivative_threshold(),
    ];

    for mode in modes {
        let (loaded, report) = load_str(&content, 5, mode).expect("header-only load failed");
        assert!(loaded.is_empty(), "{mode} produced samples");
        assert_eq!(loaded.column_count(), 5);
        assert_eq!(loaded.title.as_deref(), Some("K = 4 (N/deg)"));
        assert_eq!(report.rows_read, 0);
    }
}

#[test]
fn empty_input_has_no_title() {
    let (loaded, _) = load_str("", 2, FilterMode::Passthrough).expect("empty load failed");
    assert!(loaded.title.is_none());
    assert!(loaded.is_empty());
}

#[test]
fn missing_file_is_reported() {
    let config = LoadConfig::new("/nonexistent.csv", 2, FilterMode::Passthrough);
    let err = load(&config).expect_err("missing file should fail");
    match err {
        LoaderError::MissingFile { path, .. } => assert_eq!(path, PathBuf::from("/nonexistent.csv")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_numeric_field_aborts_the_load() {
    let config = LoadConfig::new(fixture_path("non_numeric.csv"), 2, FilterMode::Passthrough);
    let err = load(&config).expect_err("non numeric field should fail");
    match err {
        LoaderError::NonNumericField {
            line,
            column,
            value,
        } => {
            assert_eq!(line, 3);
            assert_eq!(column, 1);
            assert_eq!(value, "oops");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_rows_are_skipped_before_parsing() {
    let content = "\
t,h
0,1
not,a,number,row
1,2
";
    let (loaded, report) = load_str(content, 2, FilterMode::Passthrough).expect("load failed");
    assert_eq!(loaded.series(1).unwrap(), &[1.0, 2.0]);
    assert_eq!(report.rows_skipped, 1);
}

#[test]
fn invalid_config_is_rejected_before_opening_the_file() {
    let config = LoadConfig::new(
        "/nonexistent.csv",
        2,
        FilterMode::MovingAverage { window: 0 },
    );
    assert!(matches!(
        load(&config),
        Err(LoaderError::InvalidConfig { .. })
    ));

    let out_of_range = FilterMode::OffsetCalibrated {
        reference_column: 3,
        measured_column: 4,
        sentinel: 90.0,
    };
    assert!(matches!(
        load_str("t,h\n0,1\n", 2, out_of_range),
        Err(LoaderError::InvalidConfig { .. })
    ));

    let negative_limit = FilterMode::DerivativeThreshold {
        time_column: 0,
        value_column: 1,
        limit: -1.0,
    };
    assert!(negative_limit.validate(2).is_err());
    assert!(FilterMode::Passthrough.validate(0).is_err());
}

#[test]
fn dataframe_view_uses_supplied_names() {
    let content = fixture("controller_height.csv");
    let (loaded, _) = load_str(&content, 2, FilterMode::Passthrough).expect("load failed");

    let df = loaded
        .to_dataframe(&["time_s", "height_m"])
        .expect("dataframe build failed");
    let names: Vec<&str> = df.get_column_names().iter().map(|name| name.as_str()).collect();
    assert_eq!(names, ["time_s", "height_m"]);
    assert_eq!(df.height(), 7);

    assert!(matches!(
        loaded.to_dataframe(&["time_s"]),
        Err(LoaderError::Validation { .. })
    ));
}

#[test]
fn filter_mode_serializes_with_tag() {
    let json = serde_json::to_string(&FilterMode::moving_average()).expect("serialize");
    assert_eq!(json, r#"{"mode":"moving_average","window":3}"#);
}

#[test]
fn default_mode_is_passthrough() {
    assert_eq!(FilterMode::default(), FilterMode::Passthrough);
}

#[test]
fn build_rejects_columns_outside_the_row() {
    assert!(matches!(
        FilterMode::offset_calibrated().build(2),
        Err(LoaderError::InvalidConfig { .. })
    ));
    let mut filter = FilterMode::offset_calibrated()
        .build(5)
        .expect("five fields cover the calibration columns");
    assert_eq!(filter.name(), "offset_calibrated");
    assert!(filter.push(vec![0.0, 0.0, 0.0, 90.0, 5.0]).is_none());
}

#[test]
fn narrow_rows_are_dropped_without_touching_filter_state() {
    let mut offset = OffsetCalibrationFilter::new(3, 4, 90.0);
    assert!(offset.push(vec![1.0, 2.0]).is_none());
    assert_eq!(offset.state(), CalibrationState::AwaitingCalibration);
    assert!(offset.push(vec![0.0, 0.0, 0.0, 80.0, 60.0]).is_none());
    assert!(offset.push(vec![1.0]).is_none());
    assert_eq!(offset.state(), CalibrationState::Calibrated { offset: 20.0 });

    let mut derivative = DerivativeThresholdFilter::new(0, 1, 1.0);
    assert!(derivative.push(vec![5.0]).is_none());
    // The narrow row did not become the reference, so this is still the first sample.
    assert_eq!(derivative.push(vec![0.0, 100.0]), Some(vec![0.0, 100.0]));
}

#[test]
fn title_skips_trailing_empty_header_fields() {
    let (loaded, _) =
        load_str("t,h,k = 6,\n0,1\n", 2, FilterMode::Passthrough).expect("load failed");
    assert_eq!(loaded.title.as_deref(), Some("k = 6"));
    assert_eq!(loaded.series(1).unwrap(), &[1.0]);
}

#[test]
fn reader_trims_fields_and_title() {
    let content = " t , h ,  K = 2 (N/deg)  \n 0.5 ,\t1.5 \n";
    let (loaded, _) = load_str(content, 2, FilterMode::Passthrough).expect("load failed");
    assert_eq!(loaded.title.as_deref(), Some("K = 2 (N/deg)"));
    assert_eq!(loaded.series(0).unwrap(), &[0.5]);
    assert_eq!(loaded.series(1).unwrap(), &[1.5]);
}
