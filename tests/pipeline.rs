use enviro_dash::data::clean::{drop_sentinel_rows, has_sentinel};
use enviro_dash::data::loader::{RawUpload, find_record_start, parse_upload};
use enviro_dash::pipeline::{Selection, attach_band, process_upload};
use enviro_dash::state::AppState;

const INSTRUMENT_EXPORT: &str = "\
Station: Upper Creek 04
Logger: WQ-200
Units: degC, NTU
BEGIN RECORD
DateTime,Temp_C,Turbidity_NTU,Status
2024-06-01 00:30:00,11,5.0,ok
2024-06-01 00:00:00,10,4.0,ok
2024-06-01 01:00:00,12,4.5,ok
,,,
2024-06-01 01:30:00,SDI-ERROR,,probe fault
2024-06-01 02:00:00,13,5.5,ok,unexpected
2024-06-01 02:30:00,13,5.5,ok
2024-06-01 03:00:00,12,50.0,ok
";

fn upload(text: &str) -> RawUpload {
    RawUpload {
        file_name: "upper_creek.txt".into(),
        bytes: text.as_bytes().to_vec(),
    }
}

#[test]
fn instrument_export_end_to_end() {
    let processed = process_upload(&upload(INSTRUMENT_EXPORT)).unwrap();

    assert_eq!(processed.record_start, 4);
    assert_eq!(processed.report.malformed, 1);
    assert_eq!(processed.report.empty, 1);
    assert_eq!(processed.report.sentinel, 1);
    assert_eq!(processed.datetime_column.as_deref(), Some("DateTime"));
    assert_eq!(
        processed.dataset.numeric_columns(),
        vec!["Temp_C", "Turbidity_NTU"]
    );

    // sorted by time: the 00:00 reading comes first
    let temps = processed.dataset.numeric_values("Temp_C").unwrap();
    assert_eq!(
        temps,
        &[Some(10.0), Some(11.0), Some(12.0), Some(13.0), Some(12.0)]
    );

    let mut dataset = processed.dataset.clone();
    let selection = Selection::defaults(&dataset, processed.datetime_column.clone());
    assert_eq!(selection.series_column.as_deref(), Some("Temp_C"));
    assert_eq!(selection.box_column.as_deref(), Some("Turbidity_NTU"));

    let band = attach_band(&mut dataset, "Temp_C", 3).unwrap();
    assert!(band.is_complete());
    for i in 0..band.len() {
        assert!((band.upper[i] - band.lower[i] - 2.0 * band.std[i]).abs() < 1e-9);
    }
    assert_eq!(dataset.len(), 5);
    assert!(dataset.numeric_values("lower").unwrap().iter().all(Option::is_some));
}

#[test]
fn marker_line_position_sets_parse_start() {
    let with_marker = "meta a\nmeta b\nBEGIN RECORD\nA,B\n1,2\n";
    assert_eq!(find_record_start(with_marker.as_bytes()), 3);
    let parsed = parse_upload(with_marker.as_bytes()).unwrap();
    assert_eq!(parsed.table.headers, vec!["A", "B"]);

    let without = "A,B\n1,2\n";
    assert_eq!(find_record_start(without.as_bytes()), 0);
    let parsed = parse_upload(without.as_bytes()).unwrap();
    assert_eq!(parsed.table.len(), 1);
}

#[test]
fn sentinel_filter_matches_any_field() {
    let mut table = parse_upload(b"SampleDate,Temp\n2024-01-01,4\n2024-01-02,SDI-ERROR\n2024-01-03,sdi\n")
        .unwrap()
        .table;
    assert!(has_sentinel(&table.rows[1]));

    assert_eq!(drop_sentinel_rows(&mut table), 2);
    assert_eq!(drop_sentinel_rows(&mut table), 0);
    assert_eq!(table.len(), 1);
}

#[test]
fn header_only_file_loads_empty() {
    let processed = process_upload(&upload("Date,Temp\n")).unwrap();
    assert!(processed.dataset.is_empty());
    assert!(processed.dataset.numeric_columns().is_empty());
    assert!(!processed.warnings().is_empty());
}

#[test]
fn short_upload_with_gap_gets_full_band_at_default_window() {
    let mut text = String::from("BEGIN RECORD\nDateTime,Temp_C,Turbidity_NTU\n");
    for i in 0..12 {
        let temp = if i == 5 { String::new() } else { format!("{}", 10 + i % 4) };
        text.push_str(&format!("2024-06-01 {i:02}:00:00,{temp},{}.5\n", 4 + i % 3));
    }

    let mut state = AppState::default();
    state.ingest(&upload(&text)).unwrap();

    assert_eq!(state.window, 30);
    assert_eq!(state.selection.series_column.as_deref(), Some("Temp_C"));
    let band = state.band.as_ref().unwrap();
    assert_eq!(band.len(), 12);
    assert!(band.is_complete());
    assert!(state.warnings().is_empty());

    let view = state.view.as_ref().unwrap();
    assert!(view.numeric_values("upper").unwrap().iter().all(Option::is_some));
}
