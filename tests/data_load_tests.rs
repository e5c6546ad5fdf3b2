use std::path::PathBuf;

use viz_rs::core::{Accessor, FieldAccessor, Record, TextAccessor};
use viz_rs::data::{load_csv_file, load_csv_records, load_json, load_json_file};
use viz_rs::error::DataLoadError;
use viz_rs::ChartError;

const WEATHER: &str = r#"[
  { "date": "2018-01-01", "temperatureMax": 51.2, "humidity": 0.82 },
  { "date": "2018-01-02", "temperatureMax": 49.0, "humidity": 0.6 }
]"#;

const INDICATORS: &str = "Country Code,Series Name,2017 [YR2017]
FRA,Population growth (annual %),0.39
NOR,Population growth (annual %),..
FRA,Net migration,182000
";

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("viz-rs-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).expect("write scratch file");
    path
}

#[test]
fn json_reader_yields_records() {
    let rows: Vec<Record> = load_json(WEATHER.as_bytes()).expect("valid json");

    assert_eq!(rows.len(), 2);
    assert_eq!(FieldAccessor::new("temperatureMax").get(&rows[1]), Some(49.0));
}

#[test]
fn malformed_json_reports_origin() {
    let err = load_json::<Vec<Record>, _>("[{".as_bytes()).expect_err("truncated");
    match err {
        ChartError::DataLoad(DataLoadError::Json { origin, .. }) => assert_eq!(origin, "<reader>"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn csv_cells_stay_strings_and_parse_on_read() {
    let rows = load_csv_records(INDICATORS.as_bytes()).expect("valid csv");
    let value = FieldAccessor::new("2017 [YR2017]");
    let code = TextAccessor::new("Country Code");

    assert_eq!(rows.len(), 3);
    assert_eq!(code.get(&rows[0]).as_deref(), Some("FRA"));
    assert_eq!(value.get(&rows[0]), Some(0.39));
    assert_eq!(value.get(&rows[1]), None, "`..` marks a missing value");
}

#[test]
fn files_load_through_the_same_parsers() {
    let json_path = scratch_file("weather.json", WEATHER);
    let rows: Vec<Record> = load_json_file(&json_path).expect("json file");
    assert_eq!(rows.len(), 2);

    let csv_path = scratch_file("indicators.csv", INDICATORS);
    let rows = load_csv_file(&csv_path).expect("csv file");
    assert_eq!(rows.len(), 3);

    let _ = std::fs::remove_file(json_path);
    let _ = std::fs::remove_file(csv_path);
}

#[test]
fn missing_file_is_an_io_error_naming_the_path() {
    let err = load_csv_file("/definitely/not/here.csv").expect_err("missing file");
    match err {
        ChartError::DataLoad(DataLoadError::Io { origin, .. }) => {
            assert_eq!(origin, "/definitely/not/here.csv");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(
        load_json_file::<Vec<Record>, _>("/definitely/not/here.json")
            .expect_err("missing file")
            .to_string()
            .contains("failed to read")
    );
}
