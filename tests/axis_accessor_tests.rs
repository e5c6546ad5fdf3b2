use chrono::NaiveDate;
use serde_json::json;
use viz_rs::ChartError;
use viz_rs::core::{
    Accessor, Axis, AxisOrient, DateAccessor, FieldAccessor, FnAccessor, LinearScale, Record,
    TextAccessor, array, collect_defined, require, tick_count_for_span,
};
use viz_rs::render::{Node, TextHAlign};

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().expect("object literal")
}

#[test]
fn bottom_axis_places_ticks_and_labels() {
    let scale = LinearScale::linear(0.0, 100.0, 0.0, 500.0).expect("scale");
    let axis = Axis::linear(AxisOrient::Bottom, &scale, 5).with_title("Humidity");

    let offsets: Vec<f64> = axis.ticks().iter().map(|tick| tick.offset).collect();
    assert_eq!(offsets, vec![0.0, 100.0, 200.0, 300.0, 400.0, 500.0]);

    let group = axis.render();
    assert_eq!(group.class.as_deref(), Some("axis axis--bottom"));
    let counts = group.counts();
    assert_eq!(counts.lines, 7, "domain line plus one per tick");
    assert_eq!(counts.texts, 7, "six labels plus the title");

    let labels: Vec<&str> = group
        .children
        .iter()
        .filter_map(|node| match node {
            Node::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels.first(), Some(&"0"));
    assert_eq!(labels.last(), Some(&"Humidity"));
}

#[test]
fn left_axis_labels_align_right_and_title_rotates() {
    let scale = LinearScale::linear(0.0, 10.0, 200.0, 0.0).expect("scale");
    let group = Axis::linear(AxisOrient::Left, &scale, 2)
        .with_title("Count")
        .render();

    let texts: Vec<_> = group
        .children
        .iter()
        .filter_map(|node| match node {
            Node::Text(text) => Some(text),
            _ => None,
        })
        .collect();
    let (title, labels) = texts.split_last().expect("title present");
    assert!(labels.iter().all(|text| text.h_align == TextHAlign::Right));
    assert_eq!(title.rotation, -90.0);
    assert!(title.x < 0.0);
}

#[test]
fn tick_count_follows_available_space() {
    assert_eq!(tick_count_for_span(500.0, 100.0, 2, 10), 6);
    assert_eq!(tick_count_for_span(50.0, 100.0, 2, 10), 2);
    assert_eq!(tick_count_for_span(f64::NAN, 100.0, 3, 10), 3);
    assert_eq!(tick_count_for_span(5_000.0, 10.0, 2, 10), 10);
}

#[test]
fn field_accessor_reads_numbers_and_numeric_strings() {
    let accessor = FieldAccessor::new("temperatureMax");
    assert_eq!(accessor.get(&record(json!({ "temperatureMax": 71.2 }))), Some(71.2));
    assert_eq!(accessor.get(&record(json!({ "temperatureMax": " 3.5 " }))), Some(3.5));
    assert_eq!(accessor.get(&record(json!({ "temperatureMax": "n/a" }))), None);
    assert_eq!(accessor.get(&record(json!({ "other": 1 }))), None);
}

#[test]
fn date_accessor_parses_dates_and_datetimes() {
    let date = DateAccessor::new("date");
    let expected = NaiveDate::from_ymd_opt(2018, 3, 14)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .expect("valid date");
    assert_eq!(date.get(&record(json!({ "date": "2018-03-14" }))), Some(expected));
    assert_eq!(date.get(&record(json!({ "date": 20180314 }))), None);

    let stamp = DateAccessor::with_format("time", "%Y-%m-%d %H:%M");
    let parsed = stamp
        .get(&record(json!({ "time": "2018-03-14 09:30" })))
        .expect("datetime");
    assert_eq!(parsed.format("%H:%M").to_string(), "09:30");
}

#[test]
fn text_accessor_stringifies_scalars() {
    let accessor = TextAccessor::new("code");
    assert_eq!(accessor.get(&record(json!({ "code": "FRA" }))).as_deref(), Some("FRA"));
    assert_eq!(accessor.get(&record(json!({ "code": 42 }))).as_deref(), Some("42"));
    assert_eq!(accessor.get(&record(json!({ "code": null }))), None);
}

#[test]
fn require_reports_the_first_missing_index() {
    let rows = vec![
        record(json!({ "value": 1 })),
        record(json!({ "value": 2 })),
        record(json!({})),
    ];
    let accessor = FieldAccessor::new("value");

    let err = require(&rows, &accessor).expect_err("missing field");
    match err {
        ChartError::MissingField { field, index } => {
            assert_eq!(field, "value");
            assert_eq!(index, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(collect_defined(&rows, &accessor), vec![1.0, 2.0]);
}

#[test]
fn fn_accessor_wraps_typed_datasets() {
    struct Sale {
        amount: f64,
    }
    let accessor = FnAccessor::new("amount", |sale: &Sale| Some(sale.amount));
    let sales = [Sale { amount: 3.0 }, Sale { amount: 5.0 }];

    assert_eq!(Accessor::<Sale>::name(&accessor), "amount");
    assert_eq!(require(&sales, &accessor).expect("all present"), vec![3.0, 5.0]);
}

#[test]
fn array_reducers_skip_missing_values() {
    let values = [4.0, f64::NAN, 1.0, 7.0, f64::INFINITY];
    assert_eq!(array::extent(values), Some((1.0, 7.0)));
    assert_eq!(array::mean(values), Some(4.0));
    assert_eq!(array::median(values), Some(4.0));
    assert_eq!(array::extent([f64::NAN]), None);
    assert_eq!(array::least_index([3.0, 1.0, 1.0]), Some(1));
}

#[test]
fn group_preserves_first_seen_order() {
    let groups = array::group(["apple", "avocado", "banana", "cherry", "blueberry"], |item| {
        item.chars().next().unwrap_or(' ')
    });
    let keys: Vec<char> = groups.keys().copied().collect();
    assert_eq!(keys, vec!['a', 'b', 'c']);
    assert_eq!(groups[&'b'], vec!["banana", "blueberry"]);
}
