// File: crates/strata-core/tests/normalize.rs
// Purpose: Validate cleaning and normalization invariants over raw input.

use strata_core::{clean, normalize, ChartType, Datum, KeyType, RawInput, RawSeries};

fn raw_one_series() -> RawInput {
    RawInput {
        series: vec![RawSeries::new("a").with_values(vec![
            (Datum::from("2020-02-01"), Datum::from(20.0)),
            (Datum::from("2020-01-01"), Datum::from(10.0)),
        ])],
    }
}

#[test]
fn flat_data_is_strictly_ascending_and_deduplicated() {
    let series = clean(&raw_one_series(), KeyType::Time);
    let data = normalize(series, ChartType::Line, &[]);

    assert_eq!(data.flat_data_sorted.len(), 2);
    for pair in data.flat_data_sorted.windows(2) {
        assert!(pair[0].key < pair[1].key, "keys must strictly ascend");
    }
    assert_eq!(data.data_by_key.len(), data.flat_data_sorted.len());
}

#[test]
fn non_numeric_values_are_dropped_silently() {
    let raw = RawInput {
        series: vec![RawSeries::new("a").with_values(vec![(
            Datum::from("2020-01-01"),
            Datum::from("n/a"),
        )])],
    };
    let series = clean(&raw, KeyType::Time);
    assert_eq!(series[0].values.len(), 0);

    let data = normalize(series, ChartType::Line, &[]);
    assert!(data.is_empty());
}

#[test]
fn unparseable_keys_are_dropped_silently() {
    let raw = RawInput {
        series: vec![RawSeries::new("a").with_values(vec![
            (Datum::from("not a date"), Datum::from(1.0)),
            (Datum::from("2020-01-01"), Datum::from(2.0)),
            (Datum::Null, Datum::from(3.0)),
        ])],
    };
    let series = clean(&raw, KeyType::Time);
    assert_eq!(series[0].values.len(), 1);
}

#[test]
fn numeric_text_values_coerce() {
    let raw = RawInput {
        series: vec![RawSeries::new("a").with_values(vec![(
            Datum::from(3.0),
            Datum::from(" 42.5 "),
        )])],
    };
    let series = clean(&raw, KeyType::Number);
    assert_eq!(series[0].values[0].value, 42.5);
}

#[test]
fn duplicate_keys_within_a_series_merge_by_summation() {
    let raw = RawInput {
        series: vec![RawSeries::new("a").with_values(vec![
            (Datum::from(1.0), Datum::from(5.0)),
            (Datum::from(1.0), Datum::from(7.0)),
            (Datum::from(2.0), Datum::from(1.0)),
        ])],
    };
    let data = normalize(clean(&raw, KeyType::Number), ChartType::Line, &[]);

    let a = &data.data_by_series[0];
    assert_eq!(a.values.len(), 2);
    assert_eq!(a.values[0].value, 12.0);
}

#[test]
fn second_axis_is_derived_from_groups() {
    let raw = RawInput {
        series: vec![
            RawSeries::new("a").with_values(vec![(Datum::from(1.0), Datum::from(1.0))]),
            RawSeries::new("b")
                .with_group(1)
                .with_values(vec![(Datum::from(1.0), Datum::from(2.0))]),
        ],
    };
    let data = normalize(clean(&raw, KeyType::Number), ChartType::Line, &[]);

    assert!(data.has_second_axis);
    assert_eq!(data.group_keys.len(), 2);
    assert!(data.group_keys[&0].contains("a"));
    assert!(data.group_keys[&1].contains("b"));

    let single = RawInput {
        series: vec![RawSeries::new("a").with_values(vec![(Datum::from(1.0), Datum::from(1.0))])],
    };
    let data = normalize(clean(&single, KeyType::Number), ChartType::Line, &[]);
    assert!(!data.has_second_axis);
}

#[test]
fn series_order_override_reorders_stacking_and_legend_order() {
    let raw = RawInput {
        series: vec![
            RawSeries::new("a").with_values(vec![(Datum::from(1.0), Datum::from(1.0))]),
            RawSeries::new("b").with_values(vec![(Datum::from(1.0), Datum::from(2.0))]),
            RawSeries::new("c").with_values(vec![(Datum::from(1.0), Datum::from(3.0))]),
        ],
    };
    let order = vec!["c".to_string(), "a".to_string()];
    let data = normalize(clean(&raw, KeyType::Number), ChartType::Line, &order);

    let ids: Vec<&str> = data.data_by_series.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);

    // Pivot rows follow the same order.
    let row: Vec<&str> = data.data_by_key[0]
        .values
        .iter()
        .map(|v| v.series_id.as_str())
        .collect();
    assert_eq!(row, vec!["c", "a", "b"]);
}

#[test]
fn raw_input_decodes_from_json() {
    let json = r#"{
        "series": [
            {
                "id": "sales",
                "label": "Sales",
                "group": 0,
                "values": [
                    {"key": "2020-01-01", "value": 10},
                    {"key": "2020-02-01", "value": "n/a"}
                ]
            }
        ]
    }"#;
    let raw: RawInput = serde_json::from_str(json).expect("decode raw input");
    let series = clean(&raw, KeyType::Time);
    assert_eq!(series[0].values.len(), 1);
    assert_eq!(series[0].values[0].value, 10.0);
}

#[test]
fn category_keys_normalize_in_lexical_order() {
    let raw = RawInput {
        series: vec![RawSeries::new("a").with_values(vec![
            (Datum::from("west"), Datum::from(3.0)),
            (Datum::from("east"), Datum::from(1.0)),
        ])],
    };
    let data = normalize(clean(&raw, KeyType::String), ChartType::Bar, &[]);
    let keys: Vec<String> = data
        .flat_data_sorted
        .iter()
        .map(|p| p.key.to_string())
        .collect();
    assert_eq!(keys, vec!["east", "west"]);
}
