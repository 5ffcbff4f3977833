// File: crates/strata-core/tests/stacking.rs
// Purpose: Validate cumulative stack layout and its alignment fallback.

use strata_core::{clean, normalize, ChartType, Datum, KeyType, RawInput, RawSeries};

fn two_series_at_key_one() -> RawInput {
    RawInput {
        series: vec![
            RawSeries::new("a").with_values(vec![(Datum::from(1.0), Datum::from(5.0))]),
            RawSeries::new("b").with_values(vec![(Datum::from(1.0), Datum::from(3.0))]),
        ],
    }
}

#[test]
fn stack_layers_are_ordered_partial_sums() {
    let data = normalize(
        clean(&two_series_at_key_one(), KeyType::Number),
        ChartType::StackedArea,
        &[],
    );
    let stack = data.stack_data.expect("stacked chart type has stack data");
    let ends: Vec<f64> = stack[0].layers.iter().map(|l| l.end).collect();
    assert_eq!(ends, vec![5.0, 8.0]);
    assert_eq!(stack[0].layers[0].start, 0.0, "baseline starts at 0");
    assert_eq!(stack[0].layers[1].start, 5.0);
}

#[test]
fn stack_top_equals_sum_of_all_series_at_each_key() {
    let raw = RawInput {
        series: vec![
            RawSeries::new("a").with_values(vec![
                (Datum::from(1.0), Datum::from(2.0)),
                (Datum::from(2.0), Datum::from(4.0)),
            ]),
            RawSeries::new("b").with_values(vec![
                (Datum::from(1.0), Datum::from(1.0)),
                (Datum::from(2.0), Datum::from(7.0)),
            ]),
        ],
    };
    let data = normalize(clean(&raw, KeyType::Number), ChartType::Area, &[]);
    let stack = data.stack_data.unwrap();

    for entry in &stack {
        let sum: f64 = data
            .data_by_key
            .iter()
            .find(|e| e.key == entry.key)
            .unwrap()
            .values
            .iter()
            .map(|v| v.value)
            .sum();
        assert_eq!(entry.total(), sum);
    }
}

#[test]
fn missing_keys_stack_as_zero_without_breaking_alignment() {
    let raw = RawInput {
        series: vec![
            RawSeries::new("a").with_values(vec![
                (Datum::from(1.0), Datum::from(5.0)),
                (Datum::from(2.0), Datum::from(6.0)),
            ]),
            // "b" has no observation at key 2.
            RawSeries::new("b").with_values(vec![(Datum::from(1.0), Datum::from(3.0))]),
        ],
    };
    let data = normalize(clean(&raw, KeyType::Number), ChartType::StackedArea, &[]);
    let stack = data.stack_data.unwrap();

    assert_eq!(stack.len(), 2);
    for entry in &stack {
        assert_eq!(entry.layers.len(), 2, "every key carries every series");
    }
    let at_two = &stack[1];
    assert_eq!(at_two.layers[0].end, 6.0);
    assert_eq!(at_two.layers[1].start, 6.0);
    assert_eq!(at_two.layers[1].end, 6.0, "missing key stacks as zero");
}

#[test]
fn stacking_order_follows_series_order() {
    let order = vec!["b".to_string(), "a".to_string()];
    let data = normalize(
        clean(&two_series_at_key_one(), KeyType::Number),
        ChartType::StackedArea,
        &order,
    );
    let stack = data.stack_data.unwrap();
    assert_eq!(stack[0].layers[0].series_id, "b");
    let ends: Vec<f64> = stack[0].layers.iter().map(|l| l.end).collect();
    assert_eq!(ends, vec![3.0, 8.0]);
}

#[test]
fn unstacked_chart_types_have_no_stack_data() {
    let data = normalize(
        clean(&two_series_at_key_one(), KeyType::Number),
        ChartType::Line,
        &[],
    );
    assert!(data.stack_data.is_none());
}

#[test]
fn second_axis_series_do_not_participate_in_the_stack() {
    let raw = RawInput {
        series: vec![
            RawSeries::new("a").with_values(vec![(Datum::from(1.0), Datum::from(5.0))]),
            RawSeries::new("rate")
                .with_group(1)
                .with_values(vec![(Datum::from(1.0), Datum::from(0.4))]),
        ],
    };
    let data = normalize(clean(&raw, KeyType::Number), ChartType::StackedArea, &[]);
    let stack = data.stack_data.unwrap();
    assert_eq!(stack[0].layers.len(), 1);
    assert_eq!(stack[0].total(), 5.0);
}
