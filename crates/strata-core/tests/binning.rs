// File: crates/strata-core/tests/binning.rs
// Purpose: Validate bucket aggregation, truncation, and resolution selection.

use strata_core::{bin, select_resolution, Key, Point, Resolution, DEFAULT_LADDER};

const MS_PER_DAY: f64 = 86_400_000.0;

fn time_point(date: &str, value: f64) -> Point {
    Point {
        key: Key::parse_time(date).expect("valid date"),
        value,
        series_id: "a".to_string(),
    }
}

#[test]
fn year_binning_sums_months_into_one_bucket() {
    let points = vec![
        time_point("2020-01-01", 10.0),
        time_point("2020-02-01", 20.0),
    ];
    let binned = bin(&points, Resolution::Year);

    assert_eq!(binned.len(), 1);
    assert_eq!(binned[0].key, Key::parse_time("2020-01-01").unwrap());
    assert_eq!(binned[0].value, 30.0);
}

#[test]
fn binning_is_idempotent() {
    let points = vec![
        time_point("2019-03-14", 1.0),
        time_point("2019-06-02", 2.0),
        time_point("2020-11-30", 4.0),
        time_point("2021-01-01", 8.0),
    ];
    for resolution in DEFAULT_LADDER {
        let once = bin(&points, resolution);
        let twice = bin(&once, resolution);
        assert_eq!(once, twice, "rebinning at {resolution} must be a no-op");
    }
}

#[test]
fn truncation_lands_on_bucket_starts() {
    let t = |s: &str| Key::parse_time(s).unwrap();
    let cases = [
        (Resolution::Month, "2023-07-19", "2023-07-01"),
        (Resolution::Quarter, "2023-08-19", "2023-07-01"),
        (Resolution::Quarter, "2023-02-01", "2023-01-01"),
        (Resolution::Year, "2023-08-19", "2023-01-01"),
        (Resolution::Decade, "2023-08-19", "2020-01-01"),
    ];
    for (resolution, input, expected) in cases {
        let binned = bin(&[time_point(input, 1.0)], resolution);
        assert_eq!(binned[0].key, t(expected), "{resolution} truncation");
    }
}

#[test]
fn empty_buckets_are_omitted() {
    // Two observations a year apart: no synthetic zero-valued months between.
    let points = vec![
        time_point("2020-01-15", 1.0),
        time_point("2021-01-15", 2.0),
    ];
    let binned = bin(&points, Resolution::Month);
    assert_eq!(binned.len(), 2);
}

#[test]
fn non_time_keys_pass_through_unchanged() {
    let points = vec![
        Point { key: Key::Number(3.0), value: 1.0, series_id: "a".into() },
        Point { key: Key::Number(1.0), value: 2.0, series_id: "a".into() },
    ];
    let binned = bin(&points, Resolution::Month);
    assert_eq!(binned.len(), 2);
    assert_eq!(binned[0].key, Key::Number(1.0));
}

#[test]
fn manual_selection_is_never_overridden() {
    // A decade-long span at month resolution is far too dense for 100px,
    // but an explicit choice wins anyway.
    let span = 3650.0 * MS_PER_DAY;
    let picked = select_resolution(span, false, Resolution::Month, &DEFAULT_LADDER, 100.0);
    assert_eq!(picked, Resolution::Month);
}

#[test]
fn auto_selection_picks_finest_resolution_that_fits() {
    // Two years of data on a wide chart: months fit comfortably.
    let span = 730.0 * MS_PER_DAY;
    let picked = select_resolution(span, true, Resolution::Decade, &DEFAULT_LADDER, 800.0);
    assert_eq!(picked, Resolution::Month);

    // Same span on a very narrow chart: months (25 buckets) no longer fit,
    // quarters do.
    let picked = select_resolution(span, true, Resolution::Decade, &DEFAULT_LADDER, 80.0);
    assert_eq!(picked, Resolution::Quarter);
}

#[test]
fn auto_selection_falls_back_to_coarsest() {
    // A century of data on a tiny chart: nothing fits, coarsest wins.
    let span = 36500.0 * MS_PER_DAY;
    let picked = select_resolution(span, true, Resolution::Month, &DEFAULT_LADDER, 24.0);
    assert_eq!(picked, Resolution::Decade);
}

#[test]
fn resolution_tags_round_trip() {
    for resolution in DEFAULT_LADDER {
        let parsed: Resolution = resolution.tag().parse().unwrap();
        assert_eq!(parsed, resolution);
    }
    assert!("2w".parse::<Resolution>().is_err());
}
