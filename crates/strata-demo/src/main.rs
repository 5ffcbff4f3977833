// File: crates/strata-demo/src/main.rs
// Summary: Demo feeds a JSON series file through the pipeline and prints
// derived domains, binned buckets, and a sample hover resolution.

use anyhow::{Context, Result};
use strata_core::{Chart, ChartEvent, ChartType, ConfigUpdate, EventKind, RawInput};

const SAMPLE: &str = r#"{
  "series": [
    {
      "id": "sales",
      "label": "Sales",
      "group": 0,
      "values": [
        {"key": "2020-01-05", "value": 10},
        {"key": "2020-02-11", "value": 20},
        {"key": "2020-02-21", "value": 5},
        {"key": "2020-04-02", "value": "n/a"},
        {"key": "2020-04-09", "value": 14}
      ]
    },
    {
      "id": "returns",
      "label": "Returns",
      "group": 0,
      "values": [
        {"key": "2020-01-17", "value": 3},
        {"key": "2020-03-06", "value": 6}
      ]
    }
  ]
}"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let raw: RawInput = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read '{path}'"))?;
            serde_json::from_str(&text).with_context(|| format!("failed to parse '{path}'"))?
        }
        None => serde_json::from_str(SAMPLE).context("failed to parse built-in sample")?,
    };

    let mut chart = Chart::new();
    chart.set_config(ConfigUpdate::new().chart_type(ChartType::StackedArea));
    chart.on(EventKind::MouseMovePanel, |event| {
        if let ChartEvent::MouseMovePanel { point, x_px, .. } = event {
            println!("hover -> {} at {x_px:.1}px", point.key);
            for v in &point.values {
                println!("    {} = {}", v.series_id, v.value);
            }
        }
    });
    chart.set_data(raw);

    let frame = chart.frame().context("no frame published")?;
    let binning = chart.binning_state();
    println!(
        "binning: {} ({})",
        binning.resolution,
        if binning.is_auto { "auto" } else { "manual" }
    );
    println!("x domain: {:?}", frame.scales.x.domain());
    println!("y domain: {:?}", frame.scales.y.domain);
    if let Some(y2) = frame.scales.y2 {
        println!("y2 domain: {:?}", y2.domain);
    }

    println!("buckets:");
    for entry in &frame.data.data_by_key {
        print!("  {}", entry.key);
        for v in &entry.values {
            print!("  {}={}", v.series_id, v.value);
        }
        println!();
    }

    if let Some(stack) = &frame.data.stack_data {
        println!("stack tops:");
        for entry in stack {
            println!("  {} -> {}", entry.key, entry.total());
        }
    }

    // Walk the pointer across the panel to exercise hover resolution.
    chart.pointer_entered(0.0, 0.0);
    let width = f64::from(chart.config().width);
    let mut x = 0.0;
    while x <= width {
        chart.pointer_moved(x, 100.0);
        x += width / 4.0;
    }
    chart.pointer_left();

    Ok(())
}
