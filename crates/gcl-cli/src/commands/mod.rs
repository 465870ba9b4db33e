//! Subcommand implementations.

pub mod batch;
pub mod explain;
pub mod query;
pub mod stats;

use crate::app::App;
use gcl_core::Interval;

/// One result as a JSON object.
fn interval_json(app: &App, interval: &Interval) -> serde_json::Value {
    if app.config.output.snippets {
        serde_json::json!({
            "start": interval.start,
            "end": interval.end,
            "text": app.snippet(interval),
        })
    } else {
        serde_json::json!({
            "start": interval.start,
            "end": interval.end,
        })
    }
}

/// Print one result per line, with its snippet when enabled.
fn print_intervals(app: &App, intervals: &[Interval]) {
    for interval in intervals {
        if app.config.output.snippets {
            println!("{}  {}", interval, app.snippet(interval));
        } else {
            println!("{}", interval);
        }
    }
}
