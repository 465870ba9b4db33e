//! Query command - run one expression over a corpus.

use super::{interval_json, print_intervals};
use crate::app::App;
use crate::OutputFormat;
use gcl_core::{Config, Position, SearchRequest};
use std::path::Path;

/// Run the query command.
#[allow(clippy::too_many_arguments)]
pub fn run(
    config: Config,
    corpus: &Path,
    expression: &str,
    args: &[String],
    reverse: bool,
    from: Option<Position>,
    limit: Option<usize>,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let app = App::open(config, corpus)?;

    let mut request = SearchRequest::new(expression)
        .with_args(args.iter().map(|a| app.parse_argument(a)).collect())
        .reverse(reverse);
    request.from = from;
    request.limit = limit;

    let results = app.searcher().run(&request)?;

    match output {
        OutputFormat::Text => {
            print_intervals(&app, &results.intervals);

            eprintln!();
            eprintln!(
                "Found {} results in {:.3}ms{}",
                results.len(),
                results.elapsed.as_secs_f64() * 1000.0,
                if results.truncated {
                    " (limit reached)"
                } else {
                    ""
                }
            );
        }
        OutputFormat::Json => {
            let json_results: Vec<serde_json::Value> = results
                .intervals
                .iter()
                .map(|i| interval_json(&app, i))
                .collect();

            println!("{}", serde_json::to_string_pretty(&json_results)?);
        }
    }

    Ok(())
}
