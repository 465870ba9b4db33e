//! Batch command - run a file of queries over one corpus.

use super::{interval_json, print_intervals};
use crate::app::App;
use crate::OutputFormat;
use anyhow::Context;
use gcl_core::{Config, SearchRequest};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Query lines of a batch file: blank lines and `#` comments are skipped.
fn read_queries(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read queries {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Run the batch command.
pub fn run(
    config: Config,
    corpus: &Path,
    queries: &Path,
    limit: Option<usize>,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let app = App::open(config, corpus)?;
    let expressions = read_queries(queries)?;

    let requests: Vec<SearchRequest> = expressions
        .iter()
        .map(|e| {
            let mut request = SearchRequest::new(e.as_str());
            request.limit = limit;
            request
        })
        .collect();

    let start = Instant::now();
    let outcomes = app.searcher().run_batch(&requests);
    let elapsed = start.elapsed();

    match output {
        OutputFormat::Text => {
            let mut failed = 0;
            for (expression, outcome) in expressions.iter().zip(&outcomes) {
                println!("== {}", expression);
                match outcome {
                    Ok(results) => {
                        print_intervals(&app, &results.intervals);
                        if results.truncated {
                            println!("   (limit reached)");
                        }
                    }
                    Err(e) => {
                        failed += 1;
                        println!("   error: {}", e);
                    }
                }
            }

            eprintln!();
            eprintln!(
                "Ran {} queries ({} failed) in {:.3}ms",
                requests.len(),
                failed,
                elapsed.as_secs_f64() * 1000.0
            );
        }
        OutputFormat::Json => {
            let json_results: Vec<serde_json::Value> = expressions
                .iter()
                .zip(&outcomes)
                .map(|(expression, outcome)| match outcome {
                    Ok(results) => serde_json::json!({
                        "query": expression,
                        "results": results
                            .intervals
                            .iter()
                            .map(|i| interval_json(&app, i))
                            .collect::<Vec<_>>(),
                        "truncated": results.truncated,
                    }),
                    Err(e) => serde_json::json!({
                        "query": expression,
                        "error": e.to_string(),
                    }),
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&json_results)?);
        }
    }

    Ok(())
}
