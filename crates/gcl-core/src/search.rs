//! Search execution for GCL queries.
//!
//! A [`Searcher`] turns a [`SearchRequest`] (query text plus arguments,
//! direction, start position and limit) into a list of intervals. It is the
//! layer the CLI talks to:
//! - Parses and compiles the query through the facade
//! - Normalizes phrase tokens with the corpus tokenizer, when one is set
//! - Scans in either direction and stops at the result limit
//!
//! ## Performance
//!
//! Single queries are evaluated lazily and stop pulling intervals at the
//! limit. Batches use parallel iteration via Rayon once they reach the
//! configured threshold; each worker scans its own tree.

use crate::config::QueryConfig;
use crate::error::Result;
use crate::gcl::Gcl;
use crate::generator::Intervals;
use crate::index::Tokenizer;
use crate::query::{self, Argument};
use crate::types::{Interval, Position};
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// One query to run.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// Query text
    pub expression: String,

    /// Values for `%1`, `%2`, ...
    pub args: Vec<Argument>,

    /// Scan backward from the end of the corpus
    pub reverse: bool,

    /// Start position (default: corpus start, or corpus end when reversed)
    pub from: Option<Position>,

    /// Result cap (default: the configured `max_results`)
    pub limit: Option<usize>,
}

impl SearchRequest {
    /// Create a forward request for `expression`.
    pub fn new(expression: impl Into<String>) -> Self {
        SearchRequest {
            expression: expression.into(),
            ..Default::default()
        }
    }

    /// Append an argument.
    pub fn with_arg(mut self, arg: impl Into<Argument>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Replace all arguments.
    pub fn with_args(mut self, args: Vec<Argument>) -> Self {
        self.args = args;
        self
    }

    /// Set the scan direction.
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Start the scan at `position`.
    pub fn from(mut self, position: Position) -> Self {
        self.from = Some(position);
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Outcome of one search.
#[derive(Debug, Clone)]
pub struct SearchResults {
    /// Matches in scan order
    pub intervals: Vec<Interval>,

    /// More matches existed past the limit
    pub truncated: bool,

    /// Wall time spent compiling and scanning
    pub elapsed: Duration,
}

impl SearchResults {
    /// Number of intervals returned.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Check if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Runs requests against one facade.
#[derive(Debug, Clone)]
pub struct Searcher {
    gcl: Gcl,
    config: QueryConfig,
    tokenizer: Option<Tokenizer>,
}

impl Searcher {
    /// Create a searcher. Phrase tokens are matched verbatim until a
    /// tokenizer is attached.
    pub fn new(gcl: &Gcl, config: &QueryConfig) -> Self {
        Searcher {
            gcl: gcl.clone(),
            config: config.clone(),
            tokenizer: None,
        }
    }

    /// Normalize query phrase tokens with `tokenizer` before compiling.
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// The facade queries are compiled against.
    pub fn gcl(&self) -> &Gcl {
        &self.gcl
    }

    /// Run a single request.
    #[instrument(skip(self, request), fields(expression = %request.expression, reverse = request.reverse))]
    pub fn run(&self, request: &SearchRequest) -> Result<SearchResults> {
        let started = Instant::now();

        let mut expr = query::parse(&request.expression)?;
        if let Some(tokenizer) = &self.tokenizer {
            expr = expr.normalized(tokenizer);
        }
        debug!(expr = %expr, args = request.args.len(), "Compiling query");
        let generator = query::compile(&self.gcl, &expr, &request.args)?;

        let limit = request.limit.unwrap_or(self.config.max_results);
        let mut intervals = Vec::new();
        let mut truncated = false;

        for interval in Intervals::new(generator.as_ref(), request.from, request.reverse) {
            let interval = interval?;
            if intervals.len() >= limit {
                truncated = true;
                break;
            }
            intervals.push(interval);
        }

        let elapsed = started.elapsed();
        if truncated {
            warn!(limit, "Search truncated at result limit");
        }
        info!(
            results = intervals.len(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Search complete"
        );

        Ok(SearchResults {
            intervals,
            truncated,
            elapsed,
        })
    }

    /// Run many requests; results keep request order.
    ///
    /// Uses parallel iteration via Rayon when enabled and the batch is at
    /// least `parallel_threshold` requests long.
    pub fn run_batch(&self, requests: &[SearchRequest]) -> Vec<Result<SearchResults>> {
        if self.config.parallel && requests.len() >= self.config.parallel_threshold {
            debug!(requests = requests.len(), "Running batch in parallel");
            requests.par_iter().map(|r| self.run(r)).collect()
        } else {
            requests.iter().map(|r| self.run(r)).collect()
        }
    }
}
