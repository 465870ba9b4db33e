//! Application state management.

use anyhow::Context;
use gcl_core::{
    Argument, Config, Gcl, Interval, MemoryIndex, Position, Searcher, Tokenizer,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Shared application state.
pub struct App {
    /// Configuration
    pub config: Config,

    /// The indexed corpus
    pub index: Arc<MemoryIndex>,

    /// Query facade over `index`
    pub gcl: Gcl,

    /// Tokenizer the corpus was indexed with
    pub tokenizer: Tokenizer,
}

impl App {
    /// Read and index a corpus file.
    pub fn open(config: Config, corpus: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(corpus)
            .with_context(|| format!("Failed to read corpus {}", corpus.display()))?;
        let tokenizer = config.index.tokenizer()?;
        let index = Arc::new(MemoryIndex::from_text(&text, &tokenizer));
        let gcl = Gcl::with_config(index.clone(), &config.query);

        info!(
            corpus = %corpus.display(),
            positions = index.len(),
            "Application initialized"
        );

        Ok(App {
            config,
            index,
            gcl,
            tokenizer,
        })
    }

    /// A searcher that normalizes query tokens like the corpus.
    pub fn searcher(&self) -> Searcher {
        Searcher::new(&self.gcl, &self.config.query).with_tokenizer(self.tokenizer.clone())
    }

    /// Turn a command-line value into a query argument.
    ///
    /// Integers become positions, comma-separated values phrases, and
    /// anything else a single normalized token. A value wrapped in quotes
    /// is never a position, so `'12'` is the token "12".
    pub fn parse_argument(&self, raw: &str) -> Argument {
        let raw = raw.trim();
        let unquoted = ['\'', '"']
            .iter()
            .find_map(|&q| raw.strip_prefix(q).and_then(|rest| rest.strip_suffix(q)));
        let raw = match unquoted {
            Some(inner) => inner,
            None => {
                if let Ok(position) = raw.parse::<Position>() {
                    return Argument::Position(position);
                }
                raw
            }
        };
        if raw.contains(',') {
            let tokens = raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| self.tokenizer.normalize(t))
                .collect();
            return Argument::Phrase(tokens);
        }
        Argument::Term(self.tokenizer.normalize(raw))
    }

    /// The tokens covered by `interval`, elided in the middle when longer
    /// than the configured maximum.
    pub fn snippet(&self, interval: &Interval) -> String {
        let tokens = self.index.tokens_between(interval.start, interval.end);
        let max = self.config.output.max_snippet_tokens.max(2);

        if tokens.len() <= max {
            return tokens.join(" ");
        }

        let head = max / 2;
        let tail = max - head;
        format!(
            "{} ... {}",
            tokens[..head].join(" "),
            tokens[tokens.len() - tail..].join(" ")
        )
    }
}
