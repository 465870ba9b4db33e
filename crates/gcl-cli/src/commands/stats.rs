//! Stats command - show index statistics for a corpus.

use crate::app::App;
use crate::OutputFormat;
use gcl_core::Config;
use std::path::Path;

/// Run the stats command.
pub fn run(config: Config, corpus: &Path, output: OutputFormat) -> anyhow::Result<()> {
    let app = App::open(config, corpus)?;
    let stats = app.index.stats();

    match output {
        OutputFormat::Text => {
            println!("GCL Index Statistics");
            println!("====================");
            println!();
            println!("  Corpus:        {}", corpus.display());
            println!("  Positions:     {}", stats.corpus_length);
            println!("  Vocabulary:    {}", stats.vocabulary);
            println!("  Postings:      {}", stats.postings);
            println!("  Iteration cap: {}", app.gcl.iteration_limit());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
