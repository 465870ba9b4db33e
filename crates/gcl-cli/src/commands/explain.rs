//! Explain command - show how a query parses.

use gcl_core::query;

/// Run the explain command.
pub fn run(expression: &str) -> anyhow::Result<()> {
    let expr = query::parse(expression)?;

    println!("{}", expr);

    let parameters = expr.max_parameter();
    if parameters > 0 {
        eprintln!("Expects {} argument(s)", parameters);
    }

    Ok(())
}
