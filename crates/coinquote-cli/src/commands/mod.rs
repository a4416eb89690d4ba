mod batch;
mod price;
mod serve;
mod tool;

use std::io::{self, Write};
use std::sync::Arc;

use coinquote_core::{ResolverConfig, SourceAggregator, SourceAggregatorBuilder};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let aggregator = build_aggregator(cli);
    let mut out = io::stdout();

    match &cli.command {
        Command::Price(args) => price::run(args, cli, &aggregator, &mut out).await,
        Command::Batch(args) => batch::run(&args.symbols[..], cli, &aggregator, &mut out).await,
        Command::Overview => batch::overview(cli, &aggregator, &mut out).await,
        Command::Serve(args) => serve::run(args, aggregator).await,
        Command::Tool(args) => tool::run(args, aggregator, &mut out).await,
    }
}

fn build_aggregator(cli: &Cli) -> Arc<SourceAggregator> {
    let mut config = ResolverConfig::from_env();
    if let Some(timeout_ms) = cli.timeout_ms.filter(|ms| *ms > 0) {
        config = config.with_timeout_ms(timeout_ms);
    }
    tracing::debug!(timeout_ms = config.timeout_ms, "resolver configured");

    Arc::new(SourceAggregatorBuilder::new().with_config(config).build())
}

fn write_json<W: Write>(out: &mut W, value: &Value, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{rendered}")?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::ClosedPipe;
    use super::*;
    use serde_json::json;

    #[test]
    fn json_output_ends_with_newline() {
        let mut sink = Vec::new();
        write_json(&mut sink, &json!({"symbol": "BTC/USDT"}), false).expect("writable sink");

        assert_eq!(String::from_utf8_lossy(&sink), "{\"symbol\":\"BTC/USDT\"}\n");
    }

    #[test]
    fn closed_stdout_surfaces_as_io_error() {
        let error = write_json(&mut ClosedPipe, &json!({}), true).expect_err("pipe is closed");

        assert!(matches!(error, CliError::Io(_)));
        assert_eq!(error.exit_code(), 10);
    }
}
