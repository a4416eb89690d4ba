use std::io::Write;

use coinquote_agent::OVERVIEW_ASSETS;
use coinquote_core::{format, SourceAggregator};
use serde_json::{json, Map, Value};

use crate::cli::Cli;
use crate::commands::write_json;
use crate::error::CliError;

/// Resolves each symbol in turn; any failure makes the command exit non-zero
/// after every result has been written.
pub async fn run<S, W>(
    symbols: &[S],
    cli: &Cli,
    aggregator: &SourceAggregator,
    out: &mut W,
) -> Result<(), CliError>
where
    S: AsRef<str>,
    W: Write,
{
    let mut results = Map::with_capacity(symbols.len());
    let mut failed = 0_usize;

    for symbol in symbols {
        let symbol = symbol.as_ref();
        let entry = match aggregator.lookup(symbol).await {
            Ok(record) => {
                if !cli.json {
                    writeln!(out, "{}\n", format::render(&record))?;
                }
                format::to_json(&record)
            }
            Err(error) => {
                failed += 1;
                let message = error.user_message();
                if !cli.json {
                    writeln!(out, "{symbol}: {message}\n")?;
                }
                json!({ "error": message })
            }
        };
        results.insert(symbol.to_owned(), entry);
    }

    if cli.json {
        write_json(out, &Value::Object(results), cli.pretty)?;
    }

    if failed > 0 {
        return Err(CliError::PartialBatch {
            failed,
            total: symbols.len(),
        });
    }
    Ok(())
}

pub async fn overview<W: Write>(
    cli: &Cli,
    aggregator: &SourceAggregator,
    out: &mut W,
) -> Result<(), CliError> {
    run(&OVERVIEW_ASSETS[..], cli, aggregator, out).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::btc_only;
    use clap::Parser;

    #[tokio::test]
    async fn json_batch_keys_results_by_input_and_reports_partial_failure() {
        let cli = Cli::try_parse_from(["coinquote", "batch", "btc", "zzz", "--json"])
            .expect("valid arguments");
        let mut sink = Vec::new();

        let error = run(&["btc", "zzz"][..], &cli, &btc_only(), &mut sink)
            .await
            .expect_err("zzz is unknown");

        assert!(matches!(error, CliError::PartialBatch { failed: 1, total: 2 }));
        assert_eq!(error.exit_code(), 3);

        let body: Value = serde_json::from_slice(&sink).expect("json output");
        assert_eq!(body["btc"]["symbol"], "BTC/USDT");
        assert!(body["zzz"]["error"].as_str().is_some_and(|m| m.contains("'ZZZ'")));
    }

    #[tokio::test]
    async fn text_batch_writes_every_result() {
        let cli = Cli::try_parse_from(["coinquote", "batch", "btc"]).expect("valid arguments");
        let mut sink = Vec::new();

        run(&["btc"][..], &cli, &btc_only(), &mut sink).await.expect("btc resolves");

        assert!(String::from_utf8_lossy(&sink).contains("Bitcoin (BTC/USDT)"));
    }
}
