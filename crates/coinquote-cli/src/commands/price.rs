use std::io::Write;

use coinquote_core::{format, SourceAggregator};

use crate::cli::{Cli, PriceArgs};
use crate::commands::write_json;
use crate::error::CliError;

pub async fn run<W: Write>(
    args: &PriceArgs,
    cli: &Cli,
    aggregator: &SourceAggregator,
    out: &mut W,
) -> Result<(), CliError> {
    let record = aggregator.lookup(&args.symbol).await?;

    if cli.json {
        write_json(out, &format::to_json(&record), cli.pretty)
    } else {
        writeln!(out, "{}", format::render(&record))?;
        Ok(())
    }
}
