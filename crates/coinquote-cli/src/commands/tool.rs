use std::io::Write;
use std::sync::Arc;

use coinquote_agent::{function_schema, CryptoTool};
use coinquote_core::SourceAggregator;

use crate::cli::{ToolArgs, ToolCommand};
use crate::error::CliError;

pub async fn run<W: Write>(
    args: &ToolArgs,
    aggregator: Arc<SourceAggregator>,
    out: &mut W,
) -> Result<(), CliError> {
    match &args.command {
        ToolCommand::Schema => {
            crate::commands::write_json(out, &function_schema(), true)?;
        }
        ToolCommand::Call(call) => {
            let tool = CryptoTool::new(aggregator);
            writeln!(out, "{}", tool.handle_call(&call.arguments).await)?;
        }
    }
    Ok(())
}
