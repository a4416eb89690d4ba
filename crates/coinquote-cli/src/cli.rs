//! CLI argument definitions for coinquote.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `price` | Resolve one symbol |
//! | `batch` | Resolve several symbols |
//! | `overview` | Prices for the major assets |
//! | `serve` | Run the HTTP price service |
//! | `tool` | Function-calling schema and call handler |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--json` | `false` | Emit JSON instead of text |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `10000` | Per-request upstream timeout |
//!
//! # Examples
//!
//! ```bash
//! coinquote price btc
//! coinquote price eth/btc --json --pretty
//! coinquote batch btc eth sol
//! coinquote serve --addr 127.0.0.1:8080
//! coinquote tool call '{"symbol":"btc,eth","query_type":"batch"}'
//! ```

use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

/// Crypto price lookups across OKX, Binance, and CoinGecko.
#[derive(Debug, Parser)]
#[command(
    name = "coinquote",
    author,
    version,
    about = "Crypto price lookups with multi-source fallback"
)]
pub struct Cli {
    /// Emit JSON instead of human-readable text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request upstream timeout in milliseconds.
    #[arg(long, global = true, env = "COINQUOTE_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve the price of one symbol.
    ///
    /// # Examples
    ///
    ///   coinquote price btc
    ///   coinquote price eth/btc --json
    Price(PriceArgs),

    /// Resolve several symbols, one after another.
    ///
    /// # Examples
    ///
    ///   coinquote batch btc eth sol
    Batch(BatchArgs),

    /// Prices for BTC, ETH, BNB, SOL, XRP and ADA.
    Overview,

    /// Run the HTTP price service.
    Serve(ServeArgs),

    /// Function-calling tool for chat agents.
    Tool(ToolArgs),
}

/// Arguments for the `price` command.
#[derive(Debug, Args)]
pub struct PriceArgs {
    /// Symbol (`btc`) or explicit pair (`eth/btc`).
    pub symbol: String,
}

/// Arguments for the `batch` command.
#[derive(Debug, Args)]
pub struct BatchArgs {
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,
}

/// Arguments for the `serve` command.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address; takes precedence over `PORT`.
    #[arg(long)]
    pub addr: Option<SocketAddr>,

    /// Port bound on all interfaces when `--addr` is not given.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

/// Arguments for the `tool` command group.
#[derive(Debug, Args)]
pub struct ToolArgs {
    #[command(subcommand)]
    pub command: ToolCommand,
}

#[derive(Debug, Subcommand)]
pub enum ToolCommand {
    /// Print the OpenAI function definition.
    Schema,

    /// Answer one function call given its JSON arguments.
    Call(ToolCallArgs),
}

#[derive(Debug, Args)]
pub struct ToolCallArgs {
    /// Arguments object, e.g. '{"symbol":"BTC"}'.
    pub arguments: String,
}
