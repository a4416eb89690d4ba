use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use coinquote_core::SourceAggregator;
use coinquote_web::DEFAULT_PORT;

use crate::cli::ServeArgs;
use crate::error::CliError;

pub async fn run(args: &ServeArgs, aggregator: Arc<SourceAggregator>) -> Result<(), CliError> {
    let addr = listen_addr(args);
    tracing::info!(
        sources = ?aggregator.source_chain(),
        "starting price service"
    );
    coinquote_web::serve(addr, aggregator).await?;
    Ok(())
}

/// `--addr` wins; otherwise all interfaces on `--port`/`PORT` or the default port.
fn listen_addr(args: &ServeArgs) -> SocketAddr {
    args.addr.unwrap_or_else(|| {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, args.port.unwrap_or(DEFAULT_PORT)))
    })
}
