mod config;
mod error;
mod model;
mod mood;
mod parser;
mod presenter;
mod search;
mod server;
mod store;
mod synth;
mod text;
mod update;
mod video;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use mcp_common::http::SourceClient;
use search::{ScoringWeights, SearchEngine};
use server::ParentingGuideServer;
use store::LibraryStore;
use mood::MoodLexicon;
use synth::{SplitRules, Synthesizer};
use update::UpdateService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting parenting-guide MCP server");

    let config = Config::from_env()?;
    info!(
        library_url = %config.library_url,
        timeout_secs = config.fetch_timeout.map(|t| t.as_secs()),
        result_limit = config.result_limit,
        preload = config.preload,
        "configuration loaded"
    );

    let client = SourceClient::new(config.source_client_config())?;
    let update_service = Arc::new(UpdateService::new(client));
    let store = Arc::new(LibraryStore::new());

    // A failed preload is not fatal: the first search or a reload retries.
    if config.preload {
        match store.load(&update_service, false).await {
            Ok(report) => info!(entries = report.entry_count, "library preloaded"),
            Err(e) => warn!(error = %e, "library preload failed, continuing with empty library"),
        }
    }

    let server = ParentingGuideServer::new(
        store,
        update_service,
        SearchEngine::new(ScoringWeights::default(), config.result_limit),
        Synthesizer::new(SplitRules::default(), MoodLexicon::default()),
    );

    if let Ok(addr) = std::env::var("MCP_TCP_LISTEN_ADDR") {
        let listener = TcpListener::bind(&addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
