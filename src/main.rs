use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use solr_mcp_server::config::SolrConfig;
use solr_mcp_server::handlers::ToolContext;
use solr_mcp_server::server::McpServer;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // stdout carries the JSON-RPC stream; all diagnostics go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match SolrConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let ctx = match ToolContext::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("startup error: {e}");
            std::process::exit(1);
        }
    };

    let mut server = McpServer::new(ctx);
    if let Err(e) = server.run().await {
        tracing::error!("fatal error: {e}");
        std::process::exit(1);
    }
}
