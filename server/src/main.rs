use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use scrollnote_server::config::ServerConfig;
use scrollnote_server::provider::SupabaseClient;
use scrollnote_server::{rest, AppContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    let filter = config
        .log
        .clone()
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let provider = Arc::new(SupabaseClient::new(
        &config.supabase_url,
        &config.supabase_anon_key,
    ));
    let ctx = Arc::new(AppContext::new(config, provider));

    tokio::select! {
        result = rest::serve(ctx) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
            Ok(())
        }
    }
}
