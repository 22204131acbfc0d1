//! Service assembly and the serve loop.

use crate::{AppState, HeraldConfig, VisitorCounter, create_router};
use herald_cache::CacheManager;
use herald_error::{HeraldResult, ServerError, ServerErrorKind};
use herald_history::{ChannelFeed, HistoryPaginator};
use herald_rate_limit::{GatewayClient, RateLimitedCaller, ensure_session};
use herald_storage::JsonFileStore;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Build the cache for the configured channel on top of `caller`.
pub fn build_cache(config: &HeraldConfig, caller: RateLimitedCaller) -> HeraldResult<CacheManager> {
    let channel = config.channel();
    let paginator = HistoryPaginator::with_page_delay(caller, channel.page_delay());
    let feed = ChannelFeed::new(paginator, channel.username().as_str(), channel.window()?);
    let store = JsonFileStore::new(config.cache().path().clone());
    Ok(CacheManager::new(
        config.cache().policy(),
        Arc::new(feed),
        Arc::new(store),
    ))
}

/// Connect, verify the session, warm the cache and serve until Ctrl-C.
///
/// # Errors
///
/// Fails when the gateway session is not usable, the listener cannot bind,
/// or the server loop exits with an error.
#[instrument(skip(config), fields(channel = %config.channel().username()))]
pub async fn run(config: HeraldConfig) -> HeraldResult<()> {
    let client = GatewayClient::new(config.api().clone())?;
    let caller = RateLimitedCaller::new(Arc::new(client));
    ensure_session(&caller).await?;

    let cache = build_cache(&config, caller)?;
    if !cache.restore().await && *config.cache().warm_on_start() {
        match cache.read().await {
            Ok(snapshot) => info!(records = snapshot.len(), "Cache warmed"),
            Err(e) => warn!(error = %e, "Warm-up fetch failed, will retry on first request"),
        }
    }

    let visitors = VisitorCounter::with_limit(*config.server().max_visitors());
    let app = create_router(
        AppState::with_visitors(cache, visitors),
        config.server().cors_origins(),
    );
    let addr = config.server().bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Bind(format!("{}: {}", addr, e))))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
