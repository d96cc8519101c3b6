//! Snapshot API (Axum)

use std::{future::Future, net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{crawler::QuoteSource, feed::QuoteFeed, logging};

pub mod error;
mod handlers;

/// Browser dashboards on any origin may read the board.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the router over a shared feed.
pub fn router<S: QuoteSource + 'static>(feed: Arc<QuoteFeed<S>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/stocks", get(handlers::list_stocks::<S>))
        .route("/api/stocks/refresh", post(handlers::refresh::<S>))
        .route("/api/stocks/{symbol}", get(handlers::get_stock::<S>))
        .fallback(handlers::not_found)
        .layer(cors_layer())
        .with_state(feed)
}

/// Serves the snapshot API until `shutdown` resolves.
pub async fn serve<S, F>(feed: Arc<QuoteFeed<S>>, port: u16, shutdown: F) -> Result<()>
where
    S: QuoteSource + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    logging::info_file_async(format!("Snapshot API listening on http://{}", addr));

    axum::serve(listener, router(feed))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
