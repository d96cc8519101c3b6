use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    crawler::QuoteSource,
    declare::{FeedSnapshot, Quote},
    feed::QuoteFeed,
    web::error::ApiError,
};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_stocks<S: QuoteSource + 'static>(
    State(feed): State<Arc<QuoteFeed<S>>>,
) -> Json<FeedSnapshot> {
    Json(feed.snapshot())
}

pub async fn get_stock<S: QuoteSource + 'static>(
    State(feed): State<Arc<QuoteFeed<S>>>,
    Path(symbol): Path<String>,
) -> Result<Json<Quote>, ApiError> {
    feed.lookup(&symbol)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Stock {} not found", symbol)))
}

/// Forces a poll; the snapshot returned reflects it.
pub async fn refresh<S: QuoteSource + 'static>(
    State(feed): State<Arc<QuoteFeed<S>>>,
) -> Result<Json<FeedSnapshot>, ApiError> {
    feed.refresh().await?;
    Ok(Json(feed.snapshot()))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::error::{FeedError, FeedResult};

    use super::*;

    struct FixedSource(FeedResult<Value>);

    #[async_trait]
    impl QuoteSource for FixedSource {
        async fn fetch(&self) -> FeedResult<Value> {
            self.0.clone()
        }
    }

    fn feed(response: FeedResult<Value>) -> Arc<QuoteFeed<FixedSource>> {
        Arc::new(QuoteFeed::new(
            FixedSource(response),
            Duration::from_secs(15),
        ))
    }

    fn board() -> Value {
        json!([{"symbol": "TCS", "name": "Tata Consultancy Services", "lastPrice": 3500}])
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await;
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_get_stock() {
        let feed = feed(Ok(board()));
        feed.poll().await.unwrap();

        let Json(quote) = get_stock(State(Arc::clone(&feed)), Path("tcs".to_string()))
            .await
            .unwrap();
        assert_eq!(quote.symbol, "TCS");

        let missing = get_stock(State(feed), Path("wipro".to_string())).await;
        match missing {
            Err(err) => assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND),
            Ok(_) => panic!("wipro should not be listed"),
        }
    }

    #[tokio::test]
    async fn test_list_stocks() {
        let feed = feed(Ok(board()));
        feed.poll().await.unwrap();

        let Json(snapshot) = list_stocks(State(feed)).await;
        assert_eq!(snapshot.quotes.len(), 1);
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_refresh_reports_upstream_failure() {
        let feed = feed(Err(FeedError::Status(500)));

        match refresh(State(Arc::clone(&feed))).await {
            Err(err) => assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY),
            Ok(_) => panic!("refresh should fail"),
        }

        let snapshot = feed.snapshot();
        assert!(snapshot.last_error.is_some());
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_refresh_returns_fresh_snapshot() {
        let feed = feed(Ok(board()));

        let Json(snapshot) = refresh(State(feed)).await.unwrap();
        assert_eq!(snapshot.quotes[0].symbol, "TCS");
    }

    #[tokio::test]
    async fn test_not_found_fallback() {
        assert_eq!(not_found().await.into_response().status(), StatusCode::NOT_FOUND);
    }
}
