//! # Campus exchange quotes
//!
//! The demo backend publishes its whole quote board on a single
//! `GET` endpoint, either as a bare JSON array or wrapped as `{data: [...]}`.
//! This module fetches that payload; `quote` maps it onto [`Quote`].
//!
//! [`Quote`]: crate::declare::Quote

use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderValue},
    StatusCode,
};
use serde_json::Value;

use crate::{
    crawler::QuoteSource,
    error::{FeedError, FeedResult},
    util,
};

/// Wire schema adapter.
pub mod quote;

/// Quote board endpoint of the campus backend.
pub struct CampusApi {
    pub endpoint: String,
}

impl CampusApi {
    pub fn new(endpoint: impl Into<String>) -> Self {
        CampusApi {
            endpoint: endpoint.into(),
        }
    }
}

fn build_headers() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn check_status(status: StatusCode) -> FeedResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FeedError::Status(status.as_u16()))
    }
}

fn decode_body(body: &[u8]) -> FeedResult<Value> {
    serde_json::from_slice(body).map_err(|why| FeedError::Payload(why.to_string()))
}

#[async_trait]
impl QuoteSource for CampusApi {
    async fn fetch(&self) -> FeedResult<Value> {
        let res = util::http::get_response(&self.endpoint, Some(build_headers()))
            .await
            .map_err(|why| FeedError::Transport(format!("{:#}", why)))?;

        check_status(res.status())?;

        let body = res
            .bytes()
            .await
            .map_err(|why| FeedError::Transport(format!("{:?}", why)))?;

        decode_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use crate::logging;

    use super::*;

    #[test]
    fn test_check_status() {
        assert_eq!(check_status(StatusCode::OK), Ok(()));
        assert_eq!(check_status(StatusCode::NO_CONTENT), Ok(()));
        assert_eq!(
            check_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(FeedError::Status(500))
        );
        assert_eq!(check_status(StatusCode::NOT_FOUND), Err(FeedError::Status(404)));
    }

    #[test]
    fn test_decode_body() {
        let value = decode_body(br#"{"data":[{"symbol":"TCS"}]}"#).unwrap();
        assert_eq!(value["data"][0]["symbol"], "TCS");

        assert!(matches!(decode_body(b"<html>"), Err(FeedError::Payload(_))));
        assert!(matches!(decode_body(b""), Err(FeedError::Payload(_))));
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch() {
        dotenv::dotenv().ok();
        let api = CampusApi::new(crate::config::SETTINGS.feed.endpoint.clone());

        match api.fetch().await {
            Ok(payload) => logging::debug_file_async(format!("campus payload: {}", payload)),
            Err(why) => logging::debug_file_async(format!("Failed to fetch because {:?}", why)),
        }
    }
}
