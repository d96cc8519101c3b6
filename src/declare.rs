use chrono::{DateTime, Local};
use serde::Serialize;

use crate::util::map::Keyable;

/// One normalized stock quote.
///
/// Only entries with a symbol, a non-empty name and a strictly positive
/// price are ever turned into a `Quote`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol, e.g. `TCS`
    pub symbol: String,
    /// Trimmed company name
    pub name: String,
    pub last_price: f64,
    /// Absolute change against the previous close
    pub change: f64,
    pub change_percent: f64,
    pub total_traded_volume: f64,
}

impl Keyable for Quote {
    fn key(&self) -> String {
        self.symbol.to_lowercase()
    }
}

/// Read-only copy of the feed state handed to consumers.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub quotes: Vec<Quote>,
    pub is_loading: bool,
    pub last_error: Option<String>,
    /// Completion time of the last successful poll
    pub last_updated: Option<DateTime<Local>>,
}
