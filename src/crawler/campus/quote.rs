use serde_json::{Map, Value};

use crate::{declare::Quote, util::convert::FromValue};

/// Version of the campus wire schema understood by [`RawQuoteV1`].
pub const SCHEMA_VERSION: u32 = 1;

/// Field wrapping the quote array in the object form of the payload.
const DATA_FIELD: &str = "data";

const SYMBOL: &str = "symbol";
const CHANGE: &str = "change";
/// Accepted aliases, in priority order. The first non-null one wins.
const NAME_ALIASES: &[&str] = &["name", "companyName"];
const PRICE_ALIASES: &[&str] = &["lastPrice", "price", "ltp"];
const CHANGE_PERCENT_ALIASES: &[&str] = &["changePercent", "pChange"];
const VOLUME_ALIASES: &[&str] = &["totalTradedVolume", "volume"];

/// One wire entry with every alias already resolved, borrowed from the payload.
#[derive(Debug, Clone, Copy)]
pub struct RawQuoteV1<'a> {
    symbol: Option<&'a Value>,
    name: Option<&'a Value>,
    last_price: Option<&'a Value>,
    change: Option<&'a Value>,
    change_percent: Option<&'a Value>,
    total_traded_volume: Option<&'a Value>,
}

impl<'a> RawQuoteV1<'a> {
    /// `None` unless the entry is a JSON object.
    pub fn from_value(entry: &'a Value) -> Option<Self> {
        let fields = entry.as_object()?;

        Some(RawQuoteV1 {
            symbol: fields.get(SYMBOL),
            name: first_present(fields, NAME_ALIASES),
            last_price: first_present(fields, PRICE_ALIASES),
            change: fields.get(CHANGE),
            change_percent: first_present(fields, CHANGE_PERCENT_ALIASES),
            total_traded_volume: first_present(fields, VOLUME_ALIASES),
        })
    }

    fn symbol(&self) -> Option<String> {
        if !self.symbol.is_truthy() {
            return None;
        }

        self.symbol.get_text().filter(|s| !s.is_empty())
    }

    fn name(&self) -> Option<String> {
        self.name
            .get_text()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
    }

    pub fn price(&self) -> f64 {
        self.last_price.get_f64()
    }

    /// Applies the rejection gate, then maps the entry.
    ///
    /// Only symbol, name and price can reject an entry; every other numeric
    /// field falls back to 0 on its own.
    pub fn into_quote(self) -> Option<Quote> {
        let symbol = self.symbol()?;
        let name = self.name()?;
        let last_price = self.price();
        if last_price <= 0.0 {
            return None;
        }

        Some(Quote {
            symbol,
            name,
            last_price,
            change: self.change.get_f64(),
            change_percent: self.change_percent.get_f64(),
            total_traded_volume: self.total_traded_volume.get_f64(),
        })
    }
}

fn first_present<'a>(fields: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| fields.get(*alias))
        .find(|v| !v.is_null())
}

/// Returns the raw entries of a payload.
///
/// A bare array or `{data: [...]}` is accepted; any other shape yields no
/// entries rather than an error.
pub fn extract_entries(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(fields) => fields
            .get(DATA_FIELD)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    }
}

/// Normalizes one raw entry, or `None` if it fails the gate.
pub fn normalize(entry: &Value) -> Option<Quote> {
    RawQuoteV1::from_value(entry)?.into_quote()
}

/// Maps a whole payload into quotes, keeping source order.
pub fn sanitize(payload: &Value) -> Vec<Quote> {
    extract_entries(payload)
        .iter()
        .filter_map(normalize)
        .collect()
}
