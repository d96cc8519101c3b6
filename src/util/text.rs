use std::{collections::HashSet, str::FromStr};

use anyhow::*;

/// Thousands separators stripped from every numeric string before parsing.
const NUMBER_ESCAPE_CHAR: &[char] = &[','];

/// Parses an `f64` value from a given string.
///
/// Thousands separators (and any extra `escape_chars`) are removed and the
/// remainder is trimmed before parsing. Non-finite results (`NaN`, `inf`)
/// are reported as errors so callers never see them.
pub fn parse_f64(s: &str, escape_chars: Option<Vec<char>>) -> Result<f64> {
    let cleaned = clean_escape_chars(s, escape_chars);
    let trimmed = cleaned.trim();
    let value = f64::from_str(trimmed)
        .map_err(|why| anyhow!("Failed to parse '{}' as f64 because: {:?}", trimmed, why))?;

    if !value.is_finite() {
        bail!("'{}' is not a finite number", trimmed);
    }

    Ok(value)
}

/// Coerces a loosely formatted numeric string into a finite number.
///
/// Empty or whitespace-only input counts as zero, and anything that
/// `parse_f64` rejects falls back to zero. Never fails.
pub fn to_number(s: &str) -> f64 {
    let cleaned = clean_escape_chars(s, None);
    if cleaned.trim().is_empty() {
        return 0.0;
    }

    parse_f64(&cleaned, None).unwrap_or_default()
}

/// Removes a set of escape characters from a given string.
///
/// The thousands separator is always removed; `escape_chars` adds to it.
pub(crate) fn clean_escape_chars(s: &str, escape_chars: Option<Vec<char>>) -> String {
    let mut combined: Vec<char> = NUMBER_ESCAPE_CHAR.to_vec();
    if let Some(ec) = escape_chars {
        combined.extend(ec);
    }

    let filters = combined.iter().collect::<HashSet<_>>();
    s.chars().filter(|c| !filters.contains(c)).collect()
}
