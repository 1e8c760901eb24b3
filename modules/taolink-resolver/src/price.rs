//! Price extraction from product page HTML.
//!
//! Vendor pages embed price data in one of three template dialects; the
//! scanner tries them in strict priority order and returns at the first
//! match. No dialect matching is a normal outcome, not an error. Extraction
//! is plain regex over the raw HTML — these pages change without notice and
//! the inline script blobs are the only stable anchor.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// Inline `skuMap: {...}` object literal (taobao item pages).
static SKU_MAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"skuMap\s*:\s*(\{.+\})\s*,").unwrap());

/// Hidden `current_price` form field (older taobao item pages).
static CURRENT_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="current_price"\s*value\s*=\s*"(\d+(?:\.\d+))""#).unwrap());

/// Inline `TShop.Setup({...});` call (tmall detail pages).
static TSHOP_SETUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TShop\.Setup\(\s*(\{.+\})\s*\);").unwrap());

/// Scan product page HTML for prices and format the summary.
pub fn scan_prices(html: &str) -> Option<String> {
    format_summary(&extract_values(html)?)
}

fn extract_values(html: &str) -> Option<Vec<f64>> {
    if let Some(caps) = SKU_MAP_RE.captures(html) {
        return Some(sku_map_values(&caps[1]));
    }
    if let Some(caps) = CURRENT_PRICE_RE.captures(html) {
        return caps[1].parse::<f64>().ok().map(|v| vec![v]);
    }
    if let Some(caps) = TSHOP_SETUP_RE.captures(html) {
        return Some(tshop_values(&caps[1]));
    }
    None
}

/// Collect prices out of a skuMap blob, in document order. A blob that is
/// not valid JSON yields no prices rather than failing the resolution.
fn sku_map_values(blob: &str) -> Vec<f64> {
    let parsed: Value = match serde_json::from_str(blob) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "skuMap blob is not valid JSON");
            return Vec::new();
        }
    };
    sku_prices(&parsed)
}

fn sku_prices(sku_map: &Value) -> Vec<f64> {
    let Some(entries) = sku_map.as_object() else {
        return Vec::new();
    };
    entries.values().filter_map(price_field).collect()
}

fn price_field(entry: &Value) -> Option<f64> {
    price_value(entry.get("price")?)
}

fn tshop_values(blob: &str) -> Vec<f64> {
    let parsed: Value = match serde_json::from_str(blob) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "TShop.Setup blob is not valid JSON");
            return Vec::new();
        }
    };

    if let Some(sku_map) = parsed.pointer("/valItemInfo/skuMap") {
        return sku_prices(sku_map);
    }
    if let Some(default_price) = parsed.pointer("/detail/defaultItemPrice") {
        return price_value(default_price).into_iter().collect();
    }
    Vec::new()
}

fn price_value(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Format the price summary from the values in extraction order:
/// one distinct value renders bare, two render as a range, three or more
/// render the first value with the range in parentheses. The anchor of the
/// 3+ form is the first value in original order, not the minimum.
fn format_summary(values: &[f64]) -> Option<String> {
    let distinct = dedup_preserving_order(values);
    if distinct.is_empty() {
        return None;
    }

    let min = distinct.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = distinct.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let summary = match distinct.len() {
        1 => format!("{:.2} CNY", distinct[0]),
        2 => format!("{min:.2} CNY - {max:.2} CNY"),
        _ => format!("{:.2} CNY ({min:.2} CNY - {max:.2} CNY)", distinct[0]),
    };
    Some(summary)
}

fn dedup_preserving_order(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::new();
    for &v in values {
        if !out.iter().any(|&seen| seen == v) {
            out.push(v);
        }
    }
    out
}
