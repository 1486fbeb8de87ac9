//! Conversion boundary between the wire payload and typed records.
//!
//! The service sends loosely-typed JSON: numbers may arrive as strings,
//! fields may be null or missing. Two coercion policies apply and must not
//! be mixed up:
//! - stock and difference values: missing or non-numeric → `0`
//! - prices: missing or non-numeric → absent (`None`)

use serde::Deserialize;
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::item::{Difference, Item, Snapshot, Totals};

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct RawResponse {
    #[serde(default)]
    items: Option<Vec<RawItem>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawItem {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    designation: Option<Value>,
    #[serde(default)]
    brand: Option<Value>,
    #[serde(default)]
    main_category: Option<Value>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    last_updated: Option<Value>,
    #[serde(default)]
    history: Option<Vec<RawSnapshot>>,
    #[serde(default)]
    differences: Option<Vec<RawDifference>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    label: Option<Value>,
    #[serde(default)]
    date: Option<Value>,
    #[serde(default)]
    stock: Option<Value>,
    #[serde(default)]
    price: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDifference {
    #[serde(default)]
    date: Option<Value>,
    #[serde(default)]
    period: Option<Value>,
    #[serde(default)]
    difference: Option<Value>,
}

// ── Coercion ────────────────────────────────────────────────────────

/// Read a JSON number or numeric string. Anything else is `None`.
fn number_of(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Stock/difference policy: non-numeric or missing values count as zero.
pub fn coerce_quantity(value: Option<&Value>) -> f64 {
    number_of(value).unwrap_or(0.0)
}

/// Price policy: non-numeric or missing values are absent.
pub fn coerce_price(value: Option<&Value>) -> Option<f64> {
    number_of(value)
}

/// Read a JSON string (or a number, rendered as text). Empty strings are `None`.
fn text_of(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

// ── Conversion ──────────────────────────────────────────────────────

impl From<RawSnapshot> for Snapshot {
    fn from(raw: RawSnapshot) -> Self {
        let label = text_of(raw.label.as_ref()).unwrap_or_default();
        let date = text_of(raw.date.as_ref());
        Snapshot::new(
            label,
            date.as_deref(),
            coerce_quantity(raw.stock.as_ref()),
            coerce_price(raw.price.as_ref()),
        )
    }
}

impl From<RawDifference> for Difference {
    fn from(raw: RawDifference) -> Self {
        let date = text_of(raw.date.as_ref());
        let period = text_of(raw.period.as_ref());
        Difference::new(
            date.as_deref(),
            period.as_deref(),
            coerce_quantity(raw.difference.as_ref()),
        )
    }
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        let history: Vec<Snapshot> = raw
            .history
            .unwrap_or_default()
            .into_iter()
            .map(Snapshot::from)
            .collect();
        let differences: Vec<Difference> = raw
            .differences
            .unwrap_or_default()
            .into_iter()
            .map(Difference::from)
            .collect();

        Item {
            code: text_of(raw.code.as_ref()).unwrap_or_default(),
            designation: text_of(raw.designation.as_ref()),
            brand: text_of(raw.brand.as_ref()),
            main_category: text_of(raw.main_category.as_ref()),
            price: coerce_price(raw.price.as_ref()),
            last_updated: text_of(raw.last_updated.as_ref()),
            totals: Totals::from_differences(&differences),
            history,
            differences,
        }
    }
}

/// Convert a `{ "items": [...] }` document into typed items.
///
/// A missing or null `items` key (or a null document) is an empty result.
/// A document whose shape cannot be read at all is a `Deserialization` error.
pub fn parse_items(document: Value) -> Result<Vec<Item>, CoreError> {
    if document.is_null() {
        return Ok(Vec::new());
    }
    let raw: RawResponse = serde_json::from_value(document)?;
    Ok(raw
        .items
        .unwrap_or_default()
        .into_iter()
        .map(Item::from)
        .collect())
}

/// Same as [`parse_items`], from a JSON string.
pub fn parse_items_str(json: &str) -> Result<Vec<Item>, CoreError> {
    let document: Value = serde_json::from_str(json)?;
    parse_items(document)
}
