//! Domain types.

use serde::{Deserialize, Serialize};

/// One catalog row: an ordered list of string fields. Row 0 of a row set
/// is the header and is never treated as data.
pub type Row = Vec<String>;

/// One catalog entry, built from a single data row for the duration of a
/// pipeline invocation. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Good {
    pub barcode: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub combined_options: Option<String>,
    pub image_urls: Vec<String>,
}

/// A link-styled action control attached to a published message
/// (the "order now" button under a post).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkAction {
    pub label: String,
    pub url: String,
}
