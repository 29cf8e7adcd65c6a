//! Row → Good mapping, the rewrite instruction, and post composition.

use serde::Deserialize;
use thiserror::Error;

use vitrina_core::types::{Good, Row};

/// Fixed column layout of a data row.
mod columns {
    pub const BARCODE: usize = 0;
    pub const TITLE: usize = 1;
    pub const DESCRIPTION: usize = 2;
    pub const PRICE: usize = 3;
    pub const IMAGE_URLS: usize = 4;
    pub const COMBINED_OPTIONS: usize = 5;
}

/// A data row needs at least this many columns to map to a Good.
pub const MIN_COLUMNS: usize = 6;

/// Label of the "order now" button under a post.
pub const CALL_TO_ACTION_LABEL: &str = "Замовити зараз";

/// Why a data row could not be turned into a Good.
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("row has {0} columns, expected at least 6")]
    TooFewColumns(usize),

    #[error("price {0:?} is not a number")]
    BadPrice(String),
}

/// Map one data row to a Good.
pub fn good_from_row(row: &Row) -> Result<Good, RowError> {
    if row.len() < MIN_COLUMNS {
        return Err(RowError::TooFewColumns(row.len()));
    }
    let price_raw = row[columns::PRICE].trim();
    let price: f64 = price_raw
        .parse()
        .map_err(|_| RowError::BadPrice(price_raw.to_string()))?;

    Ok(Good {
        barcode: row[columns::BARCODE].clone(),
        title: row[columns::TITLE].clone(),
        description: non_empty(&row[columns::DESCRIPTION]),
        price,
        combined_options: non_empty(&row[columns::COMBINED_OPTIONS]),
        image_urls: split_image_urls(&row[columns::IMAGE_URLS]),
    })
}

fn non_empty(field: &str) -> Option<String> {
    let trimmed = field.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The image column is one comma-joined field; entries are trimmed and
/// blanks dropped.
fn split_image_urls(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

/// The fixed rewrite instruction sent to the model, with the raw
/// description fenced at the end.
pub fn rewrite_instruction(description: &str) -> String {
    format!(
        "There is description of a good. Replace HTML with plain text. \
         Make shorter it's structure and text, final result should 200 symbols max. \
         When you write \"Розмір\" of a good, use \"x\" instead of \"*\" between numbers. \
         Send result in JSON \"result\" field.\n```{description}```"
    )
}

#[derive(Debug, Deserialize)]
struct RewriteReply {
    result: String,
}

/// Extract the rewritten text from a model reply. `None` when the reply
/// is not the expected `{"result": …}` shape or the result is empty.
pub fn parse_rewrite_reply(text: &str) -> Option<String> {
    let reply: RewriteReply = serde_json::from_str(text).ok()?;
    (!reply.result.is_empty()).then_some(reply.result)
}

/// Build the outbound post text. Section order is fixed: title,
/// description, price, combined options, barcode. Absent sections are
/// dropped, never left as empty separators.
pub fn compose_message(good: &Good) -> String {
    let mut sections = vec![format!("*{}*", good.title)];
    if let Some(description) = &good.description {
        sections.push(description.clone());
    }
    sections.push(format!("*Ціна: {} грн*", good.price));
    if let Some(options) = &good.combined_options {
        sections.push(options.clone());
    }
    sections.push(format!("Штрихкод: {}", good.barcode));
    sections.join("\n\n")
}
