//! # Vitrina Catalog
//!
//! The catalog side of Vitrina: the CSV row store and the goods
//! publishing pipeline.
//!
//! The pipeline consumes exactly one valid data row per invocation:
//! load the row set, drop the first data row, map it to a [`Good`],
//! optionally rewrite its description, compose the post, publish it,
//! and write the shrunken row set back. Malformed and placeholder rows
//! are skipped in place. Invocations are serialized — the scheduler and
//! the manual publish path queue on the same single-slot lock.
//!
//! [`Good`]: vitrina_core::types::Good

pub mod goods;
pub mod pipeline;
pub mod store;

pub use goods::{CALL_TO_ACTION_LABEL, RowError};
pub use pipeline::{GoodsPipeline, NO_ROWS_LEFT, PostOutcome};
pub use store::{CsvRowStore, fetch_remote};
