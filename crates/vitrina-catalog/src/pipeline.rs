//! The goods publishing pipeline.
//!
//! One invocation consumes exactly one valid data row, or reports that
//! the catalog is exhausted. The row set is re-read at every invocation
//! and fully written back once a row has been dispatched; a publish
//! failure is logged and the row is still consumed (at-most-once, never
//! re-published). Invocations hold a single-slot lock for their whole
//! duration, so scheduled and manual triggers queue instead of racing on
//! the same rows.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;

use vitrina_core::error::Result;
use vitrina_core::traits::{Publisher, Rewriter, RowStore};
use vitrina_core::types::{Good, LinkAction};

use crate::goods;

/// Operator-facing message for the exhausted-catalog outcome.
pub const NO_ROWS_LEFT: &str =
    "Не залишилось рядків у CSV файлі або CSV файл ще не завантажено.";

/// How one invocation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PostOutcome {
    /// One good was consumed and dispatched.
    Posted { barcode: String, title: String },
    /// Header-only or empty row set; nothing was changed.
    Empty,
}

pub struct GoodsPipeline {
    rows: Arc<dyn RowStore>,
    publisher: Arc<dyn Publisher>,
    rewriter: Option<Arc<dyn Rewriter>>,
    call_to_action: Option<LinkAction>,
    rewrite_timeout: Duration,
    publish_timeout: Duration,
    slot: Mutex<()>,
}

impl GoodsPipeline {
    pub fn new(rows: Arc<dyn RowStore>, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            rows,
            publisher,
            rewriter: None,
            call_to_action: None,
            rewrite_timeout: Duration::from_secs(30),
            publish_timeout: Duration::from_secs(60),
            slot: Mutex::new(()),
        }
    }

    /// Enable the description rewrite step.
    pub fn set_rewriter(&mut self, rewriter: Arc<dyn Rewriter>) {
        self.rewriter = Some(rewriter);
    }

    /// Attach the "order now" button; with it set, the post text goes out
    /// as a separate button message instead of the media-group caption.
    pub fn set_call_to_action(&mut self, action: LinkAction) {
        self.call_to_action = Some(action);
    }

    pub fn set_timeouts(&mut self, rewrite: Duration, publish: Duration) {
        self.rewrite_timeout = rewrite;
        self.publish_timeout = publish;
    }

    /// Consume and publish the next valid data row.
    ///
    /// Row 0 is the header and is never consumed. Malformed rows (too few
    /// columns, non-numeric price) and placeholder rows (empty title) are
    /// skipped in place and consumed along with the published row.
    pub async fn process_next(&self) -> Result<PostOutcome> {
        let _running = self.slot.lock().await;

        let mut rows = self.rows.load().await?;
        loop {
            if rows.len() <= 1 {
                tracing::info!("No rows left in the catalog");
                return Ok(PostOutcome::Empty);
            }

            let row = rows.remove(1);
            let good = match goods::good_from_row(&row) {
                Ok(good) => good,
                Err(e) => {
                    tracing::warn!("Skipping malformed catalog row: {e}");
                    continue;
                }
            };
            if good.title.is_empty() {
                tracing::debug!("Skipping placeholder row {}", good.barcode);
                continue;
            }

            let good = self.rewrite_description(good).await;
            let message = goods::compose_message(&good);
            self.dispatch(&good, &message).await;

            self.rows.overwrite(&rows).await?;
            tracing::info!(
                "Processed row removed from the catalog, {} data rows left",
                rows.len() - 1
            );
            return Ok(PostOutcome::Posted {
                barcode: good.barcode,
                title: good.title,
            });
        }
    }

    /// Ask the rewriter to shorten the description. Every failure mode —
    /// no rewriter, no content, wrong reply shape, provider error,
    /// timeout — keeps the original text.
    async fn rewrite_description(&self, mut good: Good) -> Good {
        let Some(description) = good.description.clone() else {
            return good;
        };
        let Some(rewriter) = &self.rewriter else {
            return good;
        };

        let instruction = goods::rewrite_instruction(&description);
        match timeout(self.rewrite_timeout, rewriter.prompt(&instruction)).await {
            Ok(Ok(Some(reply))) => match goods::parse_rewrite_reply(&reply) {
                Some(result) => {
                    tracing::info!("Description rewritten: {result:?}");
                    good.description = Some(result);
                }
                None => tracing::warn!(
                    "Rewrite reply was not the expected JSON shape, keeping the original description"
                ),
            },
            Ok(Ok(None)) => {
                tracing::debug!("Rewrite returned no content, keeping the original description");
            }
            Ok(Err(e)) => tracing::warn!("Rewrite failed: {e}"),
            Err(_) => tracing::warn!(
                "Rewrite timed out after {:?}, keeping the original description",
                self.rewrite_timeout
            ),
        }
        good
    }

    /// Publish the post. Failures and timeouts are logged, never
    /// propagated: the caller writes the row set back either way.
    async fn dispatch(&self, good: &Good, message: &str) {
        match timeout(self.publish_timeout, self.send(good, message)).await {
            Ok(Ok(())) => tracing::info!("Published {:?} ({})", good.title, good.barcode),
            Ok(Err(e)) => tracing::error!("Publish failed for {}: {e}", good.barcode),
            Err(_) => tracing::error!(
                "Publish timed out for {} after {:?}",
                good.barcode,
                self.publish_timeout
            ),
        }
    }

    async fn send(&self, good: &Good, message: &str) -> Result<()> {
        if let Some(action) = &self.call_to_action {
            if !good.image_urls.is_empty() {
                self.publisher.post_media_group(&good.image_urls, None).await?;
            }
            self.publisher.post_message(message, Some(action)).await
        } else if good.image_urls.is_empty() {
            self.publisher.post_message(message, None).await
        } else {
            self.publisher
                .post_media_group(&good.image_urls, Some(message))
                .await
        }
    }
}
