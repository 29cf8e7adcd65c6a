//! Collaborator traits.
//!
//! The goods pipeline talks to its three external collaborators through
//! these seams: the catalog row storage, the description rewriter, and the
//! outbound channel publisher. Production wiring uses the CSV store, the
//! OpenAI provider, and the Telegram channel; tests substitute recording
//! fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{LinkAction, Row};

/// Catalog row storage: read the full row set, or atomically replace it.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Read all rows. Row 0 is the header.
    async fn load(&self) -> Result<Vec<Row>>;

    /// Overwrite the full row set.
    async fn overwrite(&self, rows: &[Row]) -> Result<()>;
}

/// Description rewriter backed by a language model.
#[async_trait]
pub trait Rewriter: Send + Sync {
    /// Send a prompt, return the reply text. `None` means the model
    /// returned no content; the caller keeps whatever it already had.
    async fn prompt(&self, prompt: &str) -> Result<Option<String>>;
}

/// Outbound channel publisher.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a group of images in one post, optionally with a caption
    /// on the first item.
    async fn post_media_group(&self, image_urls: &[String], caption: Option<&str>) -> Result<()>;

    /// Publish a plain text message, optionally carrying a link button.
    async fn post_message(&self, text: &str, action: Option<&LinkAction>) -> Result<()>;
}
