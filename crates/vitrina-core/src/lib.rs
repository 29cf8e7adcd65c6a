//! # Vitrina Core
//!
//! Shared foundation for the Vitrina workspace: configuration, the
//! workspace-wide error type, domain types, and the traits that the
//! pipeline's external collaborators (row storage, description rewriter,
//! channel publisher) are wired through.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::VitrinaConfig;
pub use error::{Result, VitrinaError};
pub use traits::{Publisher, Rewriter, RowStore};
pub use types::{Good, LinkAction, Row};
