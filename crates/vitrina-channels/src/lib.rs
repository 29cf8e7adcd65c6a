//! # Vitrina Channels
//!
//! Outbound channel implementations. Telegram is the only channel the
//! publisher ships with.

pub mod telegram;

pub use telegram::TelegramChannel;
