//! # Vitrina Providers
//!
//! LLM provider implementations for the description rewrite step. Any
//! OpenAI-compatible chat-completions endpoint works; only the endpoint
//! URL, model, and API key differ.

pub mod openai;

pub use openai::OpenAiProvider;
