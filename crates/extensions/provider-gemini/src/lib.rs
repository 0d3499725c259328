//! # PromptSnap Provider - Gemini
//!
//! Google Gemini image analyzer for the PromptSnap batch pipeline.

mod analyzer;
mod cleanup;
mod client;
mod error;
mod key_pool;
mod style;
mod types;

pub use analyzer::GeminiAnalyzer;
pub use cleanup::clean_prompt;
pub use client::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::GeminiError;
pub use key_pool::{ApiKey, KeyPool, KeyPoolError};
pub use style::PromptStyle;
pub use types::*;
