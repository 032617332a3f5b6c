//! Client for the Gemini text-generation API.
//!
//! Exposes the [`GenerativeModel`] trait the chat assistant is written
//! against, plus the production [`GeminiClient`] implementation over the
//! `generateContent` REST endpoint.

mod client;
mod error;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient, GenerativeModel};
pub use error::GeminiError;
