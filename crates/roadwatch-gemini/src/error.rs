//! Error types for the Gemini client.

use thiserror::Error;

/// Errors that can occur when calling the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// No API key was configured.
    #[error("no Gemini API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("Gemini API error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The response contained no candidate text.
    #[error("empty response from the Gemini API")]
    EmptyResponse,
}
