//! Web layer for Roadwatch.
//!
//! Serves the dashboard page, the chat endpoint, and the SSE push channel,
//! and owns the periodic broadcast loop feeding that channel.

pub mod broadcast;
mod routes;
mod sse;

pub use routes::{AppState, ChatRequest, ChatResponse, create_router};
pub use sse::TRAFFIC_EVENT;
