//! Server-Sent Events for traffic broadcasts.

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::info;

/// Event name the dashboard listens for.
pub const TRAFFIC_EVENT: &str = "traffic_update";

/// Logs the end of a push subscription when the client goes away.
struct ConnectionGuard;

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        info!("push client disconnected");
    }
}

/// Create an SSE stream of `traffic_update` events from a broadcast channel.
///
/// Lagged receivers skip missed payloads instead of ending the stream, so a
/// slow client only ever loses intermediate updates.
pub fn create_sse_stream(
    rx: tokio::sync::broadcast::Receiver<String>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    info!("push client connected");
    let guard = ConnectionGuard;

    let stream = BroadcastStream::new(rx).filter_map(
        move |result: Result<String, BroadcastStreamRecvError>| {
            let _conn = &guard;
            result
                .ok()
                .map(|data| Ok(Event::default().event(TRAFFIC_EVENT).data(data)))
        },
    );

    Sse::new(stream).keep_alive(KeepAlive::default())
}
