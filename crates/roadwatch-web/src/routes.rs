//! Web routes for the traffic dashboard.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use roadwatch_chat::ChatAssistant;
use roadwatch_traffic::TrafficStore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::sse::create_sse_stream;

/// Shared state for the web server.
pub struct AppState {
    pub assistant: ChatAssistant,
    pub store: Arc<TrafficStore>,
    pub traffic_tx: broadcast::Sender<String>,
}

/// Chat request body.
///
/// A missing `message` field is treated as an empty message.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Chat response body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Create the web router.
///
/// If `static_dir` is provided, extra front-end assets are served under
/// `/static`.
pub fn create_router(
    assistant: ChatAssistant,
    store: Arc<TrafficStore>,
    traffic_tx: broadcast::Sender<String>,
    static_dir: Option<&str>,
) -> Router {
    let state = Arc::new(AppState {
        assistant,
        store,
        traffic_tx,
    });

    let mut router = Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .route("/api/traffic/sse", get(traffic_sse))
        .route("/health", get(health))
        .with_state(state);

    if let Some(dir) = static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
}

async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// Chat endpoint. Always answers 200 with a response body; provider failures
/// arrive as ordinary response text.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let response = state.assistant.respond(&request.message).await;
    Json(ChatResponse { response })
}

async fn traffic_sse(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    create_sse_stream(state.traffic_tx.subscribe())
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let routes = state.store.snapshot().await.len();

    Json(json!({
        "status": "ok",
        "routes": routes,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Roadwatch</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            max-width: 800px;
            margin: 0 auto;
            padding: 2rem;
            background: #0a0a0a;
            color: #e0e0e0;
        }
        h1 { color: #88c0d0; }
        h2 { color: #81a1c1; font-size: 1.1rem; }
        .routes { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; }
        .route {
            background: #2e3440;
            border-radius: 6px;
            padding: 1rem;
        }
        .route .name { font-weight: 600; color: #88c0d0; }
        .route .speed { font-size: 1.6rem; margin: 0.25rem 0; }
        .congestion-low { color: #a3be8c; }
        .congestion-medium { color: #ebcb8b; }
        .congestion-high { color: #bf616a; }
        .incidents { font-size: 0.85rem; color: #d08770; }
        #chat-log {
            background: #2e3440;
            border-radius: 6px;
            padding: 1rem;
            min-height: 8rem;
            max-height: 20rem;
            overflow-y: auto;
            white-space: pre-wrap;
        }
        #chat-log .you { color: #88c0d0; }
        #chat-form { display: flex; gap: 0.5rem; margin-top: 0.5rem; }
        #chat-input {
            flex: 1;
            padding: 0.5rem;
            background: #2e3440;
            color: #e0e0e0;
            border: 1px solid #4c566a;
            border-radius: 4px;
        }
        button {
            padding: 0.5rem 1rem;
            background: #5e81ac;
            color: #eceff4;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }
        button:hover { background: #81a1c1; }
    </style>
</head>
<body>
    <h1>Roadwatch</h1>
    <p>Live simulated traffic with a Gemini-backed assistant.</p>

    <h2>Routes</h2>
    <div class="routes" id="routes"></div>

    <h2>Ask about traffic</h2>
    <div id="chat-log"></div>
    <form id="chat-form">
        <input id="chat-input" autocomplete="off" placeholder="What is the traffic on I-95?">
        <button type="submit">Send</button>
    </form>

    <script>
        const routesEl = document.getElementById('routes');
        const logEl = document.getElementById('chat-log');
        const formEl = document.getElementById('chat-form');
        const inputEl = document.getElementById('chat-input');

        function renderRoutes(state) {
            routesEl.innerHTML = '';
            for (const [name, metrics] of Object.entries(state)) {
                const card = document.createElement('div');
                card.className = 'route';
                const incidents = metrics.incidents.length
                    ? 'incidents: ' + metrics.incidents.join(', ')
                    : 'no incidents';
                card.innerHTML =
                    '<div class="name">' + name + '</div>' +
                    '<div class="speed">' + metrics.speed + ' mph</div>' +
                    '<div class="congestion-' + metrics.congestion + '">' +
                        metrics.congestion + ' congestion</div>' +
                    '<div class="incidents">' + incidents + '</div>';
                routesEl.appendChild(card);
            }
        }

        const events = new EventSource('/api/traffic/sse');
        events.addEventListener('traffic_update', (e) => {
            renderRoutes(JSON.parse(e.data));
        });

        function append(kind, text) {
            const line = document.createElement('div');
            if (kind) line.className = kind;
            line.textContent = text;
            logEl.appendChild(line);
            logEl.scrollTop = logEl.scrollHeight;
        }

        formEl.addEventListener('submit', async (e) => {
            e.preventDefault();
            const message = inputEl.value.trim();
            if (!message) return;
            inputEl.value = '';
            append('you', 'you: ' + message);
            try {
                const res = await fetch('/api/chat', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ message }),
                });
                const body = await res.json();
                append(null, body.response);
            } catch (err) {
                append(null, 'request failed: ' + err);
            }
        });
    </script>
</body>
</html>"#;
