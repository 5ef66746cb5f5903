use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tokio::net::TcpListener;
use tracing::Level;

use crate::cli::ClaudeCli;

pub mod handlers;
pub mod types;

use handlers::{chat, health, not_found};

#[derive(Clone)]
pub struct AppState {
    pub cli: Arc<ClaudeCli>,
}

impl AppState {
    pub fn new(cli: ClaudeCli) -> Self {
        Self { cli: Arc::new(cli) }
    }
}

/// Wrapper routes. Unknown paths and unsupported methods fall through to a
/// JSON 404; every response carries the CORS allow headers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health).fallback(not_found))
        .route("/chat", post(chat).fallback(not_found))
        .fallback(not_found)
        // Prompts are whole documents; no cap on the chat body
        .layer(DefaultBodyLimit::disable())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Answers OPTIONS on any path itself
        .layer(cors_layer())
        // Preflight already has these; plain responses do not
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        ))
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

/// Serves `app` on `listener` until `shutdown` resolves, then drains
/// in-flight requests.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
