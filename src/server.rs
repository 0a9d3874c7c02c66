//! HTTP surface: `POST /upload-sms` ingests a message, `GET /` renders the log.
//!
//! Every other path, and the wrong method on a known path, is a 404 with an
//! empty body. Paths are matched with their query string, so `/?x=1` is
//! another path too.

use crate::error::ServerError;
use crate::log_entry::LogLine;
use crate::sms_log::SmsLog;
use crate::types::{Ack, SmsPayload};
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

pub const NO_MESSAGES: &str = "No messages received yet.";

pub struct AppState {
    pub log: SmsLog,
}

impl AppState {
    pub fn new(log: SmsLog) -> Arc<Self> {
        Arc::new(Self { log })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard).fallback(not_found))
        .route("/upload-sms", post(upload_sms).fallback(not_found))
        .fallback(not_found)
        .layer(middleware::from_fn(reject_query))
        .with_state(state)
}

async fn reject_query(request: Request, next: Next) -> Response {
    if request.uri().query().is_some() {
        debug!("No route for {}", request.uri());
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

async fn upload_sms(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Ack>), ServerError> {
    let payload = match SmsPayload::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Rejected upload ({} bytes): {}", body.len(), e);
            return Ok((StatusCode::BAD_REQUEST, Json(Ack::invalid_json())));
        }
    };
    debug!("Upload client timestamp: {:?}", payload.timestamp);

    let line = LogLine::now(&payload);
    state.log.append(&line).await?;

    println!("{}", line);

    Ok((StatusCode::OK, Json(Ack::received())))
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Html<String>, ServerError> {
    let content = state.log.read_all().await?;
    Ok(Html(render_dashboard(&content)))
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Log text goes in as-is, without escaping.
pub fn render_dashboard(log_content: &str) -> String {
    let messages = if log_content.is_empty() {
        NO_MESSAGES
    } else {
        log_content
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>parserT Server</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        .log {{ background: #f5f5f5; padding: 20px; border-radius: 8px; white-space: pre-wrap; }}
        h1 {{ color: #333; }}
    </style>
</head>
<body>
    <h1>parserT Test Server</h1>
    <p>Server is running and ready to receive SMS uploads.</p>
    <h2>Recent SMS Messages:</h2>
    <div class="log">{}</div>
</body>
</html>
"#,
        messages
    )
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

pub async fn bind(addr: std::net::SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
