//! HTTP server implementation using axum.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use futures_util::stream::StreamExt;
use futures_util::SinkExt;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use misty_telemetry::Metrics;

use crate::config::DashboardConfig;
use crate::error::{ApiError, DashboardError};
use crate::state::DashboardState;
use crate::types::{
    AmountRequest, BalanceResponse, DashboardMessage, HistoryResponse, LogsResponse,
    MessageResponse, StatusSnapshot,
};

/// Caps concurrent WebSocket connections.
struct ConnectionLimiter {
    current: AtomicUsize,
    max: usize,
}

impl ConnectionLimiter {
    fn new(max: usize) -> Self {
        Self {
            current: AtomicUsize::new(0),
            max,
        }
    }

    /// Take a slot; the slot is released when the guard drops.
    fn try_acquire(self: &Arc<Self>) -> Option<ConnectionGuard> {
        loop {
            let current = self.current.load(Ordering::Acquire);
            if current >= self.max {
                return None;
            }
            if self
                .current
                .compare_exchange(current, current + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Some(ConnectionGuard {
                    limiter: Arc::clone(self),
                });
            }
        }
    }

    fn current_count(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }
}

struct ConnectionGuard {
    limiter: Arc<ConnectionLimiter>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.limiter.current.fetch_sub(1, Ordering::Release);
    }
}

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    dashboard_state: DashboardState,
    broadcast_tx: broadcast::Sender<String>,
    connection_limiter: Arc<ConnectionLimiter>,
    config: DashboardConfig,
}

impl AppState {
    pub fn new(
        dashboard_state: DashboardState,
        broadcast_tx: broadcast::Sender<String>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            dashboard_state,
            broadcast_tx,
            connection_limiter: Arc::new(ConnectionLimiter::new(config.max_connections)),
            config,
        }
    }
}

/// Create the axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/status", get(get_status))
        .route("/api/start", post(start_bot))
        .route("/api/stop", post(stop_bot))
        .route("/api/history", get(get_history))
        .route("/api/logs", get(get_logs))
        .route("/api/wallet/deposit", post(deposit))
        .route("/api/wallet/withdraw", post(withdraw))
        .route("/metrics", get(get_metrics))
        .route("/ws", get(ws_handler))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Reject requests without valid credentials when basic auth is configured.
async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.config.auth_enabled() && !check_basic_auth(request.headers(), &state.config) {
        return unauthorized_response();
    }
    next.run(request).await
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn get_status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.dashboard_state.collect_snapshot())
}

async fn start_bot(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    state.dashboard_state.controller().start().await?;
    Ok(Json(MessageResponse::new("Bot started successfully")))
}

async fn stop_bot(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    state.dashboard_state.controller().stop().await?;
    Ok(Json(MessageResponse::new("Bot stopped successfully")))
}

async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let transactions = state.dashboard_state.history();
    Json(HistoryResponse {
        count: transactions.len(),
        transactions,
    })
}

async fn get_logs(State(state): State<AppState>) -> Json<LogsResponse> {
    Json(LogsResponse {
        logs: state.dashboard_state.recent_logs(),
    })
}

async fn deposit(
    State(state): State<AppState>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let ledger = state.dashboard_state.controller().ledger();
    let balance = ledger.deposit(request.amount)?;
    Ok(Json(BalanceResponse {
        balance,
        currency: ledger.currency().to_string(),
    }))
}

async fn withdraw(
    State(state): State<AppState>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let ledger = state.dashboard_state.controller().ledger();
    let balance = ledger.withdraw(request.amount)?;
    Ok(Json(BalanceResponse {
        balance,
        currency: ledger.currency().to_string(),
    }))
}

async fn get_metrics() -> Result<Response, ApiError> {
    let body = Metrics::gather_text()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

/// WebSocket upgrade handler.
async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let guard = match state.connection_limiter.try_acquire() {
        Some(guard) => guard,
        None => {
            warn!(
                current = state.connection_limiter.current_count(),
                max = state.config.max_connections,
                "WebSocket connection limit reached"
            );
            return (StatusCode::SERVICE_UNAVAILABLE, "Too many connections").into_response();
        }
    };

    info!(
        connections = state.connection_limiter.current_count(),
        "New WebSocket connection"
    );

    ws.on_upgrade(move |socket| handle_ws_connection(socket, state, guard))
}

/// Handle a WebSocket connection. The slot is held until this returns.
async fn handle_ws_connection(socket: WebSocket, state: AppState, _guard: ConnectionGuard) {
    let (mut sender, mut receiver) = socket.split();
    let mut broadcast_rx = state.broadcast_tx.subscribe();

    let initial = DashboardMessage::Snapshot(state.dashboard_state.collect_snapshot());
    if let Ok(json) = serde_json::to_string(&initial) {
        if sender.send(Message::Text(json.into())).await.is_err() {
            debug!("Failed to send initial snapshot, client disconnected");
            return;
        }
    }

    // Pings are answered by axum; we only watch for close
    let mut incoming_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Err(e) => {
                    debug!(error = %e, "WebSocket receive error");
                    break;
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            result = broadcast_rx.recv() => {
                match result {
                    Ok(msg) => {
                        if sender.send(Message::Text(msg.into())).await.is_err() {
                            debug!("Failed to send message, client disconnected");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "WebSocket client lagged, catching up");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed");
                        break;
                    }
                }
            }
            _ = &mut incoming_task => {
                debug!("Incoming task completed, closing connection");
                break;
            }
        }
    }

    incoming_task.abort();
    info!(
        connections = state.connection_limiter.current_count().saturating_sub(1),
        "WebSocket connection closed"
    );
}

fn check_basic_auth(headers: &HeaderMap, config: &DashboardConfig) -> bool {
    let Some(encoded) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Basic "))
    else {
        return false;
    };

    let Some(decoded) = BASE64
        .decode(encoded.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
    else {
        return false;
    };

    config.credentials().is_some_and(|expected| decoded == expected)
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"Misty\"")],
        "Unauthorized",
    )
        .into_response()
}

/// Run the dashboard HTTP server until `shutdown` resolves.
pub async fn run_server<F>(
    dashboard_state: DashboardState,
    config: DashboardConfig,
    shutdown: F,
) -> Result<(), DashboardError>
where
    F: Future<Output = ()> + Send + 'static,
{
    // Buffer for slow clients: 32 messages
    let (broadcast_tx, _) = broadcast::channel::<String>(32);

    let state = AppState::new(dashboard_state.clone(), broadcast_tx.clone(), config.clone());
    let app = create_router(state);

    let broadcaster = tokio::spawn(crate::broadcast::run_broadcaster(
        dashboard_state,
        broadcast_tx,
        config.update_interval_ms,
    ));

    let addr = config.bind_addr();
    info!(port = config.port, auth = config.auth_enabled(), "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    broadcaster.abort();
    info!("Dashboard server stopped");
    result.map_err(DashboardError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use misty_core::Secret;

    fn config_with_auth() -> DashboardConfig {
        DashboardConfig {
            username: "admin".to_string(),
            password: Some(Secret::new("hunter2")),
            ..DashboardConfig::default()
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_basic_auth_accepts_matching_credentials() {
        let value = format!("Basic {}", BASE64.encode("admin:hunter2"));
        assert!(check_basic_auth(&headers_with(&value), &config_with_auth()));
    }

    #[test]
    fn test_basic_auth_rejects_bad_credentials() {
        let config = config_with_auth();
        let wrong = format!("Basic {}", BASE64.encode("admin:nope"));
        assert!(!check_basic_auth(&headers_with(&wrong), &config));
        assert!(!check_basic_auth(&headers_with("Bearer token"), &config));
        assert!(!check_basic_auth(&headers_with("Basic !!!"), &config));
        assert!(!check_basic_auth(&HeaderMap::new(), &config));
    }

    #[test]
    fn test_connection_limiter_releases_on_drop() {
        let limiter = Arc::new(ConnectionLimiter::new(2));
        let a = limiter.try_acquire().unwrap();
        let _b = limiter.try_acquire().unwrap();
        assert!(limiter.try_acquire().is_none());
        drop(a);
        assert_eq!(limiter.current_count(), 1);
        assert!(limiter.try_acquire().is_some());
    }
}
