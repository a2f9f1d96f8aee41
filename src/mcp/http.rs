//! Streamable HTTP transport.
//!
//! | Route          | Purpose                                               |
//! |----------------|-------------------------------------------------------|
//! | `POST /mcp`    | JSON-RPC request; JSON reply or one SSE `data:` frame  |
//! | `GET /mcp`     | SSE stream: `connected`, then a `ping` per interval    |
//! | `DELETE /mcp`  | End the session named by `Mcp-Session-Id`             |
//! | `GET /health`  | Liveness check                                        |
//! | `GET /`        | Server description                                    |
//!
//! The `MCP-Protocol-Version` header is checked before anything else on
//! the `/mcp` routes. A missing header means `2024-11-05`.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use futures_util::stream::{self, Stream, StreamExt};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::{Environment, HttpConfig};
use crate::mcp::handler::{tool_response, McpHandler};
use crate::mcp::protocol::{
    is_supported_version, parse_message, IncomingMessage, JsonRpcError, JsonRpcRequest,
    RequestId, MCP_PROTOCOL_VERSION, SESSION_NOT_FOUND,
};
use crate::mcp::session::SessionManager;

/// `Mcp-Session-Id` header.
pub const SESSION_ID_HEADER: HeaderName = HeaderName::from_static("mcp-session-id");
/// `MCP-Protocol-Version` header.
pub const PROTOCOL_VERSION_HEADER: HeaderName = HeaderName::from_static("mcp-protocol-version");
const LAST_EVENT_ID_HEADER: HeaderName = HeaderName::from_static("last-event-id");

struct Shared {
    handler: McpHandler,
    sessions: SessionManager,
    long_running_tools: Vec<String>,
    keepalive: Duration,
    allowed_origins: Vec<String>,
    environment: Environment,
}

/// State shared by every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Shared>,
}

impl AppState {
    /// Creates the state. The session map starts empty.
    #[must_use]
    pub fn new(handler: McpHandler, http: &HttpConfig, environment: Environment) -> Self {
        Self {
            inner: Arc::new(Shared {
                handler,
                sessions: SessionManager::new(),
                long_running_tools: http.long_running_tools.clone(),
                keepalive: Duration::from_secs(http.keepalive_interval_secs),
                allowed_origins: http.allowed_origins.clone(),
                environment,
            }),
        }
    }

    /// Returns the request handler.
    #[must_use]
    pub fn handler(&self) -> &McpHandler {
        &self.inner.handler
    }

    /// Returns the session map.
    #[must_use]
    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    /// Returns `true` if `tool` answers over SSE.
    #[must_use]
    pub fn is_long_running(&self, tool: &str) -> bool {
        self.inner.long_running_tools.iter().any(|t| t == tool)
    }
}

/// Returns `true` if a browser at `origin` may call the server.
///
/// Listed origins are always admitted. In development any localhost
/// origin is admitted too.
#[must_use]
pub fn origin_allowed(origin: &str, allowed: &[String], environment: Environment) -> bool {
    if allowed.iter().any(|o| o == origin) {
        return true;
    }
    environment == Environment::Development
        && (origin.contains("localhost") || origin.contains("127.0.0.1"))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed = state.inner.allowed_origins.clone();
    let environment = state.inner.environment;

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .is_ok_and(|o| origin_allowed(o, &allowed, environment))
        }))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            SESSION_ID_HEADER,
            PROTOCOL_VERSION_HEADER,
            LAST_EVENT_ID_HEADER,
        ])
        .expose_headers([SESSION_ID_HEADER])
}

/// Builds the router with CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/mcp", get(open_stream).post(post_message).delete(end_session))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Binds `host:port` and serves until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or serving fails.
pub async fn serve(http: &HttpConfig, state: AppState) -> std::io::Result<()> {
    let addr = format!("{}:{}", http.host, http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "MCP HTTP server listening");
    info!("MCP endpoint: http://{addr}/mcp");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (Ok(mut sigint), Ok(mut sigterm)) = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) else {
        warn!("Failed to install signal handlers, graceful shutdown disabled");
        return std::future::pending().await;
    };

    tokio::select! {
        _ = sigint.recv() => info!("Received SIGINT, initiating graceful shutdown"),
        _ = sigterm.recv() => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

#[cfg(windows)]
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C, initiating graceful shutdown");
    } else {
        warn!("Failed to listen for Ctrl+C, graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Returns the declared protocol version if it is not supported.
fn unsupported_version(headers: &HeaderMap) -> Option<&str> {
    let version = header_str(headers, &PROTOCOL_VERSION_HEADER).unwrap_or(MCP_PROTOCOL_VERSION);
    (!is_supported_version(version)).then_some(version)
}

/// Best-effort extraction of the request id from a body we may not be
/// able to fully parse.
fn peek_id(body: &[u8]) -> Option<RequestId> {
    let value: Value = serde_json::from_slice(body).ok()?;
    serde_json::from_value(value.get("id")?.clone()).ok()
}

fn status_for(error: &JsonRpcError) -> StatusCode {
    match error.error.code {
        SESSION_NOT_FOUND => StatusCode::NOT_FOUND,
        -32603 => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn error_response(error: &JsonRpcError) -> Response {
    (status_for(error), Json(error)).into_response()
}

async fn post_message(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    if let Some(version) = unsupported_version(&headers) {
        warn!(version, "Rejected unsupported protocol version");
        return error_response(&JsonRpcError::unsupported_version(peek_id(&body), version));
    }

    let message = match std::str::from_utf8(&body)
        .map_err(|_| JsonRpcError::parse_error())
        .and_then(parse_message)
    {
        Ok(message) => message,
        Err(error) => return error_response(&error),
    };
    debug!(method = message.method(), "Received MCP message");

    let request = match message {
        IncomingMessage::Request(req) if req.method == "initialize" => {
            return initialize(&state, &req);
        }
        IncomingMessage::Request(req) => req,
        IncomingMessage::Notification(_) => return StatusCode::ACCEPTED.into_response(),
    };

    if let Some(session_id) = header_str(&headers, &SESSION_ID_HEADER) {
        if !state.sessions().contains(session_id) {
            debug!(session_id, "Unknown session");
            return error_response(&JsonRpcError::session_not_found(Some(request.id)));
        }
    }

    if request.method == "tools/call" {
        return call_tool(&state, &request);
    }

    match state.handler().handle(&request) {
        Ok(response) => Json(response).into_response(),
        Err(error) => error_response(&error),
    }
}

fn initialize(state: &AppState, req: &JsonRpcRequest) -> Response {
    let init = state.handler().initialize(req);

    let session = state
        .sessions()
        .create(init.protocol_version, init.client_info);

    let mut response = Json(init.response).into_response();
    match HeaderValue::from_str(&session.id) {
        Ok(value) => {
            response.headers_mut().insert(SESSION_ID_HEADER, value);
        }
        Err(e) => warn!(error = %e, "Session id is not a valid header value"),
    }
    response
}

fn call_tool(state: &AppState, req: &JsonRpcRequest) -> Response {
    let tool = req
        .params
        .as_ref()
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let long_running = state.is_long_running(tool);

    let response = match state
        .handler()
        .call_tool(req)
        .and_then(|result| tool_response(req, &result))
    {
        Ok(response) => response,
        Err(error) if long_running => return single_event(&error),
        Err(error) => return error_response(&error),
    };

    if long_running {
        debug!(tool, "Delivering tool result over SSE");
        single_event(&response)
    } else {
        Json(response).into_response()
    }
}

/// Sends `payload` as one SSE `data:` frame and closes the stream.
fn single_event<T: serde::Serialize>(payload: &T) -> Response {
    match serde_json::to_string(payload) {
        Ok(data) => {
            let event = Event::default().data(data);
            Sse::new(stream::once(async move { Ok::<_, Infallible>(event) })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to serialise SSE payload");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn status_event(kind: &str) -> Event {
    let payload = json!({
        "type": kind,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    });
    Event::default().data(payload.to_string())
}

/// Logs when the client goes away and the stream is dropped.
struct StreamClosed;

impl Drop for StreamClosed {
    fn drop(&mut self) {
        info!("SSE connection closed");
    }
}

fn keepalive_stream(period: Duration) -> impl Stream<Item = Result<Event, Infallible>> + Send {
    let start = tokio::time::Instant::now() + period;
    let ticks = tokio::time::interval_at(start, period);

    // The guard lives in the unfold state and drops with the stream.
    let pings = stream::unfold((ticks, StreamClosed), |(mut ticks, guard)| async move {
        ticks.tick().await;
        Some((Ok::<_, Infallible>(status_event("ping")), (ticks, guard)))
    });

    stream::once(async { Ok::<_, Infallible>(status_event("connected")) }).chain(pings)
}

async fn open_stream(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(version) = unsupported_version(&headers) {
        return error_response(&JsonRpcError::unsupported_version(None, version));
    }

    if let Some(session_id) = header_str(&headers, &SESSION_ID_HEADER) {
        if !state.sessions().contains(session_id) {
            return (StatusCode::NOT_FOUND, "Session not found").into_response();
        }
    }

    info!("SSE connection established");
    Sse::new(keepalive_stream(state.inner.keepalive)).into_response()
}

async fn end_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(version) = unsupported_version(&headers) {
        return error_response(&JsonRpcError::unsupported_version(None, version));
    }

    match header_str(&headers, &SESSION_ID_HEADER) {
        Some(id) if state.sessions().remove(id).is_some() => {
            (StatusCode::OK, "Session terminated").into_response()
        }
        _ => (StatusCode::NOT_FOUND, "Session not found").into_response(),
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "http-stream",
        "components": state.handler().tools().engine().catalog().len(),
        "sessions": state.sessions().len(),
    }))
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Vue Bits MCP Server",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "http-stream",
        "endpoints": {
            "mcp": "/mcp",
            "health": "/health"
        },
        "capabilities": {
            "tools": true,
            "sse": true
        }
    }))
}
