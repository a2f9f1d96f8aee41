//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the component catalogue as read-only tools to AI assistants over
//! two transports that share one request handler:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   ┌─────────────┐                                            │
//! │   │ stdio       │──┐                                         │
//! │   │ (server)    │  │   ┌─────────────┐    ┌─────────────┐    │
//! │   └─────────────┘  ├──▶│   Handler   │───▶│   Tools     │    │
//! │   ┌─────────────┐  │   │ (JSON-RPC)  │    │ (search)    │    │
//! │   │ HTTP + SSE  │──┘   └─────────────┘    └─────────────┘    │
//! │   │ (sessions)  │                                            │
//! │   └─────────────┘                                            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! Versions 2024-11-05, 2025-03-26 and 2025-06-18 are accepted; 2024-11-05
//! is assumed when a client does not say.

pub mod handler;
pub mod http;
pub mod protocol;
pub mod server;
pub mod session;
pub mod transport;

pub use handler::McpHandler;
pub use http::AppState;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use session::SessionManager;
pub use transport::{LineTransport, StdioTransport};
