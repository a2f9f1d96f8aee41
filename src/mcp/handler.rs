//! Transport-independent MCP request handling.
//!
//! Both the stdio server and the HTTP router feed parsed requests through
//! [`McpHandler`]. Lifecycle and session bookkeeping stay with the
//! transports; this type only knows how to answer a method.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::mcp::protocol::{
    negotiate_version, JsonRpcError, JsonRpcRequest, JsonRpcResponse, SERVER_NAME,
};
use crate::search::{Scorer, WeightedScorer};
use crate::tools::{definitions, ToolCallResult, ToolHandlers};

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapabilities>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ToolCapabilities::default()),
        }
    }
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if passes &T
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Server information for the initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    #[serde(default)]
    pub name: String,
    /// Client version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
///
/// Every field is optional and a malformed field reads as absent, so an
/// `initialize` request is always answered.
#[derive(Debug, Clone, Default)]
pub struct InitializeParams {
    /// Protocol version requested by the client.
    pub protocol_version: Option<String>,
    /// Client capabilities.
    pub capabilities: Value,
    /// Client information.
    pub client_info: Option<ClientInfo>,
}

impl InitializeParams {
    /// Reads whatever fields are usable from raw request params.
    #[must_use]
    pub fn lenient(params: Option<&Value>) -> Self {
        let Some(obj) = params.and_then(Value::as_object) else {
            if params.is_some_and(|p| !p.is_null()) {
                tracing::warn!("initialize params are not an object, using defaults");
            }
            return Self::default();
        };

        let protocol_version = match obj.get("protocolVersion") {
            None | Some(Value::Null) => None,
            Some(Value::String(v)) => Some(v.clone()),
            Some(other) => {
                tracing::warn!(value = %other, "Ignoring non-string protocolVersion");
                None
            }
        };

        let client_info = obj
            .get("clientInfo")
            .filter(|v| !v.is_null())
            .and_then(|v| match serde_json::from_value(v.clone()) {
                Ok(info) => Some(info),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring malformed clientInfo");
                    None
                }
            });

        Self {
            protocol_version,
            capabilities: obj.get("capabilities").cloned().unwrap_or_default(),
            client_info,
        }
    }
}

/// Parameters for a `tools/call` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// A successful `initialize` exchange.
#[derive(Debug, Clone)]
pub struct Initialized {
    /// The response to send.
    pub response: JsonRpcResponse,
    /// The version that was agreed.
    pub protocol_version: &'static str,
    /// What the client said about itself.
    pub client_info: Option<ClientInfo>,
}

/// Answers MCP methods against the tool handlers.
#[derive(Debug)]
pub struct McpHandler<S = WeightedScorer> {
    tools: ToolHandlers<S>,
}

impl<S: Scorer> McpHandler<S> {
    /// Creates a handler.
    #[must_use]
    pub const fn new(tools: ToolHandlers<S>) -> Self {
        Self { tools }
    }

    /// Returns the tool handlers.
    #[must_use]
    pub const fn tools(&self) -> &ToolHandlers<S> {
        &self.tools
    }

    /// Answers every method except `initialize`, which needs transport
    /// state and goes through [`Self::initialize`].
    ///
    /// # Errors
    ///
    /// Returns a JSON-RPC error for unknown methods or malformed params.
    pub fn handle(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        match req.method.as_str() {
            "initialize" => Ok(self.initialize(req).response),
            "tools/list" => Ok(Self::tools_list(req)),
            "tools/call" => self.tools_call(req),
            "ping" => Ok(Self::ping(req)),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        }
    }

    /// Answers `initialize`. Missing or malformed params fall back to
    /// defaults, so this never fails.
    pub fn initialize(&self, req: &JsonRpcRequest) -> Initialized {
        let params = InitializeParams::lenient(req.params.as_ref());

        let protocol_version = negotiate_version(params.protocol_version.as_deref());
        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = client.version.as_deref().unwrap_or("unknown"),
                protocol_version,
                "Client initialising"
            );
        }

        let result = json!({
            "protocolVersion": protocol_version,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Initialized {
            response: JsonRpcResponse::success(req.id.clone(), result),
            protocol_version,
            client_info: params.client_info,
        }
    }

    /// Parses `tools/call` params and runs the tool.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` if the params are missing or malformed.
    pub fn call_tool(&self, req: &JsonRpcRequest) -> Result<ToolCallResult, JsonRpcError> {
        let params: ToolCallParams = parse_params(req, "tool call")?.ok_or_else(|| {
            JsonRpcError::invalid_params(req.id.clone(), "Missing tool call params")
        })?;

        tracing::debug!(tool = %params.name, "Calling tool");
        Ok(self.tools.call(&params.name, &params.arguments))
    }

    fn tools_list(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({ "tools": definitions::all() }))
    }

    fn tools_call(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        let result = self.call_tool(req)?;
        tool_response(req, &result)
    }

    fn ping(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({}))
    }
}

/// Wraps a tool result in a JSON-RPC response.
///
/// # Errors
///
/// Returns an internal error if the result cannot be serialised.
pub fn tool_response(
    req: &JsonRpcRequest,
    result: &ToolCallResult,
) -> Result<JsonRpcResponse, JsonRpcError> {
    let value = serde_json::to_value(result).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialise tool call result");
        JsonRpcError::internal_error(req.id.clone(), "Internal error: failed to serialise result")
    })?;
    Ok(JsonRpcResponse::success(req.id.clone(), value))
}

fn parse_params<T: serde::de::DeserializeOwned>(
    req: &JsonRpcRequest,
    what: &str,
) -> Result<Option<T>, JsonRpcError> {
    req.params
        .as_ref()
        .filter(|p| !p.is_null())
        .map(|p| serde_json::from_value(p.clone()))
        .transpose()
        .map_err(|e| JsonRpcError::invalid_params(req.id.clone(), format!("Invalid {what} params: {e}")))
}
