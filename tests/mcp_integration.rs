//! Integration tests for MCP protocol handling over the line transport.
//!
//! These tests drive the stdio server through in-memory buffers, covering
//! request/response handling, error responses and lifecycle management.

mod common;

use serde_json::{json, Value};

use vue_bits_mcp::mcp::protocol::{parse_message, IncomingMessage, RequestId};
use vue_bits_mcp::mcp::server::ServerState;
use vue_bits_mcp::mcp::{LineTransport, McpServer};

/// Feeds `lines` to a fresh server and returns every reply line, parsed.
async fn exchange(lines: &[&str]) -> (Vec<Value>, ServerState) {
    let input = lines.join("\n") + "\n";
    let mut transport = LineTransport::new(input.as_bytes(), Vec::new());
    let mut server = McpServer::new(common::handler());

    server.serve(&mut transport).await.unwrap();

    let (_, written) = transport.into_parts();
    let replies = String::from_utf8(written)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (replies, server.state())
}

fn call(id: u64, tool: &str, arguments: &Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    })
    .to_string()
}

const INITIALIZE: &str = r#"{"jsonrpc":"2.0","id":0,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test-client","version":"1.0.0"}}}"#;
const INITIALIZED: &str = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;

// =============================================================================
// Protocol Parsing Tests
// =============================================================================

#[test]
fn test_parse_initialize_request() {
    match parse_message(INITIALIZE).unwrap() {
        IncomingMessage::Request(req) => {
            assert_eq!(req.method, "initialize");
            assert_eq!(req.id, RequestId::Number(0));
        }
        IncomingMessage::Notification(_) => panic!("Expected Request"),
    }
}

#[test]
fn test_parse_notification() {
    match parse_message(INITIALIZED).unwrap() {
        IncomingMessage::Notification(notif) => {
            assert_eq!(notif.method, "notifications/initialized");
        }
        IncomingMessage::Request(_) => panic!("Expected Notification"),
    }
}

#[test]
fn test_parse_missing_jsonrpc_version() {
    assert!(parse_message(r#"{"id": 1, "method": "test"}"#).is_err());
}

// =============================================================================
// stdio Session Tests
// =============================================================================

#[tokio::test]
async fn test_full_session() {
    let search = call(1, "search_vue_components", &json!({"query": "text"}));
    let (replies, state) = exchange(&[
        INITIALIZE,
        INITIALIZED,
        r#"{"jsonrpc":"2.0","id":"list","method":"tools/list"}"#,
        &search,
    ])
    .await;

    // The notification gets no reply.
    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(replies[0]["result"]["serverInfo"]["name"], "vue-bits-mcp");

    assert_eq!(replies[1]["id"], "list");
    let tools = replies[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 10);
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));

    let text = replies[2]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("**Found:** 2 of 2 components"));
    assert!(text.contains("SplitText"));
    assert!(text.contains("BlurText"));

    assert_eq!(state, ServerState::ShuttingDown);
}

#[tokio::test]
async fn test_tools_rejected_before_initialize() {
    let (replies, _) = exchange(&[r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#]).await;
    assert_eq!(replies[0]["error"]["code"], -32600);
    assert_eq!(replies[0]["error"]["message"], "Server not initialised");
}

#[tokio::test]
async fn test_unsupported_version_falls_back() {
    let (replies, _) = exchange(&[
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"1999-01-01"}}"#,
    ])
    .await;
    assert_eq!(replies[0]["result"]["protocolVersion"], "2024-11-05");
}

#[tokio::test]
async fn test_blank_lines_and_garbage() {
    let (replies, _) = exchange(&["", "   ", "not valid json", INITIALIZE]).await;
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["error"]["code"], -32700);
    assert!(replies[0]["id"].is_null());
    assert!(replies[1]["result"].is_object());
}

#[tokio::test]
async fn test_unknown_method() {
    let (replies, _) = exchange(&[
        INITIALIZE,
        r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#,
    ])
    .await;
    assert_eq!(replies[1]["error"]["code"], -32601);
}

#[tokio::test]
async fn test_tool_errors_are_payloads() {
    let missing = call(2, "get_component_code", &json!({"componentId": "nope"}));
    let unknown = call(3, "summon_component", &json!({}));
    let no_ref = call(4, "get_component_props", &json!({}));
    let (replies, _) = exchange(&[INITIALIZE, &missing, &unknown, &no_ref]).await;

    assert_eq!(replies[1]["result"]["isError"], true);
    assert_eq!(replies[1]["result"]["content"][0]["text"], "Component not found");

    assert_eq!(replies[2]["result"]["isError"], true);
    assert_eq!(
        replies[2]["result"]["content"][0]["text"],
        "Error: Unknown tool: summon_component"
    );

    assert_eq!(replies[3]["result"]["isError"], true);
    assert!(replies[3]["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Error: Missing required parameter"));
}

#[tokio::test]
async fn test_component_lookup_by_name() {
    let code = call(
        2,
        "get_component_code",
        &json!({"componentName": "aurora", "includeProps": false}),
    );
    let (replies, _) = exchange(&[INITIALIZE, &code]).await;

    let text = replies[1]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Aurora"));
    assert!(text.contains("<canvas"));
    assert!(replies[1]["result"].get("isError").is_none());
}

#[tokio::test]
async fn test_dependency_analysis_drops_unknown_ids() {
    let analyze = call(
        2,
        "analyze_dependencies",
        &json!({"componentIds": ["backgrounds-aurora", "missing"], "packageManager": "pnpm"}),
    );
    let nothing = call(3, "analyze_dependencies", &json!({"componentIds": ["missing"]}));
    let (replies, _) = exchange(&[INITIALIZE, &analyze, &nothing]).await;

    let text = replies[1]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("pnpm add"));
    assert!(text.contains("ogl"));

    assert_eq!(replies[2]["result"]["isError"], true);
}
