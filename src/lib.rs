//! vue-bits-mcp: MCP server for the Vue Bits animated component library
//!
//! This library scans a Vue Bits checkout into a component catalogue and
//! serves it to AI assistants as read-only MCP tools.
//!
//! # Architecture
//!
//! - **Catalogue**: `.vue` sources are scraped once into records and cached as JSON
//! - **Search**: linear-scan filtering with pluggable relevance scoring
//! - **Tools**: ten query operations rendered as Markdown
//! - **Transports**: newline-delimited stdio, or HTTP with SSE for long-running tools
//!
//! # Modules
//!
//! - [`catalog`]: Component records, source scanner and cache
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types
//! - [`mcp`]: MCP protocol, transports and sessions
//! - [`search`]: Search engine and scoring
//! - [`tools`]: Tool definitions, dispatch and rendering

pub mod catalog;
pub mod config;
pub mod error;
pub mod mcp;
pub mod search;
pub mod tools;
