//! Error types for vue-bits-mcp.
//!
//! Three families are kept apart because they surface differently:
//!
//! - [`ConfigError`] aborts startup before any transport is opened.
//! - [`CatalogError`] is logged and degrades the server to an empty
//!   catalogue, except on the `--parse` path where it ends the process.
//! - [`ToolError`] is rendered into an `isError` tool result and never
//!   becomes a transport failure.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors raised while building or persisting the component catalogue.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The component source tree does not exist.
    #[error("component source directory not found: {path}")]
    SourceNotFound {
        /// Directory that was expected to contain `src/content`.
        path: PathBuf,
    },

    /// A file or directory could not be read.
    #[error("failed to read {path}")]
    Read {
        /// Path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The cache file could not be written.
    #[error("failed to write {path}")]
    Write {
        /// Path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The cache file is not valid component JSON.
    #[error("invalid component cache: {path}")]
    Cache {
        /// Path to the cache file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The records could not be serialised for the cache.
    #[error("failed to serialise component cache")]
    Serialise(#[source] serde_json::Error),

    /// A glob pattern for source discovery was rejected.
    #[error("invalid source pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// A scraping pattern failed to compile.
    #[error("invalid scraping pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Domain errors produced while executing a tool call.
#[derive(Error, Debug)]
pub enum ToolError {
    /// No record matched the requested id or name.
    #[error("Component not found")]
    ComponentNotFound,

    /// None of the requested ids resolved to a record.
    #[error("No valid components found")]
    NoValidComponents,

    /// Neither `componentId` nor `componentName` was supplied.
    #[error("Missing required parameter: componentId or componentName")]
    MissingComponentRef,

    /// The arguments did not match the tool's schema.
    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        /// Tool that rejected the arguments.
        tool: String,
        /// The underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// The tool name is not one of the registered tools.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A result could not be rendered.
    #[error("Failed to serialise result: {0}")]
    Serialise(#[source] serde_json::Error),
}

impl ToolError {
    /// Returns `true` for lookups that simply found nothing.
    ///
    /// These are reported with their bare message; everything else is
    /// prefixed with `Error:`.
    #[must_use]
    pub const fn is_lookup_miss(&self) -> bool {
        matches!(self, Self::ComponentNotFound | Self::NoValidComponents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn validation_error_display() {
        let error = ConfigError::ValidationError {
            message: "invalid setting".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("invalid setting"));
    }

    #[test]
    fn catalog_error_names_path() {
        let error = CatalogError::SourceNotFound {
            path: PathBuf::from("/srv/vue-bits"),
        };
        assert!(error.to_string().contains("/srv/vue-bits"));
    }

    #[test]
    fn tool_error_messages_are_user_facing() {
        assert_eq!(ToolError::ComponentNotFound.to_string(), "Component not found");
        assert_eq!(
            ToolError::UnknownTool("nope".to_string()).to_string(),
            "Unknown tool: nope"
        );
    }
}
