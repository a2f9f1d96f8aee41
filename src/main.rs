//! vue-bits-mcp: MCP server for the Vue Bits animated component library
//!
//! Serves the component catalogue over HTTP/SSE by default, or over stdio
//! when embedded as a child process.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use vue_bits_mcp::catalog;
use vue_bits_mcp::config::{self, Config};
use vue_bits_mcp::mcp::{http, AppState, McpHandler, McpServer};
use vue_bits_mcp::search::SearchEngine;
use vue_bits_mcp::tools::ToolHandlers;

/// MCP server for the Vue Bits animated component library.
///
/// Lets AI assistants search Vue Bits components and fetch their source,
/// props and installation instructions.
#[derive(Parser, Debug)]
#[command(name = "vue-bits-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// HTTP port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Rescan the Vue Bits sources, rewrite the component cache and exit
    #[arg(long)]
    parse: bool,

    /// Root of the Vue Bits checkout
    #[arg(long, value_name = "DIR", env = "VUE_BITS_PATH")]
    vue_bits_path: Option<PathBuf>,

    /// Serve over stdin/stdout instead of HTTP
    #[arg(long)]
    stdio: bool,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "info" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber. Logs go to stderr so stdout stays
/// free for the stdio transport.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file, then layers environment and CLI overrides.
fn resolve_config(args: &Args) -> Result<Config, String> {
    let config_path = args.config.as_deref();
    let mut cfg = config::load_config(config_path).map_err(|e| e.to_string())?;
    cfg.apply_env().map_err(|e| e.to_string())?;

    if let Some(port) = args.port {
        cfg.http.port = port;
    }
    if let Some(path) = &args.vue_bits_path {
        cfg.vue_bits_path.clone_from(path);
    }

    cfg.validate().map_err(|e| e.to_string())?;
    Ok(cfg)
}

/// Entry point for the vue-bits-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match resolve_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if args.config.is_none() {
                if let Some(default_path) = config::default_config_path() {
                    eprintln!("\nConfig is read from: {}", default_path.display());
                }
            }
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    let cache_path = cfg.resolved_cache_path();

    if args.parse {
        return match catalog::rebuild(&cfg.vue_bits_path, &cache_path) {
            Ok(catalog) => {
                info!(count = catalog.len(), "Component cache rebuilt");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "Failed to rebuild component cache");
                ExitCode::FAILURE
            }
        };
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = cfg.environment.as_str(),
        "Starting vue-bits-mcp server"
    );

    let catalog = catalog::load_or_rebuild(&cache_path, &cfg.vue_bits_path);
    info!(components = catalog.len(), "Component catalogue ready");

    let handler = McpHandler::new(ToolHandlers::new(SearchEngine::new(catalog)));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = if args.stdio {
        info!("MCP server ready, waiting for client on stdin...");
        let mut server = McpServer::new(handler);
        runtime.block_on(server.run())
    } else {
        let state = AppState::new(handler, &cfg.http, cfg.environment);
        runtime.block_on(http::serve(&cfg.http, state))
    };

    match result {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
