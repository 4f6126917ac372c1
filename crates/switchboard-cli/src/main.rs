//! Switchboard CLI: run the dispatch server or call methods on it.

use std::time::Duration;

use clap::{Parser, Subcommand};
use switchboard_cli::commands;
use switchboard_core::ParamErrorPolicy;
use switchboard_server::ServerConfig;

/// Switchboard: JSON-RPC method and resource dispatch server
#[derive(Parser)]
#[command(name = "switchboard", version, about = "Switchboard: JSON-RPC method and resource dispatch server")]
pub struct Cli {
    /// Report parameter-binding failures as -32602 (Invalid params)
    /// instead of -32603 (Internal error)
    #[arg(long, env = "SWITCHBOARD_STRICT_PARAMS", global = true)]
    strict_params: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server with the sample handlers registered
    Server {
        /// Host to bind to
        #[arg(long, env = "SWITCHBOARD_HOST", default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, env = "SWITCHBOARD_PORT", default_value_t = 8080)]
        port: u16,
        /// Per-request timeout in seconds
        #[arg(long, env = "SWITCHBOARD_TIMEOUT_SECS", default_value_t = 30)]
        timeout_secs: u64,
        /// Server name reported by /api/health
        #[arg(long, default_value = "switchboard")]
        name: String,
    },

    /// Dispatch a JSON-RPC request in-process, without a server
    Rpc {
        /// JSON-RPC method name (e.g. "add")
        #[arg(long)]
        method: String,
        /// JSON-RPC params as a JSON string
        #[arg(long, default_value = "{}")]
        params: String,
    },

    /// Send a JSON-RPC request to a running server
    Call {
        /// Base URL of the server
        #[arg(long, env = "SWITCHBOARD_URL", default_value = "http://127.0.0.1:8080")]
        url: String,
        /// JSON-RPC method name
        #[arg(long)]
        method: String,
        /// JSON-RPC params as a JSON string
        #[arg(long, default_value = "{}")]
        params: String,
        /// Send as a notification (no id, no response)
        #[arg(long)]
        notify: bool,
    },

    /// List registered methods and resources
    Methods,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Some(Commands::Server { .. }) => {
            "switchboard_core=info,switchboard_server=info,switchboard_cli=info,tower_http=info"
        }
        _ => "switchboard_core=warn,switchboard_server=warn,switchboard_cli=info",
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let policy = if cli.strict_params {
        ParamErrorPolicy::Strict
    } else {
        ParamErrorPolicy::Conflated
    };

    let result = match cli.command {
        Some(Commands::Server {
            host,
            port,
            timeout_secs,
            name,
        }) => {
            let config = ServerConfig {
                host,
                port,
                request_timeout: Duration::from_secs(timeout_secs),
                param_error_policy: policy,
                server_name: name,
            };
            commands::server::run(config).await
        }

        Some(Commands::Rpc { method, params }) => commands::rpc::call(&method, &params, policy),

        Some(Commands::Call {
            url,
            method,
            params,
            notify,
        }) => commands::call::run(&url, &method, &params, notify).await,

        Some(Commands::Methods) => commands::methods::list(),

        None => {
            // No subcommand: show help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
