use crate::dispatcher::Dispatcher;
use crate::echo::echo_handler;
use crate::middleware::TracingMiddleware;
use crate::router::{load_routes, RouteMeta, Router};
use crate::runtime_config::RuntimeConfig;
use crate::server::{AppService, HttpServer};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Command-line interface for httpmediator
#[derive(Debug, Parser)]
#[command(name = "httpmediator")]
#[command(version, about = "Route table inspection and echo server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the compiled routing table of a route file
    Routes {
        /// Route table (YAML or JSON)
        #[arg(short, long, env = "HTTPMED_ROUTES")]
        file: PathBuf,
    },
    /// Serve a route file with echo handlers
    Serve {
        /// Route table (YAML or JSON)
        #[arg(short, long, env = "HTTPMED_ROUTES")]
        file: PathBuf,

        /// Address and port to bind
        #[arg(long, env = "HTTPMED_ADDR", default_value = "0.0.0.0:8080")]
        addr: String,
    },
}

/// Distinct handler names in declaration order of first use.
fn handler_names(routes: &[RouteMeta]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    routes
        .iter()
        .filter(|r| seen.insert(r.handler_name.clone()))
        .map(|r| r.handler_name.clone())
        .collect()
}

/// Build a dispatcher that answers every handler name with [`echo_handler`].
#[must_use]
pub fn echo_dispatcher(routes: &[RouteMeta]) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_middleware(Arc::new(TracingMiddleware));
    for name in handler_names(routes) {
        // SAFETY: the runtime is configured before any command spawns handlers.
        unsafe {
            dispatcher.register_handler(&name, echo_handler);
        }
    }
    dispatcher
}

/// Execute a parsed command.
///
/// # Errors
///
/// Route file loading, route compilation, or server start-up failures.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Routes { file } => {
            let router = Router::new(load_routes(&file)?)?;
            router.dump_routes();
            Ok(())
        }
        Commands::Serve { file, addr } => {
            RuntimeConfig::from_env().apply();

            let routes = load_routes(&file)?;
            let dispatcher = echo_dispatcher(&routes);
            let router = Router::new(routes)?;
            let service = AppService::new(router, dispatcher);

            let handle = HttpServer(service)
                .start(addr.as_str())
                .with_context(|| format!("failed to bind {addr}"))?;
            info!(addr = %handle.addr(), routes = %file.display(), "Echo server listening");
            handle
                .join()
                .map_err(|e| anyhow!("server coroutine panicked: {e:?}"))
        }
    }
}

/// Parse `std::env::args` and run.
///
/// # Errors
///
/// See [`run`].
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}
