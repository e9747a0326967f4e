use anyhow::{anyhow, Context};
use clap::Parser;
use httpmediator::logging::{init_logging_with_config, LogConfig};
use httpmediator::router::load_routes;
use httpmediator::runtime_config::RuntimeConfig;
use httpmediator::server::HttpServer;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "product_store", about = "Product store sample server")]
struct Args {
    /// Address and port to bind
    #[arg(long, env = "HTTPMED_ADDR", default_value = "0.0.0.0:8080")]
    addr: String,

    /// Route table to serve instead of the bundled one
    #[arg(long, env = "HTTPMED_ROUTES")]
    routes: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logging = init_logging_with_config(&LogConfig::from_env())?;
    RuntimeConfig::from_env().apply();

    let routes = match &args.routes {
        Some(path) => load_routes(path)?,
        None => product_store::routes()?,
    };
    let service = product_store::build_service(routes)?;

    let handle = HttpServer(service)
        .start(args.addr.as_str())
        .with_context(|| format!("failed to bind {}", args.addr))?;
    info!(addr = %handle.addr(), "product_store listening");
    handle
        .join()
        .map_err(|e| anyhow!("server coroutine panicked: {e:?}"))
}
