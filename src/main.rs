use httpmediator::cli::run_cli;
use httpmediator::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    let _logging = init_logging_with_config(&LogConfig::from_env())?;
    run_cli()
}
