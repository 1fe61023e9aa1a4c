//! clab-tools - command and configuration toolkit for containerlab devices
//!
//! This is the main entry point for the clab-tools CLI.

use anyhow::Result;
use clab_tools::cli::commands::CommandContext;
use clab_tools::cli::{Cli, Commands};
use clab_tools::config::Settings;
use clab_tools::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbosity());

    if cli.no_color {
        colored::control::set_override(false);
    }

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            let err = Error::Config(format!("{:#}", e));
            eprintln!("Error: {}", err);
            std::process::exit(err.exit_code());
        }
    };

    if !settings.colors.enabled {
        colored::control::set_override(false);
    }

    let ctx = CommandContext::new(&cli, settings);

    let outcome = match &cli.command {
        Commands::Run(args) => args.execute(&ctx).await,
        Commands::Config(args) => args.execute(&ctx).await,
        Commands::Facts(args) => args.execute(&ctx).await,
        Commands::Nodes(args) => args.execute(&ctx).await,
        Commands::Drivers(args) => args.execute(&ctx).await,
    };

    let exit_code = match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(verbosity >= 3).with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}
