use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod app;
mod bootstrap;
mod cli;
mod command;
mod config;
mod error;
mod events;
mod modules;
mod overlay;
mod pages;
mod readiness;
mod router;
mod template;
mod view;

use cli::{Cli, Commands};
use command::RunOptions;
use config::DashConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref().map(PathBuf::from);
    let config =
        DashConfig::resolve(config_path.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Some(Commands::Run {
            route,
            navigate,
            templates,
            local,
            no_overlay,
            stagger_ms,
            reload,
            show_html,
        }) => {
            command::run_dashboard(
                config,
                RunOptions {
                    route,
                    navigate,
                    templates,
                    local,
                    no_overlay,
                    stagger_ms,
                    reload,
                    show_html,
                },
            )
            .await?;
        }
        Some(Commands::Routes) => {
            command::run_routes(&config)?;
        }
        Some(Commands::Config) => {
            command::run_show_config(&config)?;
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            eprintln!("Use 'countdown-dash run' to boot the dashboard.");
        }
    }

    Ok(())
}
