//! Vitrine - declare, order, build and serve versioned static assets.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use vitrine::config::AssetsConfig;
use vitrine::{logger, server};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    server::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let mut config = AssetsConfig::load(&cli.config)?;
    if let Commands::Serve { interface, port } = &cli.command {
        config.apply_serve_options(*interface, *port);
    }
    let declared = config.declare()?;

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve(&config, &declared),
        Commands::Compile { force } => cli::compile::compile_all(&declared, *force),
        Commands::Resolve { args } => cli::resolve::resolve(args, &config, &declared),
    }
}
