mod cli;
mod commands;
mod config;
mod error;
mod hardware;
mod netbox;
mod output;
mod platform;
mod reconcile;
mod tools;

use clap::Parser;
use cli::Cli;
use commands::handle_command;
use config::AgentConfig;
use output::print_error;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let result = load_config(&cli).and_then(|config| handle_command(&cli.command, &config));

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<AgentConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => AgentConfig::load_from(path)?,
        None => AgentConfig::load()?,
    };
    if let Some(url) = &cli.url {
        config.netbox.url = url.clone();
    }
    if let Some(token) = &cli.token {
        config.netbox.token = Some(token.clone());
    }
    Ok(config)
}
