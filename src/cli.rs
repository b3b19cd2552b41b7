use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "netbox-agent")]
#[command(about = "Register this server's hardware in NetBox")]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// NetBox base URL (overrides the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// NetBox API token (overrides the config file)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect the hardware inventory from lshw and nvme-cli
    Inventory {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Register this host in NetBox (and its chassis for blades)
    Register,
    /// Update an already registered host: chassis or slot moves, hostname
    Update,
    /// Show the identity facts and what NetBox knows about them
    Debug {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
}
