//! Command-line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dexflow")]
#[command(about = "DexFlow - asynchronous order execution over simulated DEX venues")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the execution service
    Start {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config/dexflow.yaml")]
        config: PathBuf,

        /// Override the HTTP port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate configuration without starting the service
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config/dexflow.yaml")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "dexflow.yaml")]
        output: PathBuf,
    },

    /// Apply database migrations and exit
    Migrate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config/dexflow.yaml")]
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
