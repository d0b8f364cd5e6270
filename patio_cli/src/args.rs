//! Command-line argument definitions for the Patio Planner CLI.

use clap::{Parser, Subcommand};

/// Command-line arguments for the patio dimensioning tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to an engine configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Normalize a measured extent (millimeters) and print it as JSON
    Normalize {
        /// Width in mm (x)
        #[arg(allow_hyphen_values = true)]
        width: f64,
        /// Height in mm (y)
        #[arg(allow_hyphen_values = true)]
        height: f64,
        /// Depth in mm (z)
        #[arg(allow_hyphen_values = true)]
        depth: f64,
        /// Display unit system (metric, imperial); overrides the config file
        #[arg(short, long)]
        units: Option<String>,
        /// Decimal places for actual dimensions; overrides the config file
        #[arg(short, long)]
        precision: Option<u8>,
    },
    /// Print the active catalogs
    Catalog,
    /// Build a sample deck through the controller and print the takeoff
    Demo,
}
