//! Command-line interface.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// claystore - polymer clay storefront server
#[derive(Parser)]
#[command(name = "claystore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    Serve,

    /// Create an admin account
    CreateAdmin {
        /// Login name
        username: String,
        /// Initial password
        #[arg(long)]
        password: String,
    },

    /// Reset an admin's password
    SetPassword {
        /// Login name
        username: String,
        /// New password
        #[arg(long)]
        password: String,
    },

    /// Print the current site settings
    Settings,

    /// Write a default config.toml
    Init {
        /// Destination file
        #[arg(default_value = "config.toml")]
        path: PathBuf,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub use commands::*;
