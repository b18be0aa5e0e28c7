//! CLI module for Guzei
//!
//! Provides subcommands:
//! - `serve`: run the HTTP API
//! - `migrate`: apply (or revert) the PostgreSQL schema and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Guzei - user registration and authentication service
#[derive(Parser)]
#[command(name = "guzei")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply pending database migrations
    Migrate(migrate::MigrateArgs),
}
