//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fixture-based test suite runner
#[derive(Parser, Debug)]
#[command(name = "suitecheck")]
#[command(version = "0.1.0")]
#[command(about = "Run test suites with fixture hooks and panic reports")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics on stderr
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the bundled suites
    Run(RunArgs),

    /// List suites and their test cases
    List(ListArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Regular expression selecting test cases by name or Suite.Method
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Summary format (text, json, json-pretty)
    #[arg(long)]
    pub format: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print PASS and MISS lines
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored summary
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Regular expression selecting test cases
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        #[arg(short, long, default_value = "suitecheck.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show effective settings
    Show {
        /// Show environment variables instead
        #[arg(long)]
        env: bool,

        /// Output format (yaml, json)
        #[arg(long, default_value = "yaml")]
        format: String,
    },

    /// Validate a configuration file
    Validate {
        file: Option<PathBuf>,
    },

    /// Describe the environment variables
    Env,
}
