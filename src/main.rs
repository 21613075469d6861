//! suitecheck - fixture-based test suite runner
//!
//! Runs the bundled demonstration suites and prints their report.
//!
//! ## Usage
//!
//! ```bash
//! # Run every suite
//! suitecheck run
//!
//! # Run matching tests only, with PASS lines
//! suitecheck run --filter 'Stack\.' -v
//!
//! # JSON summary, report written to a file
//! suitecheck run --format json --output report.txt
//!
//! # List suites and tests
//! suitecheck list
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

use suitecheck::config::{print_env_help, EnvConfig, Settings};
use suitecheck::output::{OutputFormat, ResultFormatter};
use suitecheck::utils::{init_logger, LogLevel};
use suitecheck::{demos, RunConf};

mod cli;

use cli::Args;

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let env = EnvConfig::load();
    let config_path = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(Into::into));
    let mut settings = Settings::load_or_default(config_path.as_deref())
        .context("Failed to load settings")?;
    settings.apply_env(&env);
    if let Some(level) = &args.log_level {
        settings.log_level = Some(level.clone());
    }

    init_logger(settings.log_level().unwrap_or(LogLevel::Warn));

    match args.command {
        cli::Command::Run(run_args) => run_suites(run_args, settings),
        cli::Command::List(list_args) => {
            list_suites(list_args, &settings)?;
            Ok(ExitCode::SUCCESS)
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, &settings)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_suites(args: cli::RunArgs, mut settings: Settings) -> Result<ExitCode> {
    if args.filter.is_some() {
        settings.filter = args.filter;
    }
    if args.format.is_some() {
        settings.format = args.format;
    }
    if args.output.is_some() {
        settings.output = args.output;
    }
    settings.verbose |= args.verbose;
    settings.validate().context("Invalid run settings")?;

    let format = settings.output_format()?;
    let mut conf = RunConf::new().verbose(settings.verbose);
    if let Some(filter) = settings.compile_filter()? {
        conf = conf.with_filter(filter);
    }

    let mut suites = demos::suites();
    info!("Running {} suites", suites.len());

    let mut report_file = match &settings.output {
        Some(path) => Some(
            File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?,
        ),
        None => None,
    };
    if let Some(file) = report_file.as_mut() {
        conf = conf.with_output(file);
    }

    let result = suites.run_all(conf);

    let mut formatter = ResultFormatter::new(format);
    if args.no_color || report_file.is_some() {
        formatter = formatter.no_color();
    }
    if format == OutputFormat::Text {
        print!("{}", formatter.format_outcomes(&result));
    }
    println!("{}", formatter.format_result(&result)?);
    std::io::stdout().flush()?;

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list_suites(args: cli::ListArgs, settings: &Settings) -> Result<()> {
    let mut settings = settings.clone();
    if args.filter.is_some() {
        settings.filter = args.filter;
    }
    let filter = settings.compile_filter()?;

    let suites = demos::suites();
    println!("\nSuites ({} total)\n", suites.len());
    println!("──────────────────────────────────────────────────────────────────────");

    for (suite, tests) in suites.listing(filter.as_ref()) {
        println!("\n{suite} ({} tests)", tests.len());
        for test in tests {
            println!("  - {suite}.{test}");
        }
    }
    println!();

    Ok(())
}

fn manage_config(args: cli::ConfigArgs, settings: &Settings) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    output.display()
                );
            }

            Settings::example().save(&output)?;
            println!("✓ Configuration file created: {}", output.display());
        }

        cli::ConfigAction::Show { env, format } => {
            if env {
                EnvConfig::load().print_summary();
            } else {
                let output = if format == "json" {
                    serde_json::to_string_pretty(settings)?
                } else {
                    serde_yaml::to_string(settings)?
                };
                println!("{output}");
            }
        }

        cli::ConfigAction::Validate { file } => {
            let path = file
                .or_else(Settings::find)
                .unwrap_or_else(|| Path::new("./suitecheck.yaml").to_path_buf());

            match Settings::load(&path) {
                Ok(_) => println!("✓ Configuration file is valid: {}", path.display()),
                Err(e) => {
                    println!("✗ Configuration file is invalid: {}", path.display());
                    println!("  Error: {e}");
                    return Err(e.into());
                }
            }
        }

        cli::ConfigAction::Env => print_env_help(),
    }

    Ok(())
}
