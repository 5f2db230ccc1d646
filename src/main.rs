//! Game Load Tester - Main CLI Application
//!
//! Opens the configured number of WebSocket clients against a game server,
//! drives synthetic traffic for the configured duration and prints one
//! report.

use clap::Parser;
use game_load_tester::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config, EnvManager},
    error::{AppError, Result},
    executor::{LoadExecutor, LoadTestExecutor},
    logging::LoggerFactory,
    output::OutputFormatterFactory,
    VERSION, PKG_NAME,
};
use std::{process, error::Error};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue together with the command line you ran.");
        process::exit(1);
    }));

    let cli = Cli::parse();

    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(std::env::var_os("NO_COLOR").is_none()));

        if let Some(source) = e.source() {
            eprintln!("Caused by: {}", source);
        }

        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::config)?;

    if cli.env_help {
        println!("{}", EnvManager::display_env_help());
        return Ok(());
    }

    if let Some(path) = &cli.write_env_example {
        EnvManager::save_example_env_file(path)?;
        println!("Wrote example configuration to {}", path.display());
        return Ok(());
    }

    if cli.debug {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!("Debug mode enabled");
        eprintln!(
            "System: {} logical cores, {} physical cores",
            num_cpus::get(),
            num_cpus::get_physical()
        );
        eprintln!();
        eprint!("{}", cli.get_config_summary());
        eprintln!();
    }

    let config = load_config(cli)?;
    let warnings = validate_config(&config)?;

    if config.debug {
        eprintln!("Configuration loaded successfully:");
        for line in display_config_summary(&config).lines() {
            eprintln!("  {}", line);
        }
        eprintln!();
    }

    let formatter = OutputFormatterFactory::for_config(&config);
    for warning in &warnings {
        eprintln!("{}", warning.format(config.enable_color && !config.json_output));
    }

    let logger = Arc::new(LoggerFactory::new(config.clone()).create_logger(PKG_NAME).await);
    let executor = LoadTestExecutor::new(config.clone(), logger)?;

    if (config.verbose || config.debug) && !config.json_output {
        eprintln!(
            "Starting load test: {} clients, {} msg/s per kind, {}s against {}",
            config.clients, config.rate, config.duration_secs, config.endpoint
        );
        eprintln!();
    }

    let report = executor.execute().await?;

    println!("{}", formatter.format_report(&report)?);

    if report.errors > 0 && !config.json_output {
        eprintln!(
            "{}",
            formatter.format_warning(&format!("{} errors were recorded during the run", report.errors))?
        );
    }

    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - The endpoint must start with ws://");
            eprintln!("  - Clients, duration, rate and close timeout must be positive");
            eprintln!("  - Run with --help to list every option");
        }
        AppError::DnsResolution(_) => {
            eprintln!();
            eprintln!("DNS resolution help:");
            eprintln!("  - Check the endpoint host name for typos");
            eprintln!("  - Try the server's IP address instead of its name");
            eprintln!("  - Test resolution manually with 'nslookup' or 'dig'");
        }
        AppError::Transport(_) => {
            eprintln!();
            eprintln!("Connection troubleshooting:");
            eprintln!("  - Make sure the game server is running and listening");
            eprintln!("  - Verify the endpoint port and path");
            eprintln!("  - Check firewall settings");
        }
        _ => {}
    }
}
