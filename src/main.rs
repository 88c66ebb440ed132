use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use itn::core::config::{self, CliOverrides, ItnConfig};
use itn::core::state::Outcome;
use itn::inventory::build_collaborators;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "itn", about = "Pick Spot instances and interrupt them")]
struct Args {
    /// Config file (default: ~/.itn/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Inventory service URL
    #[arg(long)]
    base_url: Option<String>,

    /// Seconds to wait for the interruption to finish
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Do not force the interruption
    #[arg(long)]
    no_force: bool,

    /// Attempts per inventory call, including the first
    #[arg(long, value_name = "N")]
    retries: Option<u32>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let loaded = config::load_config(args.config.as_deref());
    let overrides = CliOverrides {
        base_url: args.base_url.clone(),
        timeout_secs: args.timeout,
        no_force: args.no_force,
        retries: args.retries,
    };
    let resolved = config::resolve(loaded.as_ref().unwrap_or(&ItnConfig::default()), &overrides);

    // Initialize file logger - the terminal belongs to the TUI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    if let Err(e) = loaded {
        log::error!("{}", e);
        eprintln!("itn: {e}");
        return ExitCode::FAILURE;
    }

    log::info!(
        "itn starting up against {} (timeout={:?}, force={})",
        resolved.base_url,
        resolved.interrupt.timeout,
        resolved.interrupt.force
    );

    let collaborators = build_collaborators(&resolved);
    match itn::tui::run(collaborators, resolved.interrupt) {
        Ok(Outcome::Quit) => {
            log::info!("Session ended without interrupting");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Interrupted { ids }) => {
            let mut ids: Vec<_> = ids.into_iter().collect();
            ids.sort();
            println!("Interrupted {} Spot instance(s): {}", ids.len(), ids.join(", "));
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("itn: {e}");
            ExitCode::FAILURE
        }
    }
}
