use clap::Parser;
use std::io;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod config;
mod csv_handler;
mod engine;
mod errors;
mod models;
mod output;
mod sacct;

use config::{Cli, Config};
use errors::PreparerError;
use sacct::{AccountingSource, Sacct};

fn main() {
    // 1. Resolve settings; bad dates and unknown flags stop here with a usage error.
    let config = Config::from_cli(Cli::parse());

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();

    // Interrupting the sacct query is a clean exit; anywhere later it is not.
    let querying = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&querying);
    if let Err(e) = ctrlc::set_handler(move || {
        process::exit(interrupt_exit_code(handler_flag.load(Ordering::SeqCst)))
    }) {
        log::debug!("Could not install interrupt handler: {}", e);
    }

    // 2. Query, aggregate and emit the day.
    if let Err(e) = run(&config, &Sacct::new(&config.sacct), &querying) {
        eprintln!("{}", e);
        process::exit(e.exit_code());
    }
}

/// Exit status for SIGINT: 0 while waiting on sacct (nothing written yet),
/// 130 once output may be partially written.
fn interrupt_exit_code(querying: bool) -> i32 {
    if querying {
        0
    } else {
        130
    }
}

fn run<S: AccountingSource>(
    config: &Config,
    source: &S,
    querying: &AtomicBool,
) -> Result<(), PreparerError> {
    let log_file = config
        .save_dir
        .as_deref()
        .map(|dir| output::log_file_path(dir, config.day, config.compress));
    if let Some(path) = &log_file {
        log::debug!("Started processing file: {}", path.display());
    }

    querying.store(true, Ordering::SeqCst);
    let fetched = source.fetch_day(config.day);
    querying.store(false, Ordering::SeqCst);
    let lines = fetched?;

    let mut engine = engine::JobAggregator::new();
    let summary = csv_handler::process_lines(&lines, &mut engine);
    log::debug!(
        "{} jobs accepted, {} step records merged, {} records discarded, {} skipped",
        summary.accepted,
        summary.merged,
        summary.discarded,
        summary.skipped
    );

    log::debug!("{} jobs to report for {}", engine.len(), config.day);

    let mut payload = csv_handler::render_jobs(&engine)?;
    if config.compress {
        payload = output::compress(&payload)?;
    }

    match &log_file {
        Some(path) => {
            output::save(path, &payload)?;
            log::debug!("Finished processing file: {}", path.display());
        }
        None => output::print(io::stdout().lock(), &payload, config.compress),
    }
    Ok(())
}
