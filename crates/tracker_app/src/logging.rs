//! Logging initialization for tracker_app.
//!
//! File output goes to `./tracker.log` in the current working directory.

use std::fs::File;
use std::path::PathBuf;

use clap::ValueEnum;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDestination {
    File,
    /// Stderr, so that stdout carries only finalized records.
    Terminal,
    Both,
}

pub fn initialize(destination: LogDestination) {
    let level = LevelFilter::Info;
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        if let Some(file_logger) = create_file_logger(level, config) {
            loggers.push(file_logger);
        }
    }
    if loggers.is_empty() {
        return;
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from("./tracker.log");
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
