use chrono::Local;
use simplelog::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// "trace" | "debug" | "info" | "warn" | "error" | "off", None means info
pub fn parse_loglevel(loglevel: Option<&str>) -> Result<LevelFilter, String> {
    match loglevel {
        None => Ok(LevelFilter::Info),
        Some(level) => match level.to_lowercase().as_str() {
            "trace" => Ok(LevelFilter::Trace),
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            "off" => Ok(LevelFilter::Off),
            other => Err(format!(
                "loglevel must be trace, debug, info, warn, error or off, got '{}'",
                other
            )),
        },
    }
}

/// log_<date>_<time>.txt inside `dir`
pub fn log_file_name(dir: &Path) -> PathBuf {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    dir.join(format!("log_{}.txt", date_and_time))
}

/// Installs the terminal logger and, when `log_dir` is given, a file logger next to it.
///
/// The global logger can be set only once per process: later calls leave the first
/// logger in place and return `Ok(false)`.
pub fn init_logger(loglevel: Option<&str>, log_dir: Option<&Path>) -> Result<bool, String> {
    let log_option = parse_loglevel(loglevel)?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(dir) = log_dir {
        let name = log_file_name(dir);
        let file = File::create(&name)
            .map_err(|e| format!("cannot create log file {}: {}", name.display(), e))?;
        loggers.push(WriteLogger::new(log_option, Config::default(), file));
    }
    let logger_instance = CombinedLogger::init(loggers);
    match logger_instance {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}
