use log::{error, info, LevelFilter};
use std::path::Path;

// For file-based logging with rotation
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::{Error, Result};

/// Initialize the logger with a rotating file in `log_dir`, plus stderr when `console` is set
///
/// Leave `console` off while a progress bar is drawn on the terminal.
/// `IMPORT_LOG` overrides `level` when it parses as a level filter.
pub fn init_logger(log_dir: &Path, level: LevelFilter, console: bool) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let log_file_path = log_dir.join("import.log");
    let archived_logs_pattern = format!("{}/import.{{}}.log", log_dir.display());

    // Rotate at 10MB, keep 5 archived log files
    let file_trigger = SizeTrigger::new(10 * 1024 * 1024);
    let file_roller = FixedWindowRoller::builder()
        .build(&archived_logs_pattern, 5)
        .map_err(|e| Error::Configuration(format!("Failed to create log roller: {}", e)))?;
    let compound_policy = CompoundPolicy::new(Box::new(file_trigger), Box::new(file_roller));

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}",
        )))
        .build(&log_file_path, Box::new(compound_policy))
        .map_err(|e| Error::Configuration(format!("Failed to create log appender: {}", e)))?;

    let level = std::env::var("IMPORT_LOG")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(level);

    let mut builder =
        Config::builder().appender(Appender::builder().build("file", Box::new(rolling_file)));
    let mut root = Root::builder().appender("file");

    if console {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new("[{l}] {m}{n}")))
            .build();
        builder = builder.appender(Appender::builder().build("console", Box::new(stderr)));
        root = root.appender("console");
    }

    let config = builder
        .build(root.build(level))
        .map_err(|e| Error::Configuration(format!("Failed to build log config: {}", e)))?;

    log4rs::init_config(config)
        .map_err(|e| Error::Configuration(format!("Failed to initialize log4rs: {}", e)))?;

    info!("Logging to file: {}", log_file_path.display());
    Ok(())
}

/// Log file operation that failed
pub fn log_file_error(path: &Path, operation: &str, error: &dyn std::error::Error) {
    error!(
        "File operation failed - Operation: {}, Path: {}, Error: {}",
        operation,
        path.display(),
        error
    );
}

/// Log file system modification
pub fn log_fs_modification(operation: &str, path: &Path, details: Option<&str>) {
    let details_str = details.unwrap_or("");
    info!(
        "FS CHANGE - Operation: {}, Path: {}{}",
        operation,
        path.display(),
        if details_str.is_empty() {
            "".to_string()
        } else {
            format!(", Details: {}", details_str)
        }
    );
}
