use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;
use thiserror::Error;

/// Timestamp, level, thread and target
const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {T} {t}: {m}{n}";

/// Sets up log4rs with a file appender and, optionally, an stdout appender
///
/// # Arguments
///
/// * 'log_path' - path to the log file, missing directories are created
/// * 'log_level' - root log level
/// * 'log_to_stdout' - whether to also log to stdout
pub fn setup_logger(log_path: &str, log_level: LevelFilter, log_to_stdout: bool) -> Result<Handle, LoggerError> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(log_path)
        .map_err(|e| LoggerError(format!("error creating file appender for {}: {}", log_path, e)))?;

    let mut builder = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)));
    let mut root = Root::builder().appender("file");

    if log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    let config = builder
        .logger(Logger::builder().build("hyper", LevelFilter::Warn))
        .logger(Logger::builder().build("hyper_util", LevelFilter::Warn))
        .logger(Logger::builder().build("reqwest", LevelFilter::Warn))
        .logger(Logger::builder().build("rustls", LevelFilter::Error))
        .build(root.build(log_level))
        .map_err(|e| LoggerError(format!("error building log config: {}", e)))?;

    let handle = log4rs::init_config(config)
        .map_err(|e| LoggerError(format!("error initializing logger: {}", e)))?;

    Ok(handle)
}

/// Error depicting errors that occur while setting up logging
///
#[derive(Debug, Error)]
#[error("LoggerError: {0}")]
pub struct LoggerError(pub String);
