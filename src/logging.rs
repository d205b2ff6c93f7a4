//! Structured logging for the USL planner
//!
//! Every run gets a session id shared by all of its loggers. Entries carry
//! structured fields (fitted coefficients, sample counts, error categories)
//! and render either as one console line or as a JSON object. Output goes to
//! stderr so reports on stdout stay parseable.

use crate::error::{AppError, Result};
use crate::models::{Config, Model};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Per-stage detail of a fit
    Debug,
    /// Progress of a run
    Info,
    /// Suspicious input or a failed fit
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn painted(&self) -> String {
        let label = format!("{:>5}", self.as_str());
        match self {
            LogLevel::Debug => label.cyan().to_string(),
            LogLevel::Info => label.green().to_string(),
            LogLevel::Warn => label.yellow().to_string(),
            LogLevel::Error => label.red().bold().to_string(),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// One structured log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub logger: String,
    pub message: String,
    /// Ordered by key so console lines are stable
    pub fields: BTreeMap<String, serde_json::Value>,
    /// `file:line` of the call site, set by the logging macros
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// `timestamp LEVEL [logger] message {fields}`
    Console,
    /// One JSON object per line
    Json,
}

#[derive(Clone)]
enum Sink {
    Stderr,
    Memory(Arc<Mutex<Vec<String>>>),
}

#[derive(Clone)]
pub struct Logger {
    name: String,
    min_level: LogLevel,
    format: LogFormat,
    use_color: bool,
    include_location: bool,
    /// Fields attached to every entry, such as the session id
    context: Arc<RwLock<BTreeMap<String, serde_json::Value>>>,
    sink: Sink,
}

impl Logger {
    /// Console logger at info level writing to stderr
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            min_level: LogLevel::Info,
            format: LogFormat::Console,
            use_color: false,
            include_location: false,
            context: Arc::new(RwLock::new(BTreeMap::new())),
            sink: Sink::Stderr,
        }
    }

    /// Logger whose verbosity follows `--verbose` and `--debug`.
    ///
    /// Debug runs log every fitting stage as JSON with call sites; verbose
    /// runs log progress; otherwise only warnings are shown.
    pub fn with_config(name: &str, config: &Config) -> Self {
        let (min_level, format) = if config.debug {
            (LogLevel::Debug, LogFormat::Json)
        } else if config.verbose {
            (LogLevel::Info, LogFormat::Console)
        } else {
            (LogLevel::Warn, LogFormat::Console)
        };

        Self {
            min_level,
            format,
            use_color: config.enable_color,
            include_location: config.debug,
            ..Self::new(name)
        }
    }

    /// Logger that keeps rendered lines in memory instead of writing them
    pub fn capturing(name: &str, min_level: LogLevel) -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let logger = Self {
            min_level,
            sink: Sink::Memory(Arc::clone(&lines)),
            ..Self::new(name)
        };
        (logger, lines)
    }

    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    /// Attach `key` to every subsequent entry of this logger and its clones
    pub fn add_context_field<T: Serialize>(&self, key: &str, value: T) {
        if let (Ok(value), Ok(mut context)) = (serde_json::to_value(value), self.context.write()) {
            context.insert(key.to_string(), value);
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder {
            logger: self,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                logger: self.name.clone(),
                message: message.to_string(),
                fields: BTreeMap::new(),
                location: None,
            },
        }
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn emit(&self, mut entry: LogEntry) {
        if !self.enabled(entry.level) {
            return;
        }

        if let Ok(context) = self.context.read() {
            for (key, value) in context.iter() {
                entry.fields.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }

        let line = self.render(&entry);
        match &self.sink {
            Sink::Stderr => {
                let _ = writeln!(io::stderr(), "{}", line);
            }
            Sink::Memory(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line);
                }
            }
        }
    }

    /// Render an entry in this logger's format
    pub fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.render_console(entry),
            LogFormat::Json => serde_json::to_string(entry)
                .unwrap_or_else(|_| format!("{{\"message\":{:?}}}", entry.message)),
        }
    }

    fn render_console(&self, entry: &LogEntry) -> String {
        let level = if self.use_color {
            entry.level.painted()
        } else {
            format!("{:>5}", entry.level.as_str())
        };

        let mut line = format!(
            "{} {} [{}] {}",
            entry.timestamp.format("%H:%M:%S%.3f"),
            level,
            entry.logger,
            entry.message
        );

        if !entry.fields.is_empty() {
            let fields: Vec<String> = entry
                .fields
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            line.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                line.push_str(&format!(" @ {}", location));
            }
        }

        line
    }
}

/// Collects fields for one entry; nothing is written until [`log`](Self::log)
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), value);
        }
        self
    }

    pub fn location(mut self, file: &str, line: u32) -> Self {
        self.entry.location = Some(format!("{}:{}", file, line));
        self
    }

    /// Attach σ, κ and λ of a fitted model
    pub fn model(self, model: &Model) -> Self {
        self.field("sigma", model.sigma)
            .field("kappa", model.kappa)
            .field("lambda", model.lambda)
    }

    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("exit_code", error.exit_code())
    }

    pub fn log(self) {
        self.logger.emit(self.entry);
    }
}

/// Hands out loggers that share one session id
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name, &self.config);
        logger.add_context_field("session_id", &self.session_id);
        logger
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*)).location(file!(), line!()).log()
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*)).location(file!(), line!()).log()
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*)).location(file!(), line!()).log()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("trace".parse::<LogLevel>().is_err());
        assert!(LogLevel::Debug < LogLevel::Warn);
    }

    #[test]
    fn test_with_config_levels() {
        let mut config = Config {
            enable_color: false,
            ..Config::default()
        };
        let quiet = Logger::with_config("t", &config);
        assert!(quiet.enabled(LogLevel::Warn));
        assert!(!quiet.enabled(LogLevel::Info));

        config.verbose = true;
        let verbose = Logger::with_config("t", &config);
        assert!(verbose.enabled(LogLevel::Info));
        assert!(!verbose.enabled(LogLevel::Debug));

        config.debug = true;
        let debug = Logger::with_config("t", &config);
        assert!(debug.enabled(LogLevel::Debug));
        assert_eq!(debug.format, LogFormat::Json);
    }

    #[test]
    fn test_console_line() {
        let (logger, lines) = Logger::capturing("fit", LogLevel::Info);
        logger.debug("hidden").log();
        logger.info("shown").field("samples", 7).field("lambda", 65.0).log();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" INFO [fit] shown {lambda=65.0, samples=7}"));
    }

    #[test]
    fn test_json_line_with_context() {
        let (mut logger, lines) = Logger::capturing("fit", LogLevel::Debug);
        logger.set_format(LogFormat::Json);
        logger.add_context_field("session_id", "abc");
        logger.debug("fitted").model(&Model::new(0.1, 0.01, 5.0)).log();

        let value: serde_json::Value = serde_json::from_str(&lines.lock().unwrap()[0]).unwrap();
        assert_eq!(value["message"], "fitted");
        assert_eq!(value["level"], "Debug");
        assert_eq!(value["fields"]["session_id"], "abc");
        assert_eq!(value["fields"]["lambda"], 5.0);
        assert!(value.get("location").is_none());
    }

    #[test]
    fn test_error_info_fields() {
        let (logger, lines) = Logger::capturing("fit", LogLevel::Warn);
        logger.warn("failed").error_info(&AppError::fitting_failure("singular")).log();
        assert!(lines.lock().unwrap()[0].contains("error_category=\"FIT\", exit_code=3"));
    }

    #[test]
    fn test_factory_shares_session() {
        let factory = LoggerFactory::new(Config::default());
        let first = factory.create_logger("app");
        let second = factory.create_logger("fit");
        assert_eq!(first.context.read().unwrap()["session_id"], factory.session_id());
        assert_eq!(second.context.read().unwrap()["session_id"], factory.session_id());
    }

    #[test]
    fn test_macros_attach_location() {
        let (mut logger, lines) = Logger::capturing("macro", LogLevel::Debug);
        logger.include_location = true;
        crate::log_debug!(logger, "stage {}", 2);
        let lines = lines.lock().unwrap();
        assert!(lines[0].contains("stage 2"));
        assert!(lines[0].contains("logging.rs:"));
    }
}
