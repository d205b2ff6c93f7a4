//! Error handling for the USL planner

use thiserror::Error;

/// Custom error types for the USL planner
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// Malformed measurement representation (wrong arity)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Too few measurements to attempt a fit
    #[error("Insufficient data: needs at least {required} measurements, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// The design matrix could not be factored
    #[error("Fitting failure: {0}")]
    FittingFailure(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (reading measurement files, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (measurement rows, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    pub fn fitting_failure<S: Into<String>>(message: S) -> Self {
        Self::FittingFailure(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Short tag used in console output and log fields
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "ARGUMENT",
            Self::InsufficientData { .. } => "DATA",
            Self::FittingFailure(_) => "FIT",
            Self::Config(_) => "CONFIG",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// What the user can do about it
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "Each measurement row must hold exactly two numbers.",
            Self::InsufficientData { .. } => {
                "Collect more samples across a wider range of concurrency levels."
            }
            Self::FittingFailure(_) => {
                "Measure at least three distinct concurrency levels with positive throughput."
            }
            Self::Config(_) => "Check your .env file, USL_* variables and command line flags.",
            Self::Io(_) => "Check the input path and file permissions.",
            Self::Parse(_) => "Run `usl --help-topic input` for the accepted file format.",
            Self::Internal(_) => "This is likely a bug. Please report it with the input that triggered it.",
        }
    }

    /// The error followed by a suggestion, shown with `--verbose`
    pub fn user_friendly_message(&self) -> String {
        format!("{}\n\nSuggestion: {}", self, self.suggestion())
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Parse(_) => 1,
            Self::InvalidArgument(_) | Self::InsufficientData { .. } => 2,
            Self::FittingFailure(_) => 3,
            Self::Io(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// `[CATEGORY] message`, colored by severity when `use_color` is set
    pub fn format_for_console(&self, use_color: bool) -> String {
        use colored::{Color, Colorize};

        let category = self.category();
        let message = self.to_string();
        if !use_color {
            return format!("[{}] {}", category, message);
        }

        let color = match self {
            Self::Config(_) | Self::Parse(_) | Self::InvalidArgument(_) => Color::Red,
            Self::InsufficientData { .. } | Self::FittingFailure(_) => Color::Yellow,
            Self::Io(_) => Color::Cyan,
            Self::Internal(_) => Color::BrightRed,
        };
        format!("[{}] {}", category.color(color).bold(), message.color(color))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("Float parse error: {}", error))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error, keeping its category
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let context = f();
            match e.into() {
                AppError::Io(msg) => AppError::Io(format!("{}: {}", context, msg)),
                AppError::Parse(msg) => AppError::Parse(format!("{}: {}", context, msg)),
                AppError::Config(msg) => AppError::Config(format!("{}: {}", context, msg)),
                other => AppError::internal(format!("{}: {}", context, other)),
            }
        })
    }
}

/// Error reporter for user feedback on stderr
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render an error the way `report_error` prints it
    pub fn render(&self, error: &AppError) -> String {
        let mut out = error.format_for_console(self.use_color);
        if self.verbose {
            out.push_str("\n\n");
            out.push_str(&error.user_friendly_message());
        }
        out
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}
