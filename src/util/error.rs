// QueryBench - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. All errors preserve the causal chain
// for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all QueryBench operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum QueryBenchError {
    /// The query log could not be read.
    Input(InputError),

    /// The database connection could not be established.
    Connection(ConnectionError),

    /// The rendered report could not be written.
    Report(ReportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for QueryBenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "Input error: {e}"),
            Self::Connection(e) => write!(f, "Connection error: {e}"),
            Self::Report(e) => write!(f, "Report error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for QueryBenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::Connection(e) => Some(e),
            Self::Report(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors related to reading the query log.
#[derive(Debug)]
pub enum InputError {
    /// The log file does not exist.
    NotFound { path: PathBuf },

    /// I/O error while opening or reading the log file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "Query log '{}' does not exist", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Failed to read query log '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<InputError> for QueryBenchError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Connection errors
// ---------------------------------------------------------------------------

/// Errors related to opening or closing the database session.
#[derive(Debug)]
pub enum ConnectionError {
    /// The server URL (server + database) is malformed.
    InvalidUrl {
        url: String,
        source: mysql_async::UrlError,
    },

    /// The runtime driving the driver could not be created.
    Runtime { source: io::Error },

    /// The server rejected or never answered the connection attempt.
    Connect {
        url: String,
        source: mysql_async::Error,
    },

    /// Closing the session failed.
    Disconnect { source: mysql_async::Error },
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url, source } => {
                write!(f, "Invalid server URL '{url}': {source}")
            }
            Self::Runtime { source } => {
                write!(f, "Failed to start database runtime: {source}")
            }
            Self::Connect { url, source } => {
                write!(f, "Failed to connect to '{url}': {source}")
            }
            Self::Disconnect { source } => {
                write!(f, "Failed to close database connection: {source}")
            }
        }
    }
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidUrl { source, .. } => Some(source),
            Self::Runtime { source } => Some(source),
            Self::Connect { source, .. } => Some(source),
            Self::Disconnect { source } => Some(source),
        }
    }
}

impl From<ConnectionError> for QueryBenchError {
    fn from(e: ConnectionError) -> Self {
        Self::Connection(e)
    }
}

// ---------------------------------------------------------------------------
// Execution errors
// ---------------------------------------------------------------------------

/// Errors raised by a statement executor for one statement.
/// Never fatal: the replay loop logs and counts them.
#[derive(Debug)]
pub enum ExecutionError {
    /// The database reported an error for the statement.
    Statement {
        sql: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The executor has no open session.
    NotConnected,
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Statement { sql, source } => write!(
                f,
                "Statement '{}' failed: {source}",
                crate::util::sql_preview(sql)
            ),
            Self::NotConnected => write!(f, "No open database connection"),
        }
    }
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Statement { source, .. } => Some(source.as_ref()),
            Self::NotConnected => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Monitor errors
// ---------------------------------------------------------------------------

/// Errors related to the measurement monitor lifecycle.
/// Logged by the session; whatever was measured is still reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// `start` was called on a monitor that is already collecting.
    AlreadyRunning,

    /// `stop` was called on a monitor that was never started.
    NotRunning,

    /// `stop` was called while measurement points were still open.
    OpenPoints { count: usize },
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "Measurement monitor is already running"),
            Self::NotRunning => write!(f, "Measurement monitor is not running"),
            Self::OpenPoints { count } => {
                write!(f, "Cannot stop monitor with {count} open measurement point(s)")
            }
        }
    }
}

impl std::error::Error for MonitorError {}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Errors related to writing the rendered report.
#[derive(Debug)]
pub enum ReportError {
    /// I/O error writing the report file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Report I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ReportError> for QueryBenchError {
    fn from(e: ReportError) -> Self {
        Self::Report(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is not acceptable.
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// A value could not be compiled into a matching pattern.
    InvalidPattern {
        field: &'static str,
        value: String,
        source: regex::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::InvalidValue {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is not valid. Expected: {expected}"
            ),
            Self::InvalidPattern {
                field,
                value,
                source,
            } => write!(f, "'{field}' = '{value}' cannot be matched: {source}"),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::InvalidPattern { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<ConfigError> for QueryBenchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for QueryBench results.
pub type Result<T> = std::result::Result<T, QueryBenchError>;
