// QueryBench - platform/config.rs
//
// Config directory resolution and config.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::{NumberStyle, ReportFormat};
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for QueryBench configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/querybench/ or %APPDATA%\QueryBench\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[connection]` section.
    pub connection: ConnectionSection,
    /// `[extraction]` section.
    pub extraction: ExtractionSection,
    /// `[report]` section.
    pub report: ReportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[connection]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ConnectionSection {
    /// Server URL without database, e.g. `mysql://localhost:3306/`.
    pub server: Option<String>,
    /// Database name appended to the server URL.
    pub database: Option<String>,
    /// User name. Passwords are only accepted on the command line.
    pub user: Option<String>,
}

/// `[extraction]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExtractionSection {
    /// Only replay this connection's statements.
    pub connection_id: Option<String>,
    /// Statement prefixes to skip (case-insensitive).
    pub ignore_prefixes: Option<Vec<String>>,
}

/// `[report]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// "jetm" or "csv".
    pub format: Option<String>,
    /// Report file path (empty = do not write a file).
    pub output: Option<String>,
    /// Single character between integer and fraction digits.
    pub decimal_separator: Option<String>,
    /// Single character between digit groups (empty = no grouping).
    pub grouping_separator: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Connection --
    pub server: String,
    pub database: String,
    pub user: Option<String>,

    // -- Extraction --
    pub connection_id: Option<String>,
    pub ignore_prefixes: Vec<String>,

    // -- Report --
    pub format: ReportFormat,
    /// `None` disables writing the report file.
    pub output: Option<PathBuf>,
    pub number_style: NumberStyle,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: constants::DEFAULT_SERVER.to_string(),
            database: constants::DEFAULT_DATABASE.to_string(),
            user: None,
            connection_id: None,
            ignore_prefixes: Vec::new(),
            format: ReportFormat::Plain,
            output: Some(PathBuf::from(constants::DEFAULT_OUTPUT_FILE)),
            number_style: NumberStyle::default(),
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning;
/// the run still proceeds.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    let mut warnings = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config file found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    match parse_config(&content) {
        Ok((config, value_warnings)) => {
            warnings.extend(value_warnings);
            (config, warnings)
        }
        Err(e) => {
            warnings.push(ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            });
            (AppConfig::default(), warnings)
        }
    }
}

/// Parse and validate config.toml content.
///
/// Syntax errors fail the whole parse; invalid values are reported per field
/// and leave that field at its default.
pub fn parse_config(content: &str) -> Result<(AppConfig, Vec<ConfigError>), toml::de::Error> {
    let raw: RawConfig = toml::from_str(content)?;
    let mut warnings = Vec::new();
    let mut config = AppConfig::default();

    // -- Connection --
    if let Some(server) = raw.connection.server.filter(|s| !s.trim().is_empty()) {
        config.server = server;
    }
    if let Some(database) = raw.connection.database {
        config.database = database;
    }
    config.user = raw.connection.user.filter(|u| !u.is_empty());

    // -- Extraction --
    config.connection_id = raw
        .extraction
        .connection_id
        .filter(|id| !id.trim().is_empty());
    if let Some(prefixes) = raw.extraction.ignore_prefixes {
        config.ignore_prefixes = prefixes;
    }

    // -- Report: format --
    if let Some(ref format) = raw.report.format {
        match format.to_lowercase().as_str() {
            "jetm" | "plain" => config.format = ReportFormat::Plain,
            "csv" => config.format = ReportFormat::Csv,
            _ => warnings.push(ConfigError::InvalidValue {
                field: "[report] format".to_string(),
                value: format.clone(),
                expected: "\"jetm\" or \"csv\"".to_string(),
            }),
        }
    }

    // -- Report: output --
    if let Some(output) = raw.report.output {
        config.output = if output.is_empty() {
            None
        } else {
            Some(PathBuf::from(output))
        };
    }

    // -- Report: separators --
    if let Some(ref sep) = raw.report.decimal_separator {
        match single_char(sep) {
            Some(c) => config.number_style.decimal_separator = c,
            None => warnings.push(ConfigError::InvalidValue {
                field: "[report] decimal_separator".to_string(),
                value: sep.clone(),
                expected: "exactly one character".to_string(),
            }),
        }
    }
    if let Some(ref sep) = raw.report.grouping_separator {
        if sep.is_empty() {
            config.number_style.grouping_separator = None;
        } else {
            match single_char(sep) {
                Some(c) => config.number_style.grouping_separator = Some(c),
                None => warnings.push(ConfigError::InvalidValue {
                    field: "[report] grouping_separator".to_string(),
                    value: sep.clone(),
                    expected: "one character, or empty to disable grouping".to_string(),
                }),
            }
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(ConfigError::InvalidValue {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: "error, warn, info, debug, trace".to_string(),
            });
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    Ok((config, warnings))
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
