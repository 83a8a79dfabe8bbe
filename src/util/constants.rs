// QueryBench - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "QueryBench";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "QueryBench";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Connection defaults
// =============================================================================

/// Server URL without the database name. The database is appended verbatim.
pub const DEFAULT_SERVER: &str = "mysql://localhost:3306/";

/// Database replayed against when none is configured.
pub const DEFAULT_DATABASE: &str = "test_db";

// =============================================================================
// Extraction
// =============================================================================

/// Query log read when `--log` is not given.
pub const DEFAULT_LOG_FILE: &str = "benchmarking-queries.sql";

/// Initial capacity of the extracted query list.
pub const INITIAL_QUERY_CAPACITY: usize = 1_000;

// =============================================================================
// Measurement
// =============================================================================

/// Name of the enclosing measurement point wrapping one replay run.
pub const ROOT_POINT_NAME: &str = "Measurement";

// =============================================================================
// Report
// =============================================================================

/// Report file written when neither `--output` nor config override it.
pub const DEFAULT_OUTPUT_FILE: &str = "results.txt";

/// Returned by the renderer when no monitor snapshot exists.
pub const NO_MONITOR_MESSAGE: &str = "No monitor initialized.";

/// Cell separator used by the CSV report format.
pub const CSV_SEPARATOR: char = ';';

/// Cell separator used by the plain text report format.
pub const PLAIN_SEPARATOR: char = '|';

/// Platform line terminator appended to every report row.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";

/// Platform line terminator appended to every report row.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Fraction digits printed for every duration cell.
pub const REPORT_FRACTION_DIGITS: usize = 3;

/// Default decimal separator (en-US conventions).
pub const DEFAULT_DECIMAL_SEPARATOR: char = '.';

/// Default digit grouping separator (en-US conventions).
pub const DEFAULT_GROUPING_SEPARATOR: char = ',';

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum number of characters of a statement included in log output.
/// Keeps long statements and their literals out of the logs.
pub const DEBUG_MAX_SQL_PREVIEW: usize = 120;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
