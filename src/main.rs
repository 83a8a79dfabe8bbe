// QueryBench - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Merging CLI overrides over config values
// 4. Running one benchmark session and mapping the outcome to an exit code

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use querybench::app::session::{self, SessionOptions};
use querybench::core::extractor::QueryFilter;
use querybench::core::model::ReportFormat;
use querybench::platform::config::{self, PlatformPaths};
use querybench::platform::mysql::{ConnectionSettings, MysqlExecutor};
use querybench::util::{self, constants};
use std::path::PathBuf;

/// QueryBench - replay the statements of a MySQL general query log and
/// report how long each one takes.
#[derive(Parser, Debug)]
#[command(name = "querybench", version, about)]
struct Cli {
    /// MySQL user name (falls back to [connection] user in config.toml).
    #[arg(short = 'u', long = "user")]
    user: Option<String>,

    /// MySQL password.
    #[arg(short = 'p', long = "password")]
    password: String,

    /// Server URL without database name, e.g. mysql://localhost:3306/
    #[arg(short = 's', long = "server")]
    server: Option<String>,

    /// Database name, e.g. test_db.
    #[arg(long = "db", visible_alias = "database")]
    database: Option<String>,

    /// Query log containing the statements to replay.
    #[arg(long = "log", default_value = constants::DEFAULT_LOG_FILE)]
    log: PathBuf,

    /// File to write the report to.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Do not write a report file.
    #[arg(long = "no-output", conflicts_with = "output")]
    no_output: bool,

    /// Print the report to the console.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Skip statements starting with these prefixes (case-insensitive,
    /// comma-separated).
    #[arg(long = "ignore", value_delimiter = ',')]
    ignore: Vec<String>,

    /// Only replay statements from this connection id.
    #[arg(long = "id")]
    connection_id: Option<String>,

    /// Report format: jetm (default) or csv.
    #[arg(short = 'f', long = "format")]
    format: Option<String>,

    /// Configuration file (defaults to the platform config directory).
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (app_config, config_warnings) = config::load_config(&config_path);

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "QueryBench starting"
    );
    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Config loading warning");
    }

    let Some(user) = cli.user.clone().or_else(|| app_config.user.clone()) else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "a user name is required: pass -u or set [connection] user in config.toml",
            )
            .exit();
    };

    let settings = ConnectionSettings {
        server: cli.server.clone().unwrap_or(app_config.server.clone()),
        database: cli.database.clone().unwrap_or(app_config.database.clone()),
        user,
        password: cli.password.clone(),
    };

    let options = SessionOptions {
        log_file: cli.log.clone(),
        filter: QueryFilter {
            connection_id: cli.connection_id.clone().or(app_config.connection_id.clone()),
            ignore_prefixes: if cli.ignore.is_empty() {
                app_config.ignore_prefixes.clone()
            } else {
                cli.ignore.clone()
            },
        },
        format: match cli.format.as_deref() {
            Some(selector) => ReportFormat::from_selector(Some(selector)),
            None => app_config.format,
        },
        number_style: app_config.number_style,
        output: if cli.no_output {
            None
        } else {
            cli.output.clone().or(app_config.output.clone())
        },
        verbose: cli.verbose,
    };

    tracing::debug!(?settings, ?options, "Session configured");

    let result = session::run_session(&options, || {
        MysqlExecutor::connect(&settings).map_err(Into::into)
    });

    match result {
        Ok(summary) => {
            if let Some(e) = &summary.monitor_error {
                tracing::warn!(error = %e, "Report may be incomplete");
            }
            tracing::info!(
                extracted = summary.extracted,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Session finished"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Session failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
