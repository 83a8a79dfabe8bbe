// QueryBench - platform/mysql.rs
//
// StatementExecutor over a single MySQL session.
//
// The driver is async; a current-thread tokio runtime owned by the executor
// blocks on each call, so the replay loop stays synchronous and statements
// never overlap.

use crate::core::executor::{ExecutionOutcome, StatementExecutor};
use crate::util::error::{ConnectionError, ExecutionError};
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts, OptsBuilder};
use tokio::runtime::{Builder, Runtime};

/// Credentials and location of the database to replay against.
#[derive(Clone)]
pub struct ConnectionSettings {
    /// Server URL without database, e.g. `mysql://localhost:3306/`.
    pub server: String,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectionSettings {
    /// Server URL with the database appended.
    pub fn url(&self) -> String {
        format!("{}{}", self.server, self.database)
    }
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("server", &self.server)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One open MySQL connection plus the runtime that drives it.
pub struct MysqlExecutor {
    runtime: Runtime,
    conn: Option<Conn>,
}

impl MysqlExecutor {
    /// Open a connection. Fails before any statement can run.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self, ConnectionError> {
        let url = settings.url();
        let base = Opts::from_url(&url).map_err(|e| ConnectionError::InvalidUrl {
            url: url.clone(),
            source: e,
        })?;
        let opts = OptsBuilder::from_opts(base)
            .user(Some(settings.user.clone()))
            .pass(Some(settings.password.clone()));

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ConnectionError::Runtime { source: e })?;

        tracing::info!(url = %url, user = %settings.user, "Opening MySQL connection");
        let conn = runtime
            .block_on(Conn::new(opts))
            .map_err(|e| ConnectionError::Connect {
                url: url.clone(),
                source: e,
            })?;
        tracing::info!("Connection established");

        Ok(Self {
            runtime,
            conn: Some(conn),
        })
    }

    /// Close the connection. Calling it again is a no-op.
    pub fn close(&mut self) -> Result<(), ConnectionError> {
        match self.conn.take() {
            Some(conn) => {
                self.runtime
                    .block_on(conn.disconnect())
                    .map_err(|e| ConnectionError::Disconnect { source: e })?;
                tracing::debug!("Connection closed");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl StatementExecutor for MysqlExecutor {
    fn execute(&mut self, sql: &str) -> Result<ExecutionOutcome, ExecutionError> {
        let conn = self.conn.as_mut().ok_or(ExecutionError::NotConnected)?;
        let result = self.runtime.block_on(async {
            let mut result = conn.query_iter(sql).await?;
            let rows = result.collect::<mysql_async::Row>().await?;
            let affected = result.affected_rows();
            result.drop_result().await?;
            Ok::<_, mysql_async::Error>(if rows.is_empty() {
                affected
            } else {
                rows.len() as u64
            })
        });

        match result {
            Ok(rows) => Ok(ExecutionOutcome { rows }),
            Err(e) => Err(ExecutionError::Statement {
                sql: sql.to_string(),
                source: Box::new(e),
            }),
        }
    }
}

impl Drop for MysqlExecutor {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "Could not close SQL connection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(server: &str) -> ConnectionSettings {
        ConnectionSettings {
            server: server.to_string(),
            database: "test_db".to_string(),
            user: "bench".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_url_appends_database() {
        assert_eq!(
            settings("mysql://localhost:3306/").url(),
            "mysql://localhost:3306/test_db"
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let text = format!("{:?}", settings("mysql://localhost:3306/"));
        assert!(!text.contains("secret"));
        assert!(text.contains("<redacted>"));
    }

    #[test]
    fn test_invalid_url_rejected_before_connecting() {
        let result = MysqlExecutor::connect(&settings("jdbc:mysql://localhost:3306/"));
        assert!(matches!(result, Err(ConnectionError::InvalidUrl { .. })));
    }
}
