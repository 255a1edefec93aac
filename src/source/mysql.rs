//! Live source backed by the `mysql` command-line client.
//!
//! Each query is one blocking round-trip: spawn the client in batch mode,
//! wait for it under a fixed timeout, decode stdout. There is no persistent
//! connection; a stuck query is killed when its timeout expires.

use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use super::{batch, quote_ident, SchemaSource, SelectQuery};
use crate::{
    component::ComponentRecord,
    constants::*,
    error::{CallflowError, CallflowResult},
};

/// Connection settings for [`MysqlSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MysqlOptions {
    pub socket: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    pub program: String,
    pub timeout: Duration,
}

impl Default for MysqlOptions {
    fn default() -> Self {
        Self {
            socket: Some(DEFAULT_SOCKET.to_string()),
            host: None,
            port: None,
            user: DEFAULT_DB_USER.to_string(),
            password: None,
            database: DEFAULT_DATABASE.to_string(),
            program: DEFAULT_MYSQL_PROGRAM.to_string(),
            timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
        }
    }
}

impl MysqlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect through a unix socket
    pub fn socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = Some(socket.into());
        self
    }

    /// Connect over TCP; takes precedence over the socket
    pub fn host(mut self, host: impl Into<String>, port: Option<u16>) -> Self {
        self.host = Some(host.into());
        self.port = port;
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn password(mut self, password: Option<String>) -> Self {
        self.password = password.filter(|p| !p.is_empty());
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Client arguments for one query, password excluded
    pub(crate) fn client_args(&self, sql: &str) -> Vec<String> {
        let mut args = vec![
            "--batch".to_string(),
            "--skip-column-names".to_string(),
            format!("--user={}", self.user),
        ];
        if let Some(host) = &self.host {
            args.push(format!("--host={}", host));
            if let Some(port) = self.port {
                args.push(format!("--port={}", port));
            }
        } else if let Some(socket) = &self.socket {
            args.push(format!("--socket={}", socket));
        }
        args.push(format!("--database={}", self.database));
        args.push("--execute".to_string());
        args.push(sql.to_string());
        args
    }

    /// Human-readable target for log lines and error messages
    pub fn target(&self) -> String {
        match (&self.host, &self.socket) {
            (Some(host), _) => format!(
                "{}@{}:{}/{}",
                self.user,
                host,
                self.port
                    .unwrap_or(3306),
                self.database
            ),
            (None, Some(socket)) => format!("{}@{}/{}", self.user, socket, self.database),
            (None, None) => format!("{}@localhost/{}", self.user, self.database),
        }
    }
}

/// [`SchemaSource`] that runs one `mysql` client process per query
#[derive(Debug, Clone)]
pub struct MysqlSource {
    options: MysqlOptions,
}

impl MysqlSource {
    pub fn new(options: MysqlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MysqlOptions {
        &self.options
    }

    /// Run one statement and return decoded rows
    pub async fn query(
        &self,
        sql: &str,
        expected_fields: Option<usize>,
    ) -> CallflowResult<Vec<Vec<String>>> {
        let timeout_ms = self
            .options
            .timeout
            .as_millis() as u64;
        debug!("[QUERY] {} ({}ms timeout)", sql, timeout_ms);

        let mut command = Command::new(&self.options.program);
        command
            .args(self.options.client_args(sql))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(password) = &self.options.password {
            command.env(MYSQL_PASSWORD_ENV, password);
        }

        let child = command
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CallflowError::ClientNotFound {
                        program: self
                            .options
                            .program
                            .clone(),
                    }
                } else {
                    CallflowError::Io(e)
                }
            })?;

        let output = match timeout(self.options.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("[QUERY] timed out after {}ms: {}", timeout_ms, sql);
                return Err(CallflowError::Timeout { timeout_ms });
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output
            .status
            .success()
        {
            return Err(classify_failure(sql, stderr.trim()));
        }
        if !stderr
            .trim()
            .is_empty()
        {
            trace!("[QUERY] client stderr: {}", stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let rows = batch::parse_rows(&stdout, expected_fields)?;
        trace!("[QUERY] {} rows", rows.len());
        Ok(rows)
    }
}

/// Map a failed client run onto the error taxonomy
fn classify_failure(sql: &str, stderr: &str) -> CallflowError {
    match batch::client_error_code(stderr) {
        Some(code) if CONNECTION_ERROR_CODES.contains(&code) => {
            CallflowError::connection_failed(stderr)
        }
        _ => CallflowError::query_failed(sql, stderr),
    }
}

impl SchemaSource for MysqlSource {
    async fn list_tables(&self) -> CallflowResult<BTreeSet<String>> {
        let rows = self
            .query("SHOW TABLES", Some(1))
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                row.into_iter()
                    .next()
            })
            .collect())
    }

    async fn describe_table(&self, table: &str) -> CallflowResult<IndexMap<String, String>> {
        let sql = format!("SHOW COLUMNS FROM {}", quote_ident(table));
        let rows = self
            .query(&sql, None)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let mut fields = row.into_iter();
                let name = fields.next()?;
                let declared = fields
                    .next()
                    .unwrap_or_default();
                Some((name, declared))
            })
            .collect())
    }

    async fn select(&self, query: &SelectQuery) -> CallflowResult<Vec<ComponentRecord>> {
        let rows = self
            .query(&query.to_sql(), Some(query.columns.len()))
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| ComponentRecord::with_fields(query.aliases().zip(row)))
            .collect())
    }
}
