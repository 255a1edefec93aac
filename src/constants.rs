//! Defaults and protocol constants

/// Default FreePBX database name
pub const DEFAULT_DATABASE: &str = "asterisk";

/// Default database user on a stock FreePBX install
pub const DEFAULT_DB_USER: &str = "root";

/// Default MariaDB socket on FreePBX distro installs
pub const DEFAULT_SOCKET: &str = "/var/lib/mysql/mysql.sock";

/// Database client binary invoked per query
pub const DEFAULT_MYSQL_PROGRAM: &str = "mysql";

/// Environment variable the client reads the password from
pub const MYSQL_PASSWORD_ENV: &str = "MYSQL_PWD";

/// Per-query timeout in milliseconds
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 10_000;

/// Resolution stops once a branch is deeper than this
pub const MAX_RESOLVE_DEPTH: usize = 10;

/// Batch-mode field and row separators
pub const FIELD_SEPARATOR: char = '\t';
pub const ROW_SEPARATOR: char = '\n';

/// Batch-mode rendering of SQL NULL
pub const NULL_MARKER: &str = "NULL";

/// Client error codes that mean the server is unusable for this run:
/// access denied (1044, 1045), unknown database (1049), and the 200x
/// client-side connection errors.
pub const CONNECTION_ERROR_CODES: &[u32] = &[1044, 1045, 1049, 2002, 2003, 2005, 2006, 2013];

/// Snapshot format version written by `--dump`
pub const SNAPSHOT_VERSION: u32 = 1;
