//! Data sources the catalog and collector read from.
//!
//! A [`SchemaSource`] answers three questions: which tables exist, which
//! columns a table has, and what rows a normalized SELECT returns. The live
//! implementation shells out to the `mysql` client; [`MemorySource`] holds the
//! same information in memory for tests and offline analysis.

pub(crate) mod batch;
pub mod memory;
pub mod mysql;

use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;

use crate::candidates::IdentityOrder;
use crate::component::ComponentRecord;
use crate::error::CallflowResult;

pub use memory::{MemorySource, MemoryTable};
pub use mysql::{MysqlOptions, MysqlSource};

/// Read-only access to a FreePBX-like database
pub trait SchemaSource: Send + Sync {
    /// All table names in the database
    fn list_tables(&self) -> impl Future<Output = CallflowResult<BTreeSet<String>>> + Send;

    /// Column name to declared type, in table order
    fn describe_table(
        &self,
        table: &str,
    ) -> impl Future<Output = CallflowResult<IndexMap<String, String>>> + Send;

    /// Run a normalized SELECT; records are keyed by the query's aliases
    fn select(
        &self,
        query: &SelectQuery,
    ) -> impl Future<Output = CallflowResult<Vec<ComponentRecord>>> + Send;
}

/// ORDER BY clause on the identity column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub order: IdentityOrder,
}

/// A SELECT that aliases physical columns to logical field names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: String,
    /// `(physical column, logical alias)` in output order
    pub columns: Vec<(String, String)>,
    pub order_by: Option<OrderBy>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            order_by: None,
        }
    }

    pub fn column(mut self, physical: impl Into<String>, alias: impl Into<String>) -> Self {
        self.columns
            .push((physical.into(), alias.into()));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, order: IdentityOrder) -> Self {
        self.order_by = Some(OrderBy {
            column: column.into(),
            order,
        });
        self
    }

    /// Logical aliases in output order
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(|(_, alias)| alias.as_str())
    }

    /// Render as MySQL text
    pub fn to_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|(physical, alias)| format!("{} AS {}", quote_ident(physical), quote_ident(alias)))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {} FROM {}", columns, quote_ident(&self.table));
        if let Some(order_by) = &self.order_by {
            let column = quote_ident(&order_by.column);
            match order_by.order {
                IdentityOrder::Numeric => {
                    sql.push_str(&format!(" ORDER BY CAST({} AS UNSIGNED), {}", column, column))
                }
                IdentityOrder::Lexical => sql.push_str(&format!(" ORDER BY {}", column)),
            }
        }
        sql
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Backtick-quote a MySQL identifier
pub(crate) fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_aliases_and_orders_numerically() {
        let query = SelectQuery::new("ringgroups")
            .column("grpnum", "group")
            .column("grplist", "members")
            .order_by("grpnum", IdentityOrder::Numeric);
        assert_eq!(
            query.to_sql(),
            "SELECT `grpnum` AS `group`, `grplist` AS `members` FROM `ringgroups` \
             ORDER BY CAST(`grpnum` AS UNSIGNED), `grpnum`"
        );
        assert_eq!(
            query
                .aliases()
                .collect::<Vec<_>>(),
            vec!["group", "members"]
        );
    }

    #[test]
    fn lexical_order_and_identifier_escaping() {
        let query = SelectQuery::new("incoming")
            .column("extension", "did")
            .order_by("extension", IdentityOrder::Lexical);
        assert_eq!(
            query.to_sql(),
            "SELECT `extension` AS `did` FROM `incoming` ORDER BY `extension`"
        );
        assert_eq!(quote_ident("odd`name"), "`odd``name`");
    }
}
