//! In-memory [`SchemaSource`] for tests and offline analysis.

use indexmap::IndexMap;
use std::collections::{BTreeSet, HashSet};

use super::{SchemaSource, SelectQuery};
use crate::{
    candidates::IdentityOrder,
    component::ComponentRecord,
    error::{CallflowError, CallflowResult},
};

/// One table: declared columns and raw rows keyed by physical column
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    columns: IndexMap<String, String>,
    rows: Vec<IndexMap<String, String>>,
}

impl MemoryTable {
    /// Table with the given columns, all declared as `varchar(255)`
    pub fn new<'a>(columns: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|c| (c.to_string(), "varchar(255)".to_string()))
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; values line up with the declared columns
    pub fn row<'a>(mut self, values: impl IntoIterator<Item = &'a str>) -> Self {
        let row = self
            .columns
            .keys()
            .cloned()
            .zip(
                values
                    .into_iter()
                    .map(str::to_string),
            )
            .collect();
        self.rows
            .push(row);
        self
    }

    pub fn columns(&self) -> &IndexMap<String, String> {
        &self.columns
    }

    pub fn rows(&self) -> &[IndexMap<String, String>] {
        &self.rows
    }
}

/// Tables held in memory, with switches to simulate failures
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: IndexMap<String, MemoryTable>,
    broken: HashSet<String>,
    offline: bool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: impl Into<String>, table: MemoryTable) -> Self {
        self.tables
            .insert(name.into(), table);
        self
    }

    /// Listing works but every SELECT against `name` fails
    pub fn broken_table(mut self, name: impl Into<String>) -> Self {
        self.broken
            .insert(name.into());
        self
    }

    /// Every call fails as if the server were unreachable
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    fn check_online(&self) -> CallflowResult<()> {
        if self.offline {
            Err(CallflowError::connection_failed(
                "Can't connect to in-memory server (offline)",
            ))
        } else {
            Ok(())
        }
    }

    fn lookup(&self, table: &str) -> CallflowResult<&MemoryTable> {
        self.tables
            .get(table)
            .ok_or_else(|| CallflowError::UnknownTable {
                table: table.to_string(),
            })
    }
}

/// Sort key for numeric-aware ordering: numbers first by value, then text
fn numeric_key(value: &str) -> (u8, u64, String) {
    match value
        .trim()
        .parse::<u64>()
    {
        Ok(n) => (0, n, value.to_string()),
        Err(_) => (1, 0, value.to_string()),
    }
}

impl SchemaSource for MemorySource {
    async fn list_tables(&self) -> CallflowResult<BTreeSet<String>> {
        self.check_online()?;
        Ok(self
            .tables
            .keys()
            .cloned()
            .collect())
    }

    async fn describe_table(&self, table: &str) -> CallflowResult<IndexMap<String, String>> {
        self.check_online()?;
        Ok(self
            .lookup(table)?
            .columns
            .clone())
    }

    async fn select(&self, query: &SelectQuery) -> CallflowResult<Vec<ComponentRecord>> {
        self.check_online()?;
        let table = self.lookup(&query.table)?;
        if self
            .broken
            .contains(&query.table)
        {
            return Err(CallflowError::query_failed(
                query.to_sql(),
                "Lock wait timeout exceeded; try restarting transaction",
            ));
        }

        for (physical, _) in &query.columns {
            if !table
                .columns
                .contains_key(physical)
            {
                return Err(CallflowError::query_failed(
                    query.to_sql(),
                    format!("Unknown column '{}' in 'field list'", physical),
                ));
            }
        }

        let mut rows: Vec<&IndexMap<String, String>> = table
            .rows
            .iter()
            .collect();
        if let Some(order_by) = &query.order_by {
            let value = |row: &IndexMap<String, String>| {
                row.get(&order_by.column)
                    .cloned()
                    .unwrap_or_default()
            };
            // stable: ties keep insertion order
            match order_by.order {
                IdentityOrder::Numeric => rows.sort_by_key(|row| numeric_key(&value(row))),
                IdentityOrder::Lexical => rows.sort_by_key(|row| value(row)),
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                ComponentRecord::with_fields(query.columns.iter().map(|(physical, alias)| {
                    (
                        alias.clone(),
                        row.get(physical)
                            .cloned()
                            .unwrap_or_default(),
                    )
                }))
            })
            .collect())
    }
}
