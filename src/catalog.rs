//! Read-only introspection of the tables a source exposes.

use indexmap::IndexMap;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::{error::CallflowResult, source::SchemaSource};

/// Table list of one source, loaded once, with on-demand column lookup
pub struct SchemaCatalog<'a, S: SchemaSource> {
    source: &'a S,
    tables: BTreeSet<String>,
}

impl<'a, S: SchemaSource> SchemaCatalog<'a, S> {
    /// List the source's tables.
    ///
    /// Failing to list tables means the source is unusable; that error is the
    /// only one this module hands back to the caller.
    pub async fn load(source: &'a S) -> CallflowResult<Self> {
        let tables = source
            .list_tables()
            .await?;
        info!("[CATALOG] {} tables available", tables.len());
        Ok(Self { source, tables })
    }

    pub fn list_tables(&self) -> &BTreeSet<String> {
        &self.tables
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables
            .contains(name)
    }

    /// Column name to declared type.
    ///
    /// Empty when the table is not in the catalog or the describe fails.
    pub async fn describe_table(&self, name: &str) -> IndexMap<String, String> {
        if !self.has_table(name) {
            debug!("[CATALOG] table {} not present", name);
            return IndexMap::new();
        }

        match self
            .source
            .describe_table(name)
            .await
        {
            Ok(columns) => {
                debug!("[CATALOG] {} has {} columns", name, columns.len());
                columns
            }
            Err(e) => {
                warn!("[CATALOG] could not describe {}: {}", name, e);
                IndexMap::new()
            }
        }
    }
}
