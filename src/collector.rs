//! Materialize rows for every mapped component.
//!
//! One SELECT per component, run in mapping order. A failing SELECT empties
//! that component and is recorded in its [`CollectionStatus`]; collection of
//! the remaining components continues.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    component::{ComponentKind, ComponentRecord},
    error::CallflowResult,
    mapper::{MappingSet, SchemaMapping},
    source::SchemaSource,
};

/// What happened to one component during collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStatus {
    Collected,
    Failed(String),
    Unmapped,
}

/// Rows and status for one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentData {
    pub status: CollectionStatus,
    /// Physical table the rows came from, if mapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default)]
    pub records: Vec<ComponentRecord>,
}

impl ComponentData {
    pub fn collected(table: impl Into<String>, records: Vec<ComponentRecord>) -> Self {
        Self {
            status: CollectionStatus::Collected,
            table: Some(table.into()),
            records,
        }
    }

    pub fn failed(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: CollectionStatus::Failed(reason.into()),
            table: Some(table.into()),
            records: Vec::new(),
        }
    }

    pub fn unmapped() -> Self {
        Self {
            status: CollectionStatus::Unmapped,
            table: None,
            records: Vec::new(),
        }
    }
}

/// Collected rows for all components, keyed by component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectedData {
    components: IndexMap<ComponentKind, ComponentData>,
}

impl CollectedData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ComponentKind, data: ComponentData) {
        self.components
            .insert(kind, data);
    }

    /// Convenience for building data by hand: mark `kind` collected
    pub fn with_records(mut self, kind: ComponentKind, records: Vec<ComponentRecord>) -> Self {
        self.insert(kind, ComponentData::collected(kind.as_str(), records));
        self
    }

    pub fn get(&self, kind: ComponentKind) -> Option<&ComponentData> {
        self.components
            .get(&kind)
    }

    /// Records of one component; empty if unmapped, failed or absent
    pub fn records(&self, kind: ComponentKind) -> &[ComponentRecord] {
        self.components
            .get(&kind)
            .map(|data| data.records.as_slice())
            .unwrap_or(&[])
    }

    pub fn status(&self, kind: ComponentKind) -> Option<&CollectionStatus> {
        self.components
            .get(&kind)
            .map(|data| &data.status)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, ComponentKind, ComponentData> {
        self.components
            .iter()
    }

    pub fn len(&self) -> usize {
        self.components
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.components
            .is_empty()
    }
}

/// Runs the normalized SELECTs against a source
pub struct DataCollector<'a, S: SchemaSource> {
    source: &'a S,
}

impl<'a, S: SchemaSource> DataCollector<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Rows of one mapped component, keyed by logical field name
    pub async fn collect(&self, mapping: &SchemaMapping) -> CallflowResult<Vec<ComponentRecord>> {
        let query = mapping.select_query();
        self.source
            .select(&query)
            .await
    }

    /// Collect every component of the mapping set
    pub async fn collect_all(&self, mappings: &MappingSet) -> CollectedData {
        let mut data = CollectedData::new();

        for mapping in mappings.iter() {
            let entry = match self
                .collect(mapping)
                .await
            {
                Ok(records) => {
                    info!(
                        "[COLLECT] {}: {} records from {}",
                        mapping.kind,
                        records.len(),
                        mapping.table
                    );
                    ComponentData::collected(&mapping.table, records)
                }
                Err(e) => {
                    warn!("[COLLECT] {}: collection failed: {}", mapping.kind, e);
                    ComponentData::failed(&mapping.table, e.to_string())
                }
            };
            data.insert(mapping.kind, entry);
        }

        for kind in mappings.unmapped() {
            data.insert(*kind, ComponentData::unmapped());
        }

        data
    }
}
