//! Resolve which physical table and columns implement each component.
//!
//! Policy: walk the candidate tables in order, and within the first table that
//! exists, take the first candidate column present for every logical field. A
//! table is accepted only if the identity field resolved; otherwise the next
//! candidate table is tried. Fields are never merged across tables.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{
    candidates::{builtin_specs, ComponentSpec, IdentityOrder},
    catalog::SchemaCatalog,
    component::ComponentKind,
    source::{SchemaSource, SelectQuery},
};

/// Where one component lives in this particular database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMapping {
    pub kind: ComponentKind,
    pub table: String,
    /// Logical field to physical column, in candidate-spec order
    pub fields: IndexMap<String, String>,
    pub identity: String,
    pub order: IdentityOrder,
}

impl SchemaMapping {
    /// Physical column behind a logical field
    pub fn column(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|s| s.as_str())
    }

    /// The normalized SELECT for this component
    pub fn select_query(&self) -> SelectQuery {
        let mut query = self
            .fields
            .iter()
            .fold(SelectQuery::new(&self.table), |q, (logical, physical)| {
                q.column(physical, logical)
            });
        if let Some(column) = self.column(&self.identity) {
            query = query.order_by(column, self.order);
        }
        query
    }
}

/// Mapping outcome for every component
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSet {
    mappings: IndexMap<ComponentKind, SchemaMapping>,
    unmapped: Vec<ComponentKind>,
}

impl MappingSet {
    pub fn get(&self, kind: ComponentKind) -> Option<&SchemaMapping> {
        self.mappings
            .get(&kind)
    }

    pub fn is_mapped(&self, kind: ComponentKind) -> bool {
        self.mappings
            .contains_key(&kind)
    }

    /// Mapped components in mapping order
    pub fn iter(&self) -> impl Iterator<Item = &SchemaMapping> {
        self.mappings
            .values()
    }

    /// Components for which no compatible table was found
    pub fn unmapped(&self) -> &[ComponentKind] {
        &self.unmapped
    }

    pub fn len(&self) -> usize {
        self.mappings
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings
            .is_empty()
    }
}

/// Map one candidate table given its column set.
///
/// Returns `None` when the identity field has no matching column.
pub fn map_component<C>(spec: &ComponentSpec, table: &str, columns: &C) -> Option<SchemaMapping>
where
    C: ColumnSet + ?Sized,
{
    let mut fields = IndexMap::new();
    for candidates in spec.fields {
        if let Some(column) = candidates
            .columns
            .iter()
            .find(|c| columns.has_column(c))
        {
            fields.insert(candidates.field.to_string(), column.to_string());
        }
    }

    if !fields.contains_key(spec.identity) {
        debug!(
            "[MAP] {}: table {} has no column for identity field {}",
            spec.kind, table, spec.identity
        );
        return None;
    }

    Some(SchemaMapping {
        kind: spec.kind,
        table: table.to_string(),
        fields,
        identity: spec
            .identity
            .to_string(),
        order: spec.order,
    })
}

/// Anything that can answer "does this table have column X"
pub trait ColumnSet {
    fn has_column(&self, name: &str) -> bool;
}

impl<V> ColumnSet for IndexMap<String, V> {
    fn has_column(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl ColumnSet for [&str] {
    fn has_column(&self, name: &str) -> bool {
        self.iter()
            .any(|column| *column == name)
    }
}

/// Maps every component against a catalog
#[derive(Debug, Clone)]
pub struct ComponentMapper {
    specs: Vec<ComponentSpec>,
}

impl Default for ComponentMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentMapper {
    /// Mapper over the built-in candidate lists
    pub fn new() -> Self {
        Self {
            specs: builtin_specs(),
        }
    }

    /// Mapper over caller-supplied candidate lists
    pub fn with_specs(specs: Vec<ComponentSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[ComponentSpec] {
        &self.specs
    }

    /// First candidate table of `spec` that yields its identity field
    pub async fn map_one<S: SchemaSource>(
        &self,
        spec: &ComponentSpec,
        catalog: &SchemaCatalog<'_, S>,
    ) -> Option<SchemaMapping> {
        for table in spec.tables {
            if !catalog.has_table(table) {
                continue;
            }
            let columns = catalog
                .describe_table(table)
                .await;
            if let Some(mapping) = map_component(spec, table, &columns) {
                return Some(mapping);
            }
        }
        None
    }

    /// Map every component; failures only mark that component unmapped
    pub async fn map_all<S: SchemaSource>(&self, catalog: &SchemaCatalog<'_, S>) -> MappingSet {
        let mut set = MappingSet::default();

        for spec in &self.specs {
            match self
                .map_one(spec, catalog)
                .await
            {
                Some(mapping) => {
                    info!(
                        "[MAP] {} -> {} ({} fields)",
                        spec.kind,
                        mapping.table,
                        mapping
                            .fields
                            .len()
                    );
                    set.mappings
                        .insert(spec.kind, mapping);
                }
                None => {
                    warn!("[MAP] {}: no compatible table found", spec.kind);
                    set.unmapped
                        .push(spec.kind);
                }
            }
        }

        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::spec_for;
    use crate::component::fields;

    #[test]
    fn first_candidate_column_wins() {
        let spec = spec_for(ComponentKind::TimeConditions);
        let columns: &[&str] = &[
            "id",
            "timeconditions_id",
            "displayname",
            "destination_true",
            "truegoto",
            "falsegoto",
            "toggle_mode",
        ];
        let mapping = map_component(spec, "timeconditions", columns).unwrap();
        assert_eq!(mapping.column(fields::ID), Some("timeconditions_id"));
        assert_eq!(mapping.column(fields::TRUE_DEST), Some("truegoto"));
        assert_eq!(mapping.column(fields::MODE), Some("toggle_mode"));
        assert_eq!(mapping.column(fields::TIME_GROUP), None);
    }

    #[test]
    fn missing_identity_rejects_table() {
        let spec = spec_for(ComponentKind::RingGroups);
        let columns: &[&str] = &["description", "grplist", "postdest"];
        assert!(map_component(spec, "ringgroups", columns).is_none());
    }

    #[test]
    fn select_query_aliases_logical_names() {
        let spec = spec_for(ComponentKind::Queues);
        let columns: &[&str] = &["extension", "descr", "keyword"];
        let mapping = map_component(spec, "queues_config", columns).unwrap();
        assert_eq!(
            mapping
                .select_query()
                .to_sql(),
            "SELECT `extension` AS `extension`, `descr` AS `description` FROM `queues_config` \
             ORDER BY CAST(`extension` AS UNSIGNED), `extension`"
        );
    }
}
