//! One analysis pass: catalog, mapping, collection, then per-route trees.

use tracing::info;

use crate::{
    catalog::SchemaCatalog,
    collector::{CollectedData, CollectionStatus, DataCollector},
    component::ComponentKind,
    error::CallflowResult,
    mapper::{ComponentMapper, MappingSet},
    model::{InboundRoute, PbxModel},
    node::CallFlowNode,
    render::FlowRenderer,
    resolver::{DestinationResolver, ResolverOptions},
    source::SchemaSource,
};

/// Everything learned about one PBX
#[derive(Debug, Clone)]
pub struct Analysis {
    /// `None` when the data came from a snapshot
    pub mappings: Option<MappingSet>,
    pub collected: CollectedData,
    pub model: PbxModel,
}

impl Analysis {
    /// Build from already-collected data, e.g. a snapshot
    pub fn from_collected(collected: CollectedData) -> Self {
        let model = PbxModel::from_collected(&collected);
        Self {
            mappings: None,
            collected,
            model,
        }
    }

    /// Components that were unmapped or failed, with a reason
    pub fn degraded(&self) -> Vec<(ComponentKind, String)> {
        self.collected
            .iter()
            .filter_map(|(kind, data)| match &data.status {
                CollectionStatus::Collected => None,
                CollectionStatus::Unmapped => Some((*kind, "no compatible table".to_string())),
                CollectionStatus::Failed(reason) => Some((*kind, reason.clone())),
            })
            .collect()
    }
}

/// Map and collect every component of `source` with the built-in mapper.
///
/// Only a source that cannot list its tables is an error; everything after
/// that degrades per component.
pub async fn analyze<S: SchemaSource>(source: &S) -> CallflowResult<Analysis> {
    analyze_with(source, &ComponentMapper::new()).await
}

pub async fn analyze_with<S: SchemaSource>(
    source: &S,
    mapper: &ComponentMapper,
) -> CallflowResult<Analysis> {
    let catalog = SchemaCatalog::load(source).await?;
    let mappings = mapper
        .map_all(&catalog)
        .await;
    let collected = DataCollector::new(source)
        .collect_all(&mappings)
        .await;
    let model = PbxModel::from_collected(&collected);

    info!(
        "[ANALYZE] {} mapped, {} unmapped, {} inbound routes",
        mappings.len(),
        mappings
            .unmapped()
            .len(),
        model
            .inbound_routes
            .len()
    );

    Ok(Analysis {
        mappings: Some(mappings),
        collected,
        model,
    })
}

/// Resolved tree for one inbound route
#[derive(Debug, Clone)]
pub struct RouteFlow<'a> {
    pub route: &'a InboundRoute,
    pub root: CallFlowNode,
}

/// Per-route call flows over one model
pub struct CallFlowReport<'a> {
    model: &'a PbxModel,
    options: ResolverOptions,
}

impl<'a> CallFlowReport<'a> {
    pub fn new(model: &'a PbxModel) -> Self {
        Self::with_options(model, ResolverOptions::default())
    }

    pub fn with_options(model: &'a PbxModel, options: ResolverOptions) -> Self {
        Self { model, options }
    }

    fn flow(&self, route: &'a InboundRoute) -> RouteFlow<'a> {
        let resolver = DestinationResolver::with_options(self.model, self.options);
        RouteFlow {
            route,
            root: resolver.resolve(&route.destination),
        }
    }

    /// Every inbound route in collected order
    pub fn all_routes(&self) -> Vec<RouteFlow<'a>> {
        self.model
            .inbound_routes
            .iter()
            .map(|route| self.flow(route))
            .collect()
    }

    /// The route for one DID, if there is one
    pub fn route(&self, did: &str) -> Option<RouteFlow<'a>> {
        self.model
            .inbound_route(did.trim())
            .map(|route| self.flow(route))
    }

    /// Rendered lines for all routes, or only `did`; routes separated by a blank line
    pub fn render(&self, renderer: &FlowRenderer, did: Option<&str>) -> Vec<String> {
        match did {
            Some(did) => match self.route(did) {
                Some(flow) => renderer.render_route(flow.route, &flow.root),
                None => renderer.render_missing_route(did.trim()),
            },
            None => {
                let flows = self.all_routes();
                if flows.is_empty() {
                    return vec!["No inbound routes found".to_string()];
                }
                let mut lines = Vec::new();
                for (i, flow) in flows
                    .iter()
                    .enumerate()
                {
                    if i > 0 {
                        lines.push(String::new());
                    }
                    lines.extend(renderer.render_route(flow.route, &flow.root));
                }
                lines
            }
        }
    }
}
