//! Call-flow discovery for FreePBX systems
//!
//! This crate reads a FreePBX configuration database whose schema version is
//! not known in advance, works out which tables and columns hold each routing
//! component, and turns every inbound route into a resolved call-flow tree.
//!
//! # Architecture
//!
//! One pass runs these stages in order:
//! - [`SchemaCatalog`]: list the tables a [`SchemaSource`] exposes
//! - [`ComponentMapper`]: pick a table and columns for each [`ComponentKind`]
//! - [`DataCollector`]: run one normalized SELECT per mapped component
//! - [`DestinationResolver`]: follow destination references into a
//!   [`CallFlowNode`] tree, stopping at loops and at a fixed depth
//! - [`FlowRenderer`]: print the tree with connectors and optional colors
//!
//! Components that cannot be mapped or collected are reported and left
//! empty; only an unreachable source stops the run.
//!
//! # Examples
//!
//! ## Against a live database
//!
//! ```rust,no_run
//! use freepbx_callflow::{
//!     analyze, CallFlowReport, CallflowError, FlowRenderer, MysqlOptions, MysqlSource,
//!     RenderOptions,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CallflowError> {
//!     let source = MysqlSource::new(MysqlOptions::new().user("root"));
//!     let analysis = analyze(&source).await?;
//!
//!     let renderer = FlowRenderer::new(RenderOptions::default());
//!     for line in CallFlowReport::new(&analysis.model).render(&renderer, Some("2485550100")) {
//!         println!("{}", line);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## From in-memory tables
//!
//! ```rust
//! use freepbx_callflow::{DestinationResolver, MemorySource, MemoryTable, NodeKind};
//!
//! # tokio_test::block_on(async {
//! let source = MemorySource::new()
//!     .table(
//!         "users",
//!         MemoryTable::new(["extension", "name"]).row(["410", "Alice"]),
//!     )
//!     .table(
//!         "incoming",
//!         MemoryTable::new(["extension", "destination"]).row(["5550100", "ext-local,410,1"]),
//!     );
//! let analysis = freepbx_callflow::analyze(&source).await.unwrap();
//!
//! let root = DestinationResolver::new(&analysis.model).resolve("ext-local,410,1");
//! assert_eq!(root.kind, NodeKind::Extension);
//! assert_eq!(root.label, "Extension 410 (Alice)");
//! # });
//! ```

pub mod candidates;
pub mod catalog;
pub mod collector;
pub mod component;
pub mod describe;
pub mod destination;
pub mod error;
pub mod mapper;
pub mod model;
pub mod node;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod snapshot;
pub mod source;

pub(crate) mod constants;

pub use candidates::{builtin_specs, spec_for, ComponentSpec, FieldCandidates, IdentityOrder};
pub use catalog::SchemaCatalog;
pub use collector::{CollectedData, CollectionStatus, ComponentData, DataCollector};
pub use component::{ComponentKind, ComponentRecord};
pub use constants::{
    DEFAULT_DATABASE, DEFAULT_DB_USER, DEFAULT_QUERY_TIMEOUT_MS, DEFAULT_SOCKET, MAX_RESOLVE_DEPTH,
    MYSQL_PASSWORD_ENV,
};
pub use destination::{Destination, DestinationKind};
pub use error::{CallflowError, CallflowResult};
pub use mapper::{map_component, ComponentMapper, MappingSet, SchemaMapping};
pub use model::PbxModel;
pub use node::{Branch, CallFlowNode, NodeKind};
pub use pipeline::{analyze, analyze_with, Analysis, CallFlowReport, RouteFlow};
pub use render::{FlowRenderer, RenderOptions};
pub use resolver::{DestinationResolver, ResolverOptions};
pub use snapshot::Snapshot;
pub use source::{MemorySource, MemoryTable, MysqlOptions, MysqlSource, SchemaSource, SelectQuery};
