//! Integration tests against a live FreePBX database.
//!
//! These tests need the `mysql` client and a FreePBX `asterisk` database
//! reachable through the default socket as root (password from `MYSQL_PWD`).
//! Run with: cargo test --test live_freepbx -- --ignored

use freepbx_callflow::{
    analyze, CallFlowReport, CollectionStatus, ComponentKind, FlowRenderer, MysqlOptions,
    MysqlSource, RenderOptions, SchemaCatalog, SchemaSource,
};
use std::time::Duration;

fn source() -> MysqlSource {
    MysqlSource::new(
        MysqlOptions::new()
            .password(std::env::var("MYSQL_PWD").ok())
            .timeout(Duration::from_secs(10)),
    )
}

#[tokio::test]
#[ignore]
async fn live_list_tables() {
    let source = source();
    let tables = source
        .list_tables()
        .await
        .unwrap();
    assert!(
        tables.contains("users"),
        "expected a users table, got {:?}",
        tables
    );
}

#[tokio::test]
#[ignore]
async fn live_describe_incoming() {
    let source = source();
    let catalog = SchemaCatalog::load(&source)
        .await
        .unwrap();
    let columns = catalog
        .describe_table("incoming")
        .await;
    assert!(columns.contains_key("destination"));
    assert!(catalog
        .describe_table("no_such_table")
        .await
        .is_empty());
}

#[tokio::test]
#[ignore]
async fn live_analysis_completes() {
    let analysis = analyze(&source())
        .await
        .unwrap();
    assert_eq!(
        analysis
            .collected
            .status(ComponentKind::InboundRoutes),
        Some(&CollectionStatus::Collected)
    );

    let lines = CallFlowReport::new(&analysis.model)
        .render(&FlowRenderer::new(RenderOptions::plain()), None);
    assert!(!lines.is_empty());
}

#[tokio::test]
#[ignore]
async fn live_wrong_password_is_connection_error() {
    let source = MysqlSource::new(
        MysqlOptions::new()
            .user("callflow_nobody")
            .password(Some("wrong".into())),
    );
    let err = source
        .list_tables()
        .await
        .unwrap_err();
    assert!(err.is_connection_error(), "unexpected error: {}", err);
}
