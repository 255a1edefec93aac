//! Destination resolution and rendering over collected data

mod mock_pbx;

use freepbx_callflow::{
    analyze, model::IvrOption, CallFlowNode, CallFlowReport, CollectedData, ComponentKind,
    ComponentRecord, DestinationResolver, FlowRenderer, NodeKind, PbxModel, RenderOptions,
    ResolverOptions,
};
use mock_pbx::{chained_time_conditions, modern_pbx, MAIN_DID, NIGHT_DID};

async fn modern_model() -> PbxModel {
    analyze(&modern_pbx())
        .await
        .unwrap()
        .model
}

fn model_from(records: Vec<(ComponentKind, Vec<ComponentRecord>)>) -> PbxModel {
    let data = records
        .into_iter()
        .fold(CollectedData::new(), |data, (kind, rows)| data.with_records(kind, rows));
    PbxModel::from_collected(&data)
}

fn labels(node: &CallFlowNode) -> Vec<String> {
    let mut labels = Vec::new();
    node.walk(&mut |n| labels.push(n.label.clone()));
    labels
}

#[tokio::test]
async fn business_hours_scenario_renders_both_branches() {
    let model = modern_model().await;
    let lines = CallFlowReport::new(&model).render(&FlowRenderer::new(RenderOptions::plain()), Some(MAIN_DID));

    assert_eq!(
        lines,
        vec![
            "DID: 2485550100",
            "Description: Main Line",
            "Time Condition: Business Hours Check",
            "├── [Business Hours] Ring Group 10: Sales (ringall, 20s, 3 members)",
            "│   ├── [Rings] Extension 410 (Alice)",
            "│   ├── [Rings] Extension 411 (Bob)",
            "│   ├── [Rings] Extension 412",
            "│   └── [No Answer] Voicemail 410 (Alice) [unavailable greeting]",
            "└── [After Hours] IVR Menu 2: Main Menu",
            "    ├── [Press 1] Extension 410 (Alice)",
            "    ├── [Press 2] Queue 400: Support (strategy rrmemory)",
            "    └── [Timeout] Announcement 3: Closed message (file: custom/closed)",
        ]
    );
}

#[tokio::test]
async fn caller_id_rule_chains_into_misc_destination() {
    let model = modern_model().await;
    let lines = CallFlowReport::new(&model).render(&FlowRenderer::new(RenderOptions::plain()), Some(NIGHT_DID));

    assert_eq!(
        lines,
        vec![
            "DID: 5550199",
            "Description: Night line",
            "Set Caller ID 1: Night prefix [Prepend 'Night: ' to caller's name; Keep caller's number]",
            "└── [Then] Misc Destination 1: On-call cell",
            "    └── [Dials] External 5551234",
        ]
    );
}

#[tokio::test]
async fn all_routes_render_in_collected_order() {
    let model = modern_model().await;
    let lines = CallFlowReport::new(&model).render(&FlowRenderer::new(RenderOptions::plain()), None);

    assert_eq!(lines[0], "DID: Any DID");
    assert_eq!(lines[2], "Hang Up");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "DID: 2485550100");
    assert!(lines.contains(&"DID: 5550199".to_string()));
}

#[tokio::test]
async fn unknown_did_renders_message() {
    let model = modern_model().await;
    let lines = CallFlowReport::new(&model).render(&FlowRenderer::new(RenderOptions::plain()), Some("18005550000"));
    assert_eq!(lines, vec!["No inbound route found for DID 18005550000"]);
}

#[tokio::test]
async fn follow_me_and_conference_leaves() {
    let model = modern_model().await;
    let resolver = DestinationResolver::new(&model);

    let node = resolver.resolve("ext-findmefollow,FM410,1");
    assert_eq!(node.kind, NodeKind::FollowMe);
    assert_eq!(node.label, "Follow Me 410 (Alice) (ringallv2, 2 numbers)");

    let node = resolver.resolve("ext-meetme,800,1");
    assert_eq!(node.kind, NodeKind::Conference);
    assert_eq!(node.label, "Conference 800: Staff bridge");
    assert!(node.is_leaf());
}

#[test]
fn extension_leaf_with_and_without_record() {
    let model = model_from(vec![(
        ComponentKind::Extensions,
        vec![ComponentRecord::with_fields([("extension", "410"), ("name", "Alice")])],
    )]);
    let node = DestinationResolver::new(&model).resolve("ext-local,410");
    assert_eq!(node.kind, NodeKind::Extension);
    assert_eq!(node.label, "Extension 410 (Alice)");
    assert!(node.is_leaf());

    let empty = PbxModel::default();
    let node = DestinationResolver::new(&empty).resolve("ext-local,410");
    assert_eq!(node.label, "Extension 410");
    assert!(node.is_leaf());
}

#[test]
fn time_condition_branches_use_name_keywords() {
    let model = model_from(vec![(
        ComponentKind::TimeConditions,
        vec![ComponentRecord::with_fields([
            ("id", "14"),
            ("name", "US Holidays"),
            ("mode", "calendar-group"),
            ("true_dest", "app-announcement-1,s,1"),
            ("false_dest", "ext-local,410,1"),
        ])],
    )]);
    let node = DestinationResolver::new(&model).resolve("timeconditions,14");

    assert_eq!(node.kind, NodeKind::TimeCondition);
    assert_eq!(node.label, "Time Condition: US Holidays");
    let edges: Vec<&str> = node
        .children
        .iter()
        .map(|b| b.edge.as_str())
        .collect();
    assert_eq!(edges, vec!["IS Holiday", "NOT Holiday"]);
    assert_eq!(
        node.child("IS Holiday")
            .map(|n| n.label.as_str()),
        Some("Announcement 1 (details not found)")
    );
}

#[test]
fn unresolvable_ivr_is_a_not_found_leaf() {
    let model = model_from(vec![(
        ComponentKind::TimeConditions,
        vec![ComponentRecord::with_fields([
            ("id", "5"),
            ("name", "Office"),
            ("true_dest", "ext-local,410,1"),
            ("false_dest", "ivr-999"),
        ])],
    )]);
    let node = DestinationResolver::new(&model).resolve("timeconditions,5");

    let after_hours = node
        .child("After Hours")
        .unwrap();
    assert_eq!(after_hours.kind, NodeKind::Ivr);
    assert_eq!(after_hours.label, "IVR Menu 999 (details not found)");
    assert!(after_hours.is_leaf());
}

#[test]
fn ivr_options_keep_collected_order() {
    let mut model = model_from(vec![(
        ComponentKind::IvrMenus,
        vec![ComponentRecord::with_fields([("id", "3"), ("name", "Lobby")])],
    )]);
    for (selection, dest) in [("9", "app-blackhole,hangup,1"), ("1", "ext-local,410,1"), ("0", "ext-local,200,1")] {
        model
            .ivr_options
            .push(IvrOption {
                ivr_id: "3".into(),
                selection: selection.into(),
                destination: dest.into(),
            });
    }
    let node = DestinationResolver::new(&model).resolve("ivr-3,s,1");

    let edges: Vec<&str> = node
        .children
        .iter()
        .map(|b| b.edge.as_str())
        .collect();
    assert_eq!(edges, vec!["Press 9", "Press 1", "Press 0"]);
}

#[test]
fn ring_group_failing_over_to_itself_terminates() {
    let model = model_from(vec![(
        ComponentKind::RingGroups,
        vec![ComponentRecord::with_fields([
            ("group", "20"),
            ("description", "Support"),
            ("strategy", "hunt"),
            ("members", "410-411"),
            ("failover", "ext-group,20,1"),
        ])],
    )]);
    let node = DestinationResolver::new(&model).resolve("ext-group,20,1");

    assert_eq!(node.kind, NodeKind::RingGroup);
    let failover = node
        .child("No Answer")
        .unwrap();
    assert_eq!(failover.kind, NodeKind::Loop);
    assert!(failover.is_leaf());
    assert_eq!(failover.label, "Loop detected: back to ext-group,20,1");
    assert_eq!(node.size(), 4);
}

#[test]
fn mutual_cycle_between_time_conditions_terminates() {
    let model = model_from(vec![(
        ComponentKind::TimeConditions,
        vec![
            ComponentRecord::with_fields([
                ("id", "1"),
                ("true_dest", "timeconditions,2,1"),
                ("false_dest", "app-blackhole,hangup,1"),
            ]),
            ComponentRecord::with_fields([
                ("id", "2"),
                ("true_dest", "timeconditions,1,1"),
                ("false_dest", "timeconditions,1,1"),
            ]),
        ],
    )]);
    let node = DestinationResolver::new(&model).resolve("timeconditions,1,1");

    let second = node
        .child("Condition True")
        .unwrap();
    assert_eq!(second.label, "Time Condition: #2");
    for branch in &second.children {
        assert_eq!(branch.node.kind, NodeKind::Loop);
    }
}

#[test]
fn sibling_branches_do_not_share_history() {
    // both branches reach extension 410; neither is a loop
    let model = model_from(vec![(
        ComponentKind::TimeConditions,
        vec![ComponentRecord::with_fields([
            ("id", "1"),
            ("true_dest", "ext-local,410,1"),
            ("false_dest", "ext-local,410,1"),
        ])],
    )]);
    let node = DestinationResolver::new(&model).resolve("timeconditions,1,1");
    assert_eq!(node.children.len(), 2);
    for branch in &node.children {
        assert_eq!(branch.node.kind, NodeKind::Extension);
    }
}

#[tokio::test]
async fn deep_chain_stops_at_depth_ceiling() {
    let analysis = analyze(&chained_time_conditions(15))
        .await
        .unwrap();
    let options = ResolverOptions::default();
    let node = DestinationResolver::with_options(&analysis.model, options).resolve("timeconditions,1,1");

    // ceiling + 1 condition levels, then the depth-limit leaf
    assert_eq!(node.depth(), options.max_depth + 2);

    let mut deepest = &node;
    while let Some(next) = deepest.child("Condition True") {
        deepest = next;
    }
    assert_eq!(deepest.kind, NodeKind::Loop);
    assert!(deepest
        .label
        .starts_with("Depth limit reached"));
    assert!(labels(&node)
        .iter()
        .all(|l| !l.contains("timeconditions,13")));
}

#[test]
fn custom_depth_ceiling() {
    let records = (1..=5)
        .map(|i| {
            let id = i.to_string();
            let next = format!("timeconditions,{},1", i + 1);
            ComponentRecord::with_fields([
                ("id", id.as_str()),
                ("true_dest", next.as_str()),
            ])
        })
        .collect();
    let model = model_from(vec![(ComponentKind::TimeConditions, records)]);
    let node = DestinationResolver::with_options(&model, ResolverOptions { max_depth: 2 })
        .resolve("timeconditions,1,1");
    assert_eq!(node.depth(), 4);
}

#[test]
fn unknown_destination_keeps_raw_text() {
    let model = PbxModel::default();
    let node = DestinationResolver::new(&model).resolve("from-internal-custom,555,1");
    assert_eq!(node.kind, NodeKind::Unknown);
    assert_eq!(node.label, "Custom Destination: from-internal-custom,555,1");
}

#[test]
fn resolved_tree_serializes() {
    let model = model_from(vec![(
        ComponentKind::Extensions,
        vec![ComponentRecord::with_fields([("extension", "410"), ("name", "Alice")])],
    )]);
    let node = DestinationResolver::new(&model).resolve("ext-local,410,1");
    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(value["kind"], "extension");
    assert!(value
        .get("children")
        .is_none());
}
