//! Resolved call-flow tree.

use serde::Serialize;
use std::fmt;

/// What a node in the call flow represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    TimeCondition,
    RingGroup,
    Ivr,
    Extension,
    Voicemail,
    Queue,
    FollowMe,
    Conference,
    Announcement,
    MiscDestination,
    SetCallerId,
    Park,
    Hangup,
    /// Already on this branch, or the branch is too deep
    Loop,
    Unknown,
}

impl NodeKind {
    /// Loop and hangup nodes never have children
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeKind::Loop | NodeKind::Hangup)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::TimeCondition => "time_condition",
            NodeKind::RingGroup => "ring_group",
            NodeKind::Ivr => "ivr",
            NodeKind::Extension => "extension",
            NodeKind::Voicemail => "voicemail",
            NodeKind::Queue => "queue",
            NodeKind::FollowMe => "follow_me",
            NodeKind::Conference => "conference",
            NodeKind::Announcement => "announcement",
            NodeKind::MiscDestination => "misc_destination",
            NodeKind::SetCallerId => "set_callerid",
            NodeKind::Park => "park",
            NodeKind::Hangup => "hangup",
            NodeKind::Loop => "loop",
            NodeKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Labeled edge to a child node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub edge: String,
    pub node: CallFlowNode,
}

/// One resolved destination and everything reachable from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallFlowNode {
    pub kind: NodeKind,
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Branch>,
}

impl CallFlowNode {
    pub fn leaf(kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children
            .is_empty()
    }

    /// Child reached through `edge`, if any
    pub fn child(&self, edge: &str) -> Option<&CallFlowNode> {
        self.children
            .iter()
            .find(|b| b.edge == edge)
            .map(|b| &b.node)
    }

    /// Number of levels, counting this node
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|b| {
                b.node
                    .depth()
            })
            .max()
            .unwrap_or(0)
    }

    /// Total node count
    pub fn size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|b| {
                b.node
                    .size()
            })
            .sum::<usize>()
    }

    /// Depth-first, document-order walk
    pub fn walk(&self, visit: &mut impl FnMut(&CallFlowNode)) {
        visit(self);
        for branch in &self.children {
            branch
                .node
                .walk(visit);
        }
    }
}
