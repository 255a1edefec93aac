//! Turn destination references into call-flow trees.
//!
//! Each destination kind has one handler that looks up its record and
//! returns an [`Expansion`]: the node's kind and label plus the children to
//! attach. Handlers never recurse themselves. The driver in
//! [`DestinationResolver::resolve_from`] owns recursion and is the only place
//! that checks the visited set and the depth ceiling, so every branch
//! terminates no matter how the routing data loops.

use std::collections::BTreeSet;
use tracing::{debug, trace};

use crate::{
    constants::MAX_RESOLVE_DEPTH,
    describe::{branch_labels, describe_caller_id_rule},
    destination::{Destination, DestinationKind},
    model::{GroupMember, PbxModel},
    node::{Branch, CallFlowNode, NodeKind},
};

/// Resolver settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Branches deeper than this end in a depth-limit leaf
    pub max_depth: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_RESOLVE_DEPTH,
        }
    }
}

/// A child a handler wants attached
#[derive(Debug, Clone)]
pub enum Child {
    /// Resolve this destination and attach the result
    Follow { edge: String, target: String },
    /// Attach this node as-is
    Leaf { edge: String, node: CallFlowNode },
}

impl Child {
    fn follow(edge: impl Into<String>, target: impl Into<String>) -> Self {
        Child::Follow {
            edge: edge.into(),
            target: target.into(),
        }
    }

    fn leaf(edge: impl Into<String>, node: CallFlowNode) -> Self {
        Child::Leaf {
            edge: edge.into(),
            node,
        }
    }
}

/// What one handler produced for one destination
#[derive(Debug, Clone)]
pub struct Expansion {
    pub kind: NodeKind,
    pub label: String,
    pub children: Vec<Child>,
}

impl Expansion {
    fn leaf(kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn with_children(kind: NodeKind, label: impl Into<String>, children: Vec<Child>) -> Self {
        Self {
            kind,
            label: label.into(),
            children,
        }
    }

    /// Add a follow-up child unless the destination field is blank
    fn follow_if_set(&mut self, edge: &str, target: &str) {
        if !target
            .trim()
            .is_empty()
        {
            self.children
                .push(Child::follow(edge, target.trim()));
        }
    }
}

fn not_found(what: &str, id: &str) -> String {
    format!("{} {} (details not found)", what, id)
}

/// `Name: detail` when the detail is set, otherwise `Name`
fn titled(head: String, detail: &str) -> String {
    if detail.is_empty() {
        head
    } else {
        format!("{}: {}", head, detail)
    }
}

/// Resolves destinations against a collected PBX model
pub struct DestinationResolver<'a> {
    model: &'a PbxModel,
    options: ResolverOptions,
}

impl<'a> DestinationResolver<'a> {
    pub fn new(model: &'a PbxModel) -> Self {
        Self::with_options(model, ResolverOptions::default())
    }

    pub fn with_options(model: &'a PbxModel, options: ResolverOptions) -> Self {
        Self { model, options }
    }

    /// Resolve a destination from the top of a route
    pub fn resolve(&self, raw: &str) -> CallFlowNode {
        self.resolve_from(raw, &BTreeSet::new(), 0)
    }

    /// Recursive driver.
    ///
    /// `visited` holds the references already taken on the path from the
    /// root to here. Each child gets its own copy, so sibling branches never
    /// see each other's history.
    pub fn resolve_from(&self, raw: &str, visited: &BTreeSet<String>, depth: usize) -> CallFlowNode {
        let key = raw.trim();

        if visited.contains(key) {
            debug!("[RESOLVE] loop at {} (depth {})", key, depth);
            return CallFlowNode::leaf(NodeKind::Loop, format!("Loop detected: back to {}", key));
        }
        if depth > self.options.max_depth {
            debug!("[RESOLVE] depth limit at {} (depth {})", key, depth);
            return CallFlowNode::leaf(
                NodeKind::Loop,
                format!("Depth limit reached ({}): {}", self.options.max_depth, key),
            );
        }

        let destination = Destination::parse(key);
        trace!(
            "[RESOLVE] {} -> {} id={:?}",
            key,
            destination.kind,
            destination.id
        );
        let expansion = self.expand(&destination);

        let mut path = visited.clone();
        path.insert(key.to_string());

        let children = expansion
            .children
            .into_iter()
            .map(|child| match child {
                Child::Follow { edge, target } => Branch {
                    edge,
                    node: self.resolve_from(&target, &path, depth + 1),
                },
                Child::Leaf { edge, node } => Branch { edge, node },
            })
            .collect();

        CallFlowNode {
            kind: expansion.kind,
            label: expansion.label,
            children,
        }
    }

    /// Dispatch one destination to its handler
    pub fn expand(&self, dest: &Destination) -> Expansion {
        if dest
            .raw
            .is_empty()
        {
            return Expansion::leaf(NodeKind::Unknown, "No destination configured");
        }

        match dest.kind {
            DestinationKind::TimeCondition => self.time_condition(dest),
            DestinationKind::RingGroup => self.ring_group(dest),
            DestinationKind::Ivr => self.ivr(dest),
            DestinationKind::Extension => self.extension(dest),
            DestinationKind::Voicemail => self.voicemail(dest),
            DestinationKind::Queue => self.queue(dest),
            DestinationKind::FollowMe => self.follow_me(dest),
            DestinationKind::Conference => self.conference(dest),
            DestinationKind::Announcement => self.announcement(dest),
            DestinationKind::SetCallerId => self.set_caller_id(dest),
            DestinationKind::MiscDestination => self.misc_destination(dest),
            DestinationKind::Park => Expansion::leaf(NodeKind::Park, "Call Parking"),
            DestinationKind::Hangup => self.hangup(dest),
            DestinationKind::Unknown => Expansion::leaf(
                NodeKind::Unknown,
                format!("Custom Destination: {}", dest.raw),
            ),
        }
    }

    fn time_condition(&self, dest: &Destination) -> Expansion {
        let Some(tc) = self
            .model
            .time_condition(&dest.id)
        else {
            return Expansion::leaf(NodeKind::TimeCondition, not_found("Time Condition", &dest.id));
        };

        let labels = branch_labels(tc);
        let name = if tc
            .name
            .is_empty()
        {
            format!("#{}", tc.id)
        } else {
            tc.name
                .clone()
        };
        let mut expansion = Expansion::leaf(
            NodeKind::TimeCondition,
            format!("Time Condition: {}", name),
        );
        expansion.follow_if_set(labels.matched, &tc.true_dest);
        expansion.follow_if_set(labels.unmatched, &tc.false_dest);
        expansion
    }

    fn ring_group(&self, dest: &Destination) -> Expansion {
        let Some(group) = self
            .model
            .ring_group(&dest.id)
        else {
            return Expansion::leaf(NodeKind::RingGroup, not_found("Ring Group", &dest.id));
        };

        let mut details = Vec::new();
        if !group
            .strategy
            .is_empty()
        {
            details.push(group.strategy.clone());
        }
        if !group
            .ring_time
            .is_empty()
        {
            details.push(format!("{}s", group.ring_time));
        }
        details.push(format!("{} members", group.members.len()));

        let label = format!(
            "{} ({})",
            titled(format!("Ring Group {}", group.number), &group.description),
            details.join(", ")
        );

        let mut expansion = Expansion::with_children(
            NodeKind::RingGroup,
            label,
            group
                .members
                .iter()
                .map(|member| Child::leaf("Rings", self.member_node(member)))
                .collect(),
        );
        expansion.follow_if_set("No Answer", &group.failover);
        expansion
    }

    fn member_node(&self, member: &GroupMember) -> CallFlowNode {
        match member {
            GroupMember::Extension(ext) => {
                CallFlowNode::leaf(NodeKind::Extension, self.extension_label(ext))
            }
            GroupMember::External(number) => {
                CallFlowNode::leaf(NodeKind::Extension, format!("External {}", number))
            }
        }
    }

    fn ivr(&self, dest: &Destination) -> Expansion {
        let Some(menu) = self
            .model
            .ivr_menu(&dest.id)
        else {
            return Expansion::leaf(NodeKind::Ivr, not_found("IVR Menu", &dest.id));
        };

        let detail = if menu
            .name
            .is_empty()
        {
            &menu.description
        } else {
            &menu.name
        };
        let mut expansion = Expansion::with_children(
            NodeKind::Ivr,
            titled(format!("IVR Menu {}", menu.id), detail),
            self.model
                .ivr_options(&menu.id)
                .filter(|opt| {
                    !opt.destination
                        .is_empty()
                })
                .map(|opt| Child::follow(format!("Press {}", opt.selection), &opt.destination))
                .collect(),
        );
        expansion.follow_if_set("Timeout", &menu.timeout_dest);
        expansion.follow_if_set("Invalid", &menu.invalid_dest);
        expansion
    }

    fn extension_label(&self, ext: &str) -> String {
        match self
            .model
            .extension(ext)
        {
            Some(found) if !found.name.is_empty() => format!("Extension {} ({})", ext, found.name),
            _ => format!("Extension {}", ext),
        }
    }

    fn extension(&self, dest: &Destination) -> Expansion {
        Expansion::leaf(NodeKind::Extension, self.extension_label(&dest.id))
    }

    fn voicemail(&self, dest: &Destination) -> Expansion {
        let owner = match self
            .model
            .extension(&dest.id)
        {
            Some(found) if !found.name.is_empty() => format!(" ({})", found.name),
            _ => String::new(),
        };
        let greeting = dest
            .voicemail_greeting()
            .unwrap_or("default");
        Expansion::leaf(
            NodeKind::Voicemail,
            format!("Voicemail {}{} [{} greeting]", dest.id, owner, greeting),
        )
    }

    fn queue(&self, dest: &Destination) -> Expansion {
        let label = match self
            .model
            .queue(&dest.id)
        {
            Some(queue) => {
                let head = titled(format!("Queue {}", queue.extension), &queue.description);
                if queue
                    .strategy
                    .is_empty()
                {
                    head
                } else {
                    format!("{} (strategy {})", head, queue.strategy)
                }
            }
            None => not_found("Queue", &dest.id),
        };
        Expansion::leaf(NodeKind::Queue, label)
    }

    fn follow_me(&self, dest: &Destination) -> Expansion {
        let label = match self
            .model
            .follow_me(&dest.id)
        {
            Some(fm) => {
                let owner = match self
                    .model
                    .extension(&fm.group)
                {
                    Some(ext) if !ext.name.is_empty() => format!(" ({})", ext.name),
                    _ => String::new(),
                };
                let strategy = if fm
                    .strategy
                    .is_empty()
                {
                    String::new()
                } else {
                    format!("{}, ", fm.strategy)
                };
                format!(
                    "Follow Me {}{} ({}{} numbers)",
                    fm.group,
                    owner,
                    strategy,
                    fm.members.len()
                )
            }
            None => not_found("Follow Me", &dest.id),
        };
        Expansion::leaf(NodeKind::FollowMe, label)
    }

    fn conference(&self, dest: &Destination) -> Expansion {
        let label = match self
            .model
            .conference(&dest.id)
        {
            Some(conf) => titled(format!("Conference {}", conf.extension), &conf.description),
            None => not_found("Conference", &dest.id),
        };
        Expansion::leaf(NodeKind::Conference, label)
    }

    fn announcement(&self, dest: &Destination) -> Expansion {
        let label = match self
            .model
            .announcement(&dest.id)
        {
            Some(ann) => {
                let head = titled(format!("Announcement {}", ann.id), &ann.description);
                if ann
                    .filename
                    .is_empty()
                {
                    head
                } else {
                    format!("{} (file: {})", head, ann.filename)
                }
            }
            None => not_found("Announcement", &dest.id),
        };
        Expansion::leaf(NodeKind::Announcement, label)
    }

    fn set_caller_id(&self, dest: &Destination) -> Expansion {
        let Some(rule) = self
            .model
            .caller_id_rule(&dest.id)
        else {
            return Expansion::leaf(NodeKind::SetCallerId, not_found("Set Caller ID", &dest.id));
        };

        let head = titled(format!("Set Caller ID {}", rule.id), &rule.description);
        let mut expansion = Expansion::leaf(
            NodeKind::SetCallerId,
            format!("{} [{}]", head, describe_caller_id_rule(rule)),
        );
        expansion.follow_if_set("Then", &rule.destination);
        expansion
    }

    fn misc_destination(&self, dest: &Destination) -> Expansion {
        let Some(misc) = self
            .model
            .misc_destination(&dest.id)
        else {
            return Expansion::leaf(
                NodeKind::MiscDestination,
                not_found("Misc Destination", &dest.id),
            );
        };

        let label = titled(format!("Misc Destination {}", misc.id), &misc.description);
        let mut expansion = Expansion::leaf(NodeKind::MiscDestination, label);
        if !misc
            .dial
            .is_empty()
        {
            let node = if self
                .model
                .extension(&misc.dial)
                .is_some()
            {
                CallFlowNode::leaf(NodeKind::Extension, self.extension_label(&misc.dial))
            } else {
                CallFlowNode::leaf(NodeKind::Extension, format!("External {}", misc.dial))
            };
            expansion
                .children
                .push(Child::leaf("Dials", node));
        }
        expansion
    }

    fn hangup(&self, dest: &Destination) -> Expansion {
        // app-blackhole,<type>: the identifier names the treatment
        let treatment = if dest
            .context
            .eq_ignore_ascii_case("app-blackhole")
        {
            dest.id
                .to_ascii_lowercase()
        } else {
            dest.context
                .to_ascii_lowercase()
        };
        let label = match treatment.as_str() {
            t if t.contains("busy") => "Busy Signal",
            t if t.contains("congestion") => "Congestion",
            t if t.contains("zapateller") => "Play SIT Tone (Zapateller)",
            t if t.contains("musiconhold") => "Put Caller on Hold",
            t if t.contains("ring") => "Play Ringtones Forever",
            t if t.contains("no-service") => "Play No Service Message",
            _ => "Hang Up",
        };
        Expansion::leaf(NodeKind::Hangup, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Extension, TimeCondition, TimeConditionMode};

    fn model_with_extension() -> PbxModel {
        PbxModel {
            extensions: vec![Extension {
                extension: "410".into(),
                name: "Alice".into(),
                voicemail: "default".into(),
                outbound_cid: String::new(),
            }],
            ..PbxModel::default()
        }
    }

    #[test]
    fn extension_leaf_uses_name() {
        let model = model_with_extension();
        let node = DestinationResolver::new(&model).resolve("ext-local,410,1");
        assert_eq!(node.kind, NodeKind::Extension);
        assert_eq!(node.label, "Extension 410 (Alice)");
        assert!(node.is_leaf());
    }

    #[test]
    fn missing_extension_has_no_suffix() {
        let model = PbxModel::default();
        let node = DestinationResolver::new(&model).resolve("ext-local,410");
        assert_eq!(node.label, "Extension 410");
        assert_eq!(node.kind, NodeKind::Extension);
    }

    #[test]
    fn blackhole_treatments() {
        let model = PbxModel::default();
        let resolver = DestinationResolver::new(&model);
        assert_eq!(resolver.resolve("app-blackhole,hangup,1").label, "Hang Up");
        assert_eq!(resolver.resolve("app-blackhole,busy,1").label, "Busy Signal");
        assert_eq!(resolver.resolve("app-blackhole,congestion,1").label, "Congestion");
        assert_eq!(
            resolver
                .resolve("app-blackhole,hangup,1")
                .kind,
            NodeKind::Hangup
        );
    }

    #[test]
    fn voicemail_label_includes_greeting() {
        let model = model_with_extension();
        let node = DestinationResolver::new(&model).resolve("ext-local,vmb410,1");
        assert_eq!(node.kind, NodeKind::Voicemail);
        assert_eq!(node.label, "Voicemail 410 (Alice) [busy greeting]");
    }

    #[test]
    fn self_referencing_time_condition_terminates() {
        let model = PbxModel {
            time_conditions: vec![TimeCondition {
                id: "1".into(),
                name: "Loopy".into(),
                mode: TimeConditionMode::TimeGroup,
                true_dest: "timeconditions,1,1".into(),
                false_dest: "timeconditions,1,1".into(),
                time_group: String::new(),
            }],
            ..PbxModel::default()
        };
        let node = DestinationResolver::new(&model).resolve("timeconditions,1,1");
        assert_eq!(node.children.len(), 2);
        for branch in &node.children {
            assert_eq!(branch.node.kind, NodeKind::Loop);
        }
    }

    #[test]
    fn unknown_context_is_flagged_with_raw_text() {
        let model = PbxModel::default();
        let node = DestinationResolver::new(&model).resolve("custom-nightmode,s,1");
        assert_eq!(node.kind, NodeKind::Unknown);
        assert_eq!(node.label, "Custom Destination: custom-nightmode,s,1");
    }

    #[test]
    fn empty_destination_is_a_leaf() {
        let model = PbxModel::default();
        let node = DestinationResolver::new(&model).resolve("   ");
        assert_eq!(node.kind, NodeKind::Unknown);
        assert_eq!(node.label, "No destination configured");
    }
}
