//! Text rendering of resolved call flows.
//!
//! Output is a list of lines so callers decide where it goes (terminal,
//! file). Colors are applied per line after truncation, so widths are always
//! measured on plain text.

use colored::{ColoredString, Colorize};

use crate::{
    model::InboundRoute,
    node::{CallFlowNode, NodeKind},
};

/// Rendering settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Apply ANSI colors per node kind
    pub color: bool,
    /// Use `|--` style connectors instead of box drawing
    pub ascii: bool,
    /// Truncate lines longer than this many characters
    pub max_width: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            ascii: false,
            max_width: None,
        }
    }
}

impl RenderOptions {
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::default()
        }
    }
}

/// Tree branch characters
struct TreeChars {
    pipe: &'static str,
    branch: &'static str,
    last: &'static str,
    space: &'static str,
}

impl TreeChars {
    const UNICODE: TreeChars = TreeChars {
        pipe: "\u{2502}   ",
        branch: "\u{251c}\u{2500}\u{2500} ",
        last: "\u{2514}\u{2500}\u{2500} ",
        space: "    ",
    };

    const ASCII: TreeChars = TreeChars {
        pipe: "|   ",
        branch: "|-- ",
        last: "`-- ",
        space: "    ",
    };
}

const ELLIPSIS: &str = "...";

/// Cut `text` to `width` characters, ending in `...` when shortened
pub fn truncate(text: &str, width: usize) -> String {
    if text
        .chars()
        .count()
        <= width
    {
        return text.to_string();
    }
    if width <= ELLIPSIS.len() {
        return ELLIPSIS[..width].to_string();
    }
    let kept: String = text
        .chars()
        .take(width - ELLIPSIS.len())
        .collect();
    format!("{}{}", kept, ELLIPSIS)
}

/// Renders call-flow trees and route headers
pub struct FlowRenderer {
    options: RenderOptions,
}

impl FlowRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn chars(&self) -> &'static TreeChars {
        if self.options.ascii {
            &TreeChars::ASCII
        } else {
            &TreeChars::UNICODE
        }
    }

    fn fit(&self, line: &str) -> String {
        match self.options.max_width {
            Some(width) => truncate(line, width),
            None => line.to_string(),
        }
    }

    fn paint(&self, text: &str, kind: NodeKind) -> String {
        if !self.options.color {
            return text.to_string();
        }
        let colored: ColoredString = match kind {
            NodeKind::TimeCondition => text.yellow(),
            NodeKind::RingGroup | NodeKind::FollowMe => text.cyan(),
            NodeKind::Ivr => text.magenta(),
            NodeKind::Extension | NodeKind::Voicemail => text.green(),
            NodeKind::Queue | NodeKind::Conference => text.blue(),
            NodeKind::Announcement | NodeKind::SetCallerId | NodeKind::MiscDestination => {
                text.white()
            }
            NodeKind::Park => text.normal(),
            NodeKind::Hangup => text.red(),
            NodeKind::Loop => text
                .red()
                .bold(),
            NodeKind::Unknown => text.dimmed(),
        };
        colored.to_string()
    }

    /// Header lines plus the tree for one inbound route
    pub fn render_route(&self, route: &InboundRoute, root: &CallFlowNode) -> Vec<String> {
        let header = format!("DID: {}", route.did_label());
        let mut lines = vec![if self.options.color {
            self.fit(&header)
                .bold()
                .to_string()
        } else {
            self.fit(&header)
        }];

        if !route
            .description
            .is_empty()
        {
            lines.push(self.fit(&format!("Description: {}", route.description)));
        }
        if !route
            .cid
            .is_empty()
        {
            lines.push(self.fit(&format!("Caller ID filter: {}", route.cid)));
        }
        if !route
            .cid_prefix
            .is_empty()
        {
            lines.push(self.fit(&format!("CID name prefix: {}", route.cid_prefix)));
        }

        lines.extend(self.render_tree(root));
        lines
    }

    /// Message for a DID that has no inbound route
    pub fn render_missing_route(&self, did: &str) -> Vec<String> {
        let line = self.fit(&format!("No inbound route found for DID {}", did));
        vec![if self.options.color {
            line.red()
                .to_string()
        } else {
            line
        }]
    }

    /// Root line followed by its subtree, document order
    pub fn render_tree(&self, root: &CallFlowNode) -> Vec<String> {
        let mut lines = vec![self.paint(&self.fit(&root.label), root.kind)];
        self.render_children(root, "", &mut lines);
        lines
    }

    fn render_children(&self, node: &CallFlowNode, prefix: &str, lines: &mut Vec<String>) {
        let chars = self.chars();
        let count = node
            .children
            .len();

        for (i, branch) in node
            .children
            .iter()
            .enumerate()
        {
            let is_last = i + 1 == count;
            let connector = if is_last { chars.last } else { chars.branch };
            let plain = self.fit(&format!(
                "{}{}[{}] {}",
                prefix, connector, branch.edge, branch.node.label
            ));
            lines.push(self.paint_line(&plain, prefix.len() + connector.len(), branch.node.kind));

            let child_prefix = format!(
                "{}{}",
                prefix,
                if is_last { chars.space } else { chars.pipe }
            );
            self.render_children(&branch.node, &child_prefix, lines);
        }
    }

    /// Color only the part after the connector
    fn paint_line(&self, line: &str, split_at: usize, kind: NodeKind) -> String {
        if !self.options.color {
            return line.to_string();
        }
        match (line.get(..split_at), line.get(split_at..)) {
            (Some(head), Some(tail)) => format!("{}{}", head, self.paint(tail, kind)),
            _ => self.paint(line, kind),
        }
    }
}

impl Default for FlowRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}
