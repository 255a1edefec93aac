//! Parsing of FreePBX destination references.
//!
//! A destination is `context` or `context,identifier[,extra...]`, e.g.
//! `timeconditions,14,1`, `ext-local,vmu410,1` or `ivr-3,s,1`. Some contexts
//! carry the identifier as a dash suffix (`ivr-3`, `app-announcement-2`), in
//! which case the part after the first comma is a dialplan extension such as
//! `s` and not the identifier.

use std::fmt;

/// What a destination points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationKind {
    TimeCondition,
    RingGroup,
    Ivr,
    Extension,
    Voicemail,
    Queue,
    FollowMe,
    Conference,
    Announcement,
    SetCallerId,
    MiscDestination,
    Park,
    Hangup,
    Unknown,
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DestinationKind::TimeCondition => "time condition",
            DestinationKind::RingGroup => "ring group",
            DestinationKind::Ivr => "ivr",
            DestinationKind::Extension => "extension",
            DestinationKind::Voicemail => "voicemail",
            DestinationKind::Queue => "queue",
            DestinationKind::FollowMe => "follow me",
            DestinationKind::Conference => "conference",
            DestinationKind::Announcement => "announcement",
            DestinationKind::SetCallerId => "set caller id",
            DestinationKind::MiscDestination => "misc destination",
            DestinationKind::Park => "park",
            DestinationKind::Hangup => "hangup",
            DestinationKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// How a context name is recognized
#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// Whole context equals the text; identifier follows the first comma
    Exact(&'static str),
    /// Context starts with the text; a non-empty remainder is the identifier
    DashSuffix(&'static str),
    /// Context starts with the text; identifier follows the first comma
    Prefix(&'static str),
}

impl Pattern {
    /// `Some(suffix id)` on match; the inner option is the dash-suffix id
    fn matches(&self, context: &str) -> Option<Option<String>> {
        match self {
            Pattern::Exact(text) => (context == *text).then_some(None),
            Pattern::DashSuffix(text) => {
                let rest = context.strip_prefix(text)?;
                if rest.is_empty() {
                    None
                } else {
                    Some(Some(rest.to_string()))
                }
            }
            Pattern::Prefix(text) => context
                .starts_with(text)
                .then_some(None),
        }
    }
}

/// Recognized contexts, checked in order; first match wins
const CONTEXTS: &[(Pattern, DestinationKind)] = &[
    (Pattern::Exact("timeconditions"), DestinationKind::TimeCondition),
    (Pattern::DashSuffix("tc-"), DestinationKind::TimeCondition),
    (Pattern::Exact("ext-group"), DestinationKind::RingGroup),
    (Pattern::DashSuffix("rg-"), DestinationKind::RingGroup),
    (Pattern::Prefix("ringgr"), DestinationKind::RingGroup),
    (Pattern::Exact("ivr"), DestinationKind::Ivr),
    (Pattern::DashSuffix("ivr-"), DestinationKind::Ivr),
    (Pattern::Exact("from-did-direct"), DestinationKind::Extension),
    (Pattern::Exact("ext-local"), DestinationKind::Extension),
    (Pattern::Exact("ext-queues"), DestinationKind::Queue),
    (Pattern::Exact("queue"), DestinationKind::Queue),
    (Pattern::Exact("queues"), DestinationKind::Queue),
    (Pattern::DashSuffix("qq-"), DestinationKind::Queue),
    (Pattern::Exact("ext-findmefollow"), DestinationKind::FollowMe),
    (Pattern::Exact("findmefollow"), DestinationKind::FollowMe),
    (Pattern::DashSuffix("fm-"), DestinationKind::FollowMe),
    (Pattern::Exact("ext-meetme"), DestinationKind::Conference),
    (Pattern::Exact("ext-conferences"), DestinationKind::Conference),
    (Pattern::Exact("conferences"), DestinationKind::Conference),
    (Pattern::DashSuffix("conf-"), DestinationKind::Conference),
    (Pattern::DashSuffix("app-announcement-"), DestinationKind::Announcement),
    (Pattern::Exact("app-announcement"), DestinationKind::Announcement),
    (Pattern::Exact("app-setcid"), DestinationKind::SetCallerId),
    (Pattern::Exact("ext-miscdests"), DestinationKind::MiscDestination),
    (Pattern::Exact("park"), DestinationKind::Park),
    (Pattern::Exact("parkedcalls"), DestinationKind::Park),
    (Pattern::Exact("app-parkedcalls"), DestinationKind::Park),
    (Pattern::Exact("app-blackhole"), DestinationKind::Hangup),
];

/// A parsed destination reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub raw: String,
    pub context: String,
    pub kind: DestinationKind,
    /// Identifier of the target record, empty if the reference has none
    pub id: String,
    /// Comma-separated fields after the identifier
    pub extra: Vec<String>,
}

impl Destination {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (context, rest) = match raw.split_once(',') {
            Some((context, rest)) => (context.trim(), rest),
            None => (raw, ""),
        };
        let rest: Vec<String> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',')
                .map(|s| s.trim().to_string())
                .collect()
        };
        let lowered = context.to_ascii_lowercase();

        let matched = CONTEXTS
            .iter()
            .find_map(|(pattern, kind)| {
                pattern
                    .matches(&lowered)
                    .map(|suffix| (*kind, suffix))
            });

        let (kind, id, extra) = match matched {
            Some((kind, Some(suffix))) => (kind, suffix, rest),
            Some((kind, None)) => {
                let mut rest = rest.into_iter();
                let id = rest
                    .next()
                    .unwrap_or_default();
                (kind, id, rest.collect())
            }
            None if is_termination(&lowered) => {
                let mut rest = rest.into_iter();
                let id = rest
                    .next()
                    .unwrap_or_default();
                (DestinationKind::Hangup, id, rest.collect())
            }
            None => (DestinationKind::Unknown, String::new(), rest),
        };

        let mut destination = Self {
            raw: raw.to_string(),
            context: context.to_string(),
            kind,
            id,
            extra,
        };
        destination.normalize();
        destination
    }

    /// Strip FreePBX-specific identifier prefixes
    fn normalize(&mut self) {
        match self.kind {
            DestinationKind::Extension => {
                if let Some(ext) = strip_voicemail_prefix(&self.id) {
                    self.kind = DestinationKind::Voicemail;
                    self.id = ext;
                }
            }
            DestinationKind::FollowMe => {
                if let Some(group) = self
                    .id
                    .strip_prefix("FM")
                    .or_else(|| {
                        self.id
                            .strip_prefix("fm")
                    })
                {
                    self.id = group.to_string();
                }
            }
            _ => {}
        }
    }

    /// Which voicemail greeting an `ext-local,vm?NNN` reference plays
    pub fn voicemail_greeting(&self) -> Option<&'static str> {
        if self.kind != DestinationKind::Voicemail {
            return None;
        }
        let lowered = self
            .raw
            .to_ascii_lowercase();
        let id_field = lowered
            .split(',')
            .nth(1)
            .unwrap_or("");
        Some(match id_field.get(..3) {
            Some("vmb") => "busy",
            Some("vmu") => "unavailable",
            Some("vms") => "no message",
            Some("vmi") => "instructions only",
            _ => "default",
        })
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_termination(context: &str) -> bool {
    context.contains("hangup") || context.contains("busy")
}

/// `vmu410` -> `410`; `None` if this is not a voicemail reference
fn strip_voicemail_prefix(id: &str) -> Option<String> {
    let lowered = id.to_ascii_lowercase();
    ["vmb", "vmu", "vms", "vmi"]
        .iter()
        .find(|prefix| lowered.starts_with(*prefix))
        .map(|prefix| id[prefix.len()..].to_string())
}
