//! Logical FreePBX components and their collected rows.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of logical components the mapper knows how to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    InboundRoutes,
    TimeConditions,
    Extensions,
    RingGroups,
    IvrMenus,
    IvrOptions,
    Queues,
    Announcements,
    Trunks,
    CallerIdRules,
    MiscDestinations,
    Conferences,
    FollowMe,
}

impl ComponentKind {
    /// Every component, in mapping order
    pub const ALL: [ComponentKind; 13] = [
        ComponentKind::InboundRoutes,
        ComponentKind::TimeConditions,
        ComponentKind::Extensions,
        ComponentKind::RingGroups,
        ComponentKind::IvrMenus,
        ComponentKind::IvrOptions,
        ComponentKind::Queues,
        ComponentKind::Announcements,
        ComponentKind::Trunks,
        ComponentKind::CallerIdRules,
        ComponentKind::MiscDestinations,
        ComponentKind::Conferences,
        ComponentKind::FollowMe,
    ];

    /// Stable snake_case name, also used as the snapshot key
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::InboundRoutes => "inbound_routes",
            ComponentKind::TimeConditions => "time_conditions",
            ComponentKind::Extensions => "extensions",
            ComponentKind::RingGroups => "ring_groups",
            ComponentKind::IvrMenus => "ivr_menus",
            ComponentKind::IvrOptions => "ivr_options",
            ComponentKind::Queues => "queues",
            ComponentKind::Announcements => "announcements",
            ComponentKind::Trunks => "trunks",
            ComponentKind::CallerIdRules => "caller_id_rules",
            ComponentKind::MiscDestinations => "misc_destinations",
            ComponentKind::Conferences => "conferences",
            ComponentKind::FollowMe => "follow_me",
        }
    }

    /// Parse the snake_case name back into a kind
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical field names shared by the mapper, the collector and the typed model.
pub mod fields {
    pub const ID: &str = "id";
    pub const DID: &str = "did";
    pub const CID: &str = "cid";
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const DESTINATION: &str = "destination";
    pub const ALERT_INFO: &str = "alert_info";
    pub const PREFIX: &str = "prefix";
    pub const MOH: &str = "moh";
    pub const TRUE_DEST: &str = "true_dest";
    pub const FALSE_DEST: &str = "false_dest";
    pub const MODE: &str = "mode";
    pub const TIME_GROUP: &str = "time_group";
    pub const EXTENSION: &str = "extension";
    pub const VOICEMAIL: &str = "voicemail";
    pub const OUTBOUND_CID: &str = "outbound_cid";
    pub const GROUP: &str = "group";
    pub const STRATEGY: &str = "strategy";
    pub const MEMBERS: &str = "members";
    pub const RING_TIME: &str = "ring_time";
    pub const FAILOVER: &str = "failover";
    pub const ANNOUNCEMENT: &str = "announcement";
    pub const TIMEOUT_DEST: &str = "timeout_dest";
    pub const INVALID_DEST: &str = "invalid_dest";
    pub const IVR_ID: &str = "ivr_id";
    pub const SELECTION: &str = "selection";
    pub const FILENAME: &str = "filename";
    pub const TECH: &str = "tech";
    pub const DISABLED: &str = "disabled";
    pub const CID_NAME: &str = "cid_name";
    pub const CID_NUM: &str = "cid_num";
    pub const DIAL: &str = "dial";
}

/// One collected row: logical field name to text value.
///
/// Values are kept as the driver returned them. Absent fields read as the
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRecord {
    inner: IndexMap<String, String>,
}

impl ComponentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.inner
            .insert(field.into(), value.into());
    }

    /// Field value, `None` if the field was not mapped
    pub fn get(&self, field: &str) -> Option<&str> {
        self.inner
            .get(field)
            .map(|s| s.as_str())
    }

    /// Trimmed field value, empty if missing
    pub fn text(&self, field: &str) -> &str {
        self.get(field)
            .map(str::trim)
            .unwrap_or("")
    }

    /// Trimmed owned field value, empty if missing
    pub fn string(&self, field: &str) -> String {
        self.text(field)
            .to_string()
    }

    pub fn len(&self) -> usize {
        self.inner
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.inner
            .iter()
    }
}
