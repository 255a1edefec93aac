//! Candidate table and column names per component.
//!
//! FreePBX renames tables and columns between releases rather than keeping
//! aliases around, so each logical field is a short ordered list of physical
//! names. Lists are ordered most-likely first; the mapper takes the first hit.

use crate::component::{fields, ComponentKind};

/// How collected rows are ordered by their identity column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityOrder {
    /// `CAST(col AS UNSIGNED), col` for extension numbers and numeric ids
    Numeric,
    /// Plain string ordering for DIDs and other free-form keys
    Lexical,
}

/// Ordered physical column names for one logical field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCandidates {
    pub field: &'static str,
    pub columns: &'static [&'static str],
}

/// Everything the mapper needs to locate one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    pub kind: ComponentKind,
    pub tables: &'static [&'static str],
    /// Logical field that must resolve for a table to be accepted
    pub identity: &'static str,
    pub fields: &'static [FieldCandidates],
    pub order: IdentityOrder,
}

impl ComponentSpec {
    /// Candidate columns for a logical field
    pub fn candidates(&self, field: &str) -> Option<&'static [&'static str]> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.columns)
    }
}

const fn field(field: &'static str, columns: &'static [&'static str]) -> FieldCandidates {
    FieldCandidates { field, columns }
}

static INBOUND_ROUTES: ComponentSpec = ComponentSpec {
    kind: ComponentKind::InboundRoutes,
    tables: &["incoming", "inbound_routes", "did_routes"],
    identity: fields::DID,
    fields: &[
        field(fields::DID, &["extension", "did", "cidnum"]),
        field(fields::CID, &["cidnum", "cid", "callerid"]),
        field(fields::DESCRIPTION, &["description", "descr", "name"]),
        field(fields::DESTINATION, &["destination", "dest", "goto"]),
        field(fields::ALERT_INFO, &["alertinfo", "alert_info"]),
        field(fields::PREFIX, &["grppre", "cid_prefix"]),
        field(fields::MOH, &["mohclass", "moh"]),
    ],
    order: IdentityOrder::Lexical,
};

static TIME_CONDITIONS: ComponentSpec = ComponentSpec {
    kind: ComponentKind::TimeConditions,
    tables: &["timeconditions", "time_conditions"],
    identity: fields::ID,
    fields: &[
        field(fields::ID, &["timeconditions_id", "id"]),
        field(fields::NAME, &["displayname", "name", "description"]),
        field(fields::TRUE_DEST, &["truegoto", "destination_true", "true_dest"]),
        field(fields::FALSE_DEST, &["falsegoto", "destination_false", "false_dest"]),
        field(fields::MODE, &["mode", "toggle_mode"]),
        field(fields::TIME_GROUP, &["time", "timegroup", "timegroupid"]),
    ],
    order: IdentityOrder::Numeric,
};

static EXTENSIONS: ComponentSpec = ComponentSpec {
    kind: ComponentKind::Extensions,
    tables: &["users", "extensions", "devices"],
    identity: fields::EXTENSION,
    fields: &[
        field(fields::EXTENSION, &["extension", "id", "user"]),
        field(fields::NAME, &["name", "description", "descr"]),
        field(fields::VOICEMAIL, &["voicemail", "vm"]),
        field(fields::OUTBOUND_CID, &["outboundcid", "outbound_cid"]),
    ],
    order: IdentityOrder::Numeric,
};

static RING_GROUPS: ComponentSpec = ComponentSpec {
    kind: ComponentKind::RingGroups,
    tables: &["ringgroups", "ring_groups"],
    identity: fields::GROUP,
    fields: &[
        field(fields::GROUP, &["grpnum", "group_number", "id"]),
        field(fields::DESCRIPTION, &["description", "descr", "name"]),
        field(fields::STRATEGY, &["strategy", "ringstrategy"]),
        field(fields::MEMBERS, &["grplist", "members", "extensions"]),
        field(fields::RING_TIME, &["grptime", "ringtime", "ring_time"]),
        field(fields::FAILOVER, &["postdest", "dest", "destination", "failover_dest"]),
        field(fields::MOH, &["mohclass", "rvolume"]),
    ],
    order: IdentityOrder::Numeric,
};

static IVR_MENUS: ComponentSpec = ComponentSpec {
    kind: ComponentKind::IvrMenus,
    tables: &["ivr_details", "ivr", "ivrs"],
    identity: fields::ID,
    fields: &[
        field(fields::ID, &["id", "ivr_id"]),
        field(fields::NAME, &["name", "displayname"]),
        field(fields::DESCRIPTION, &["description", "descr"]),
        field(fields::ANNOUNCEMENT, &["announcement", "announcement_id"]),
        field(fields::TIMEOUT_DEST, &["timeout_destination", "timeout_dest"]),
        field(fields::INVALID_DEST, &["invalid_destination", "invalid_dest"]),
    ],
    order: IdentityOrder::Numeric,
};

static IVR_OPTIONS: ComponentSpec = ComponentSpec {
    kind: ComponentKind::IvrOptions,
    tables: &["ivr_entries", "ivr_options", "ivr_dests"],
    identity: fields::IVR_ID,
    fields: &[
        field(fields::IVR_ID, &["ivr_id", "ivr"]),
        field(fields::SELECTION, &["selection", "digits", "option"]),
        field(fields::DESTINATION, &["dest", "destination", "goto"]),
    ],
    order: IdentityOrder::Numeric,
};

static QUEUES: ComponentSpec = ComponentSpec {
    kind: ComponentKind::Queues,
    tables: &["queues_config", "queues"],
    identity: fields::EXTENSION,
    fields: &[
        field(fields::EXTENSION, &["extension", "queue", "id"]),
        field(fields::DESCRIPTION, &["descr", "description", "keyword"]),
        field(fields::STRATEGY, &["strategy", "ringstrategy"]),
    ],
    order: IdentityOrder::Numeric,
};

static ANNOUNCEMENTS: ComponentSpec = ComponentSpec {
    kind: ComponentKind::Announcements,
    tables: &["announcement", "announcements"],
    identity: fields::ID,
    fields: &[
        field(fields::ID, &["announcement_id", "id"]),
        field(fields::DESCRIPTION, &["description", "descr", "name"]),
        field(fields::FILENAME, &["filename", "file", "recording_id"]),
    ],
    order: IdentityOrder::Numeric,
};

static TRUNKS: ComponentSpec = ComponentSpec {
    kind: ComponentKind::Trunks,
    tables: &["trunks", "trunk"],
    identity: fields::ID,
    fields: &[
        field(fields::ID, &["trunkid", "id"]),
        field(fields::NAME, &["name", "channelid"]),
        field(fields::TECH, &["tech", "technology"]),
        field(fields::OUTBOUND_CID, &["outcid", "callerid"]),
        field(fields::DISABLED, &["disabled"]),
    ],
    order: IdentityOrder::Numeric,
};

static CALLER_ID_RULES: ComponentSpec = ComponentSpec {
    kind: ComponentKind::CallerIdRules,
    tables: &["setcid", "set_callerid"],
    identity: fields::ID,
    fields: &[
        field(fields::ID, &["cid_id", "id"]),
        field(fields::DESCRIPTION, &["description", "descr"]),
        field(fields::CID_NAME, &["cid_name", "name"]),
        field(fields::CID_NUM, &["cid_num", "number"]),
        field(fields::DESTINATION, &["dest", "destination"]),
    ],
    order: IdentityOrder::Numeric,
};

static MISC_DESTINATIONS: ComponentSpec = ComponentSpec {
    kind: ComponentKind::MiscDestinations,
    tables: &["miscdests", "misc_destinations"],
    identity: fields::ID,
    fields: &[
        field(fields::ID, &["id", "miscdest_id"]),
        field(fields::DESCRIPTION, &["description", "descr"]),
        field(fields::DIAL, &["destdial", "dial"]),
    ],
    order: IdentityOrder::Numeric,
};

static CONFERENCES: ComponentSpec = ComponentSpec {
    kind: ComponentKind::Conferences,
    tables: &["meetme", "conferences"],
    identity: fields::EXTENSION,
    fields: &[
        field(fields::EXTENSION, &["exten", "extension", "id"]),
        field(fields::DESCRIPTION, &["description", "descr", "name"]),
    ],
    order: IdentityOrder::Numeric,
};

static FOLLOW_ME: ComponentSpec = ComponentSpec {
    kind: ComponentKind::FollowMe,
    tables: &["findmefollow", "follow_me"],
    identity: fields::GROUP,
    fields: &[
        field(fields::GROUP, &["grpnum", "extension"]),
        field(fields::STRATEGY, &["strategy"]),
        field(fields::MEMBERS, &["grplist", "members"]),
        field(fields::FAILOVER, &["postdest", "dest"]),
    ],
    order: IdentityOrder::Numeric,
};

/// Built-in candidate lists, one per [`ComponentKind`], in mapping order
pub fn builtin_specs() -> Vec<ComponentSpec> {
    ComponentKind::ALL
        .iter()
        .map(|kind| spec_for(*kind).clone())
        .collect()
}

/// Built-in candidate list for one component
pub fn spec_for(kind: ComponentKind) -> &'static ComponentSpec {
    match kind {
        ComponentKind::InboundRoutes => &INBOUND_ROUTES,
        ComponentKind::TimeConditions => &TIME_CONDITIONS,
        ComponentKind::Extensions => &EXTENSIONS,
        ComponentKind::RingGroups => &RING_GROUPS,
        ComponentKind::IvrMenus => &IVR_MENUS,
        ComponentKind::IvrOptions => &IVR_OPTIONS,
        ComponentKind::Queues => &QUEUES,
        ComponentKind::Announcements => &ANNOUNCEMENTS,
        ComponentKind::Trunks => &TRUNKS,
        ComponentKind::CallerIdRules => &CALLER_ID_RULES,
        ComponentKind::MiscDestinations => &MISC_DESTINATIONS,
        ComponentKind::Conferences => &CONFERENCES,
        ComponentKind::FollowMe => &FOLLOW_ME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_spec_lists_its_identity_field() {
        for spec in builtin_specs() {
            assert!(
                spec.candidates(spec.identity)
                    .is_some(),
                "{} has no candidates for identity field {}",
                spec.kind,
                spec.identity
            );
            assert!(!spec
                .tables
                .is_empty());
        }
    }

    #[test]
    fn version_skew_families_are_ordered() {
        let tc = spec_for(ComponentKind::TimeConditions);
        assert_eq!(tc.tables, &["timeconditions", "time_conditions"]);
        assert_eq!(
            tc.candidates(fields::TRUE_DEST),
            Some(&["truegoto", "destination_true", "true_dest"][..])
        );
        assert_eq!(tc.candidates(fields::MODE), Some(&["mode", "toggle_mode"][..]));

        let rg = spec_for(ComponentKind::RingGroups);
        assert_eq!(
            rg.candidates(fields::FAILOVER),
            Some(&["postdest", "dest", "destination", "failover_dest"][..])
        );
        assert_eq!(rg.candidates(fields::MOH), Some(&["mohclass", "rvolume"][..]));

        let queues = spec_for(ComponentKind::Queues);
        assert_eq!(
            queues.candidates(fields::DESCRIPTION),
            Some(&["descr", "description", "keyword"][..])
        );

        let ann = spec_for(ComponentKind::Announcements);
        assert_eq!(ann.candidates(fields::ID), Some(&["announcement_id", "id"][..]));
    }
}
