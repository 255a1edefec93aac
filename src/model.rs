//! Typed views over collected component records.
//!
//! Built once from [`CollectedData`] and read-only afterwards. Lookups are
//! linear scans that compare identity values as strings, so `"07"` and `"7"`
//! are different identifiers.

use crate::{
    collector::CollectedData,
    component::{fields, ComponentKind, ComponentRecord},
};

/// Inbound route: DID (+ optional caller-ID filter) to first destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRoute {
    pub did: String,
    pub cid: String,
    pub description: String,
    pub destination: String,
    pub alert_info: String,
    pub cid_prefix: String,
    pub moh_class: String,
}

impl InboundRoute {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            did: record.string(fields::DID),
            cid: record.string(fields::CID),
            description: record.string(fields::DESCRIPTION),
            destination: record.string(fields::DESTINATION),
            alert_info: record.string(fields::ALERT_INFO),
            cid_prefix: record.string(fields::PREFIX),
            moh_class: record.string(fields::MOH),
        }
    }

    /// Header text for the DID; blank DIDs match any number
    pub fn did_label(&self) -> String {
        if self
            .did
            .is_empty()
        {
            "Any DID".to_string()
        } else {
            self.did
                .clone()
        }
    }
}

/// Which kind of schedule a time condition checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeConditionMode {
    TimeGroup,
    CalendarGroup,
    Unknown,
}

impl TimeConditionMode {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.to_ascii_lowercase();
        if raw.contains("calendar") {
            TimeConditionMode::CalendarGroup
        } else if raw.contains("time") {
            TimeConditionMode::TimeGroup
        } else {
            TimeConditionMode::Unknown
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeCondition {
    pub id: String,
    pub name: String,
    pub mode: TimeConditionMode,
    pub true_dest: String,
    pub false_dest: String,
    pub time_group: String,
}

impl TimeCondition {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            id: record.string(fields::ID),
            name: record.string(fields::NAME),
            mode: TimeConditionMode::parse(record.text(fields::MODE)),
            true_dest: record.string(fields::TRUE_DEST),
            false_dest: record.string(fields::FALSE_DEST),
            time_group: record.string(fields::TIME_GROUP),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub extension: String,
    pub name: String,
    pub voicemail: String,
    pub outbound_cid: String,
}

impl Extension {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            extension: record.string(fields::EXTENSION),
            name: record.string(fields::NAME),
            voicemail: record.string(fields::VOICEMAIL),
            outbound_cid: record.string(fields::OUTBOUND_CID),
        }
    }
}

/// One entry of a ring-group or follow-me list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupMember {
    Extension(String),
    /// Numbers with a trailing `#` are dialled out, not rung locally
    External(String),
}

/// Split a member list such as `410-411-412` or `410,5551234#`
pub fn parse_members(raw: &str) -> Vec<GroupMember> {
    raw.split(|c: char| c == '-' || c == ',' || c == '|' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_suffix('#') {
            Some(number) => GroupMember::External(number.to_string()),
            None => GroupMember::Extension(s.to_string()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingGroup {
    pub number: String,
    pub description: String,
    pub strategy: String,
    pub members: Vec<GroupMember>,
    pub ring_time: String,
    pub failover: String,
    pub moh: String,
}

impl RingGroup {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            number: record.string(fields::GROUP),
            description: record.string(fields::DESCRIPTION),
            strategy: record.string(fields::STRATEGY),
            members: parse_members(record.text(fields::MEMBERS)),
            ring_time: record.string(fields::RING_TIME),
            failover: record.string(fields::FAILOVER),
            moh: record.string(fields::MOH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IvrMenu {
    pub id: String,
    pub name: String,
    pub description: String,
    pub announcement: String,
    pub timeout_dest: String,
    pub invalid_dest: String,
}

impl IvrMenu {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            id: record.string(fields::ID),
            name: record.string(fields::NAME),
            description: record.string(fields::DESCRIPTION),
            announcement: record.string(fields::ANNOUNCEMENT),
            timeout_dest: record.string(fields::TIMEOUT_DEST),
            invalid_dest: record.string(fields::INVALID_DEST),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IvrOption {
    pub ivr_id: String,
    pub selection: String,
    pub destination: String,
}

impl IvrOption {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            ivr_id: record.string(fields::IVR_ID),
            selection: record.string(fields::SELECTION),
            destination: record.string(fields::DESTINATION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queue {
    pub extension: String,
    pub description: String,
    pub strategy: String,
}

impl Queue {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            extension: record.string(fields::EXTENSION),
            description: record.string(fields::DESCRIPTION),
            strategy: record.string(fields::STRATEGY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub id: String,
    pub description: String,
    pub filename: String,
}

impl Announcement {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            id: record.string(fields::ID),
            description: record.string(fields::DESCRIPTION),
            filename: record.string(fields::FILENAME),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trunk {
    pub id: String,
    pub name: String,
    pub tech: String,
    pub outbound_cid: String,
    pub disabled: bool,
}

impl Trunk {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            id: record.string(fields::ID),
            name: record.string(fields::NAME),
            tech: record.string(fields::TECH),
            outbound_cid: record.string(fields::OUTBOUND_CID),
            disabled: matches!(
                record
                    .text(fields::DISABLED)
                    .to_ascii_lowercase()
                    .as_str(),
                "on" | "yes" | "1" | "true"
            ),
        }
    }
}

/// Set-Caller-ID rule: rewrite templates plus where the call goes next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdRule {
    pub id: String,
    pub description: String,
    pub cid_name: String,
    pub cid_num: String,
    pub destination: String,
}

impl CallerIdRule {
    pub fn from_record(record: &ComponentRecord) -> Self {
        // templates keep their spaces: "Night: ${CALLERID(name)}"
        Self {
            id: record.string(fields::ID),
            description: record.string(fields::DESCRIPTION),
            cid_name: record
                .get(fields::CID_NAME)
                .unwrap_or("")
                .to_string(),
            cid_num: record
                .get(fields::CID_NUM)
                .unwrap_or("")
                .to_string(),
            destination: record.string(fields::DESTINATION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiscDestination {
    pub id: String,
    pub description: String,
    pub dial: String,
}

impl MiscDestination {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            id: record.string(fields::ID),
            description: record.string(fields::DESCRIPTION),
            dial: record.string(fields::DIAL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conference {
    pub extension: String,
    pub description: String,
}

impl Conference {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            extension: record.string(fields::EXTENSION),
            description: record.string(fields::DESCRIPTION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowMe {
    pub group: String,
    pub strategy: String,
    pub members: Vec<GroupMember>,
    pub failover: String,
}

impl FollowMe {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            group: record.string(fields::GROUP),
            strategy: record.string(fields::STRATEGY),
            members: parse_members(record.text(fields::MEMBERS)),
            failover: record.string(fields::FAILOVER),
        }
    }
}

/// All typed components of one PBX
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PbxModel {
    pub inbound_routes: Vec<InboundRoute>,
    pub time_conditions: Vec<TimeCondition>,
    pub extensions: Vec<Extension>,
    pub ring_groups: Vec<RingGroup>,
    pub ivr_menus: Vec<IvrMenu>,
    pub ivr_options: Vec<IvrOption>,
    pub queues: Vec<Queue>,
    pub announcements: Vec<Announcement>,
    pub trunks: Vec<Trunk>,
    pub caller_id_rules: Vec<CallerIdRule>,
    pub misc_destinations: Vec<MiscDestination>,
    pub conferences: Vec<Conference>,
    pub follow_me: Vec<FollowMe>,
}

fn typed<T>(data: &CollectedData, kind: ComponentKind, f: fn(&ComponentRecord) -> T) -> Vec<T> {
    data.records(kind)
        .iter()
        .map(f)
        .collect()
}

impl PbxModel {
    pub fn from_collected(data: &CollectedData) -> Self {
        Self {
            inbound_routes: typed(data, ComponentKind::InboundRoutes, InboundRoute::from_record),
            time_conditions: typed(data, ComponentKind::TimeConditions, TimeCondition::from_record),
            extensions: typed(data, ComponentKind::Extensions, Extension::from_record),
            ring_groups: typed(data, ComponentKind::RingGroups, RingGroup::from_record),
            ivr_menus: typed(data, ComponentKind::IvrMenus, IvrMenu::from_record),
            ivr_options: typed(data, ComponentKind::IvrOptions, IvrOption::from_record),
            queues: typed(data, ComponentKind::Queues, Queue::from_record),
            announcements: typed(data, ComponentKind::Announcements, Announcement::from_record),
            trunks: typed(data, ComponentKind::Trunks, Trunk::from_record),
            caller_id_rules: typed(data, ComponentKind::CallerIdRules, CallerIdRule::from_record),
            misc_destinations: typed(
                data,
                ComponentKind::MiscDestinations,
                MiscDestination::from_record,
            ),
            conferences: typed(data, ComponentKind::Conferences, Conference::from_record),
            follow_me: typed(data, ComponentKind::FollowMe, FollowMe::from_record),
        }
    }

    /// First inbound route whose DID equals `did`
    pub fn inbound_route(&self, did: &str) -> Option<&InboundRoute> {
        self.inbound_routes
            .iter()
            .find(|r| r.did == did)
    }

    pub fn time_condition(&self, id: &str) -> Option<&TimeCondition> {
        self.time_conditions
            .iter()
            .find(|t| t.id == id)
    }

    pub fn extension(&self, extension: &str) -> Option<&Extension> {
        self.extensions
            .iter()
            .find(|e| e.extension == extension)
    }

    pub fn ring_group(&self, number: &str) -> Option<&RingGroup> {
        self.ring_groups
            .iter()
            .find(|g| g.number == number)
    }

    pub fn ivr_menu(&self, id: &str) -> Option<&IvrMenu> {
        self.ivr_menus
            .iter()
            .find(|m| m.id == id)
    }

    /// Options of one IVR in collected order
    pub fn ivr_options(&self, ivr_id: &str) -> impl Iterator<Item = &IvrOption> {
        let ivr_id = ivr_id.to_string();
        self.ivr_options
            .iter()
            .filter(move |o| o.ivr_id == ivr_id)
    }

    pub fn queue(&self, extension: &str) -> Option<&Queue> {
        self.queues
            .iter()
            .find(|q| q.extension == extension)
    }

    pub fn announcement(&self, id: &str) -> Option<&Announcement> {
        self.announcements
            .iter()
            .find(|a| a.id == id)
    }

    pub fn caller_id_rule(&self, id: &str) -> Option<&CallerIdRule> {
        self.caller_id_rules
            .iter()
            .find(|r| r.id == id)
    }

    pub fn misc_destination(&self, id: &str) -> Option<&MiscDestination> {
        self.misc_destinations
            .iter()
            .find(|m| m.id == id)
    }

    pub fn conference(&self, extension: &str) -> Option<&Conference> {
        self.conferences
            .iter()
            .find(|c| c.extension == extension)
    }

    pub fn follow_me(&self, group: &str) -> Option<&FollowMe> {
        self.follow_me
            .iter()
            .find(|f| f.group == group)
    }
}
