//! In-memory FreePBX databases for integration testing

#![allow(dead_code)]

use freepbx_callflow::{MemorySource, MemoryTable};

pub const MAIN_DID: &str = "2485550100";
pub const NIGHT_DID: &str = "5550199";

fn users() -> MemoryTable {
    MemoryTable::new(["extension", "name", "voicemail", "outboundcid"])
        .row(["410", "Alice", "default", ""])
        .row(["411", "Bob", "default", ""])
        .row(["200", "Reception", "novm", "\"Acme\" <2485550100>"])
}

/// Current-style schema: every component present under its newest name.
///
/// DID 2485550100 goes to time condition 5 ("Business Hours Check"): open
/// hours ring group 10, closed hours IVR 2. DID 5550199 rewrites the caller
/// ID and hands off to a misc destination. A catch-all route hangs up.
pub fn modern_pbx() -> MemorySource {
    MemorySource::new()
        .table(
            "incoming",
            MemoryTable::new([
                "extension",
                "cidnum",
                "description",
                "destination",
                "alertinfo",
                "grppre",
                "mohclass",
            ])
            .row([NIGHT_DID, "", "Night line", "app-setcid,1,1", "", "", "default"])
            .row([MAIN_DID, "", "Main Line", "timeconditions,5,1", "", "", "default"])
            .row(["", "", "Catch-all", "app-blackhole,hangup,1", "", "", "default"]),
        )
        .table(
            "timeconditions",
            MemoryTable::new([
                "timeconditions_id",
                "displayname",
                "truegoto",
                "falsegoto",
                "mode",
                "time",
            ])
            .row([
                "5",
                "Business Hours Check",
                "ext-group,10,1",
                "ivr-2,s,1",
                "time-group",
                "1",
            ]),
        )
        .table("users", users())
        .table(
            "ringgroups",
            MemoryTable::new(["grpnum", "description", "strategy", "grplist", "grptime", "postdest"])
                .row(["10", "Sales", "ringall", "410-411-412", "20", "ext-local,vmu410,1"]),
        )
        .table(
            "ivr_details",
            MemoryTable::new([
                "id",
                "name",
                "description",
                "announcement",
                "timeout_destination",
                "invalid_destination",
            ])
            .row(["2", "Main Menu", "After hours menu", "3", "app-announcement-3,s,1", ""]),
        )
        .table(
            "ivr_entries",
            MemoryTable::new(["ivr_id", "selection", "dest"])
                .row(["2", "1", "ext-local,410,1"])
                .row(["2", "2", "ext-queues,400,1"]),
        )
        .table(
            "queues_config",
            MemoryTable::new(["extension", "descr", "strategy"]).row(["400", "Support", "rrmemory"]),
        )
        .table(
            "announcement",
            MemoryTable::new(["announcement_id", "description", "filename"]).row([
                "3",
                "Closed message",
                "custom/closed",
            ]),
        )
        .table(
            "trunks",
            MemoryTable::new(["trunkid", "name", "tech", "outcid", "disabled"])
                .row(["1", "carrier-a", "pjsip", "2485550100", "off"]),
        )
        .table(
            "setcid",
            MemoryTable::new(["cid_id", "description", "cid_name", "cid_num", "dest"]).row([
                "1",
                "Night prefix",
                "Night: ${CALLERID(name)}",
                "${CALLERID(num)}",
                "ext-miscdests,1,1",
            ]),
        )
        .table(
            "miscdests",
            MemoryTable::new(["id", "description", "destdial"]).row(["1", "On-call cell", "5551234"]),
        )
        .table(
            "meetme",
            MemoryTable::new(["exten", "description"]).row(["800", "Staff bridge"]),
        )
        .table(
            "findmefollow",
            MemoryTable::new(["grpnum", "strategy", "grplist", "postdest"])
                .row(["410", "ringallv2", "410-5559876#", "ext-local,vmu410,1"]),
        )
}

/// Older naming: `time_conditions`, `ring_groups`, `ivr`, `inbound_routes`
/// with renamed columns, and no queue, announcement or conference tables.
pub fn legacy_pbx() -> MemorySource {
    MemorySource::new()
        .table(
            "inbound_routes",
            MemoryTable::new(["did", "cid", "descr", "dest"]).row([
                MAIN_DID,
                "",
                "Main Line",
                "timeconditions,5,1",
            ]),
        )
        .table(
            "time_conditions",
            MemoryTable::new(["id", "name", "destination_true", "destination_false", "toggle_mode"])
                .row([
                    "5",
                    "Business Hours Check",
                    "ext-group,10,1",
                    "ivr-2,s,1",
                    "time-group",
                ]),
        )
        .table(
            "extensions",
            MemoryTable::new(["id", "description"])
                .row(["410", "Alice"])
                .row(["411", "Bob"]),
        )
        .table(
            "ring_groups",
            MemoryTable::new(["group_number", "name", "ringstrategy", "members", "failover_dest"])
                .row(["10", "Sales", "ringall", "410-411-412", ""]),
        )
        .table(
            "ivr",
            MemoryTable::new(["ivr_id", "displayname", "timeout_dest", "invalid_dest"])
                .row(["2", "Main Menu", "", "app-blackhole,hangup,1"]),
        )
        .table(
            "ivr_dests",
            MemoryTable::new(["ivr", "digits", "goto"]).row(["2", "1", "ext-local,410,1"]),
        )
}

/// Time conditions 1..=count, each one's open branch leading to the next
pub fn chained_time_conditions(count: usize) -> MemorySource {
    let ids: Vec<String> = (1..=count)
        .map(|i| i.to_string())
        .collect();
    let next: Vec<String> = (1..=count)
        .map(|i| format!("timeconditions,{},1", i + 1))
        .collect();
    let mut table = MemoryTable::new(["timeconditions_id", "displayname", "truegoto", "falsegoto"]);
    for (id, next) in ids
        .iter()
        .zip(&next)
    {
        table = table.row([id.as_str(), "Chain", next.as_str(), "app-blackhole,hangup,1"]);
    }
    MemorySource::new()
        .table(
            "incoming",
            MemoryTable::new(["extension", "destination"]).row(["100", "timeconditions,1,1"]),
        )
        .table("timeconditions", table)
}
