//! Human-readable descriptions derived from record contents.
//!
//! Nothing here affects which nodes get built; these only pick words.

use crate::model::{CallerIdRule, TimeCondition, TimeConditionMode};

/// Edge labels for the two branches of a time condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchLabels {
    pub matched: &'static str,
    pub unmatched: &'static str,
}

pub const GENERIC_BRANCHES: BranchLabels = BranchLabels {
    matched: "Condition True",
    unmatched: "Condition False",
};

/// Keyword found in the condition name -> branch labels
const TIME_GROUP_KEYWORDS: &[(&str, BranchLabels)] = &[
    ("business", BranchLabels { matched: "Business Hours", unmatched: "After Hours" }),
    ("office", BranchLabels { matched: "Business Hours", unmatched: "After Hours" }),
    ("open", BranchLabels { matched: "Open", unmatched: "Closed" }),
    ("lunch", BranchLabels { matched: "Lunch Break", unmatched: "Not Lunch" }),
    ("weekend", BranchLabels { matched: "Weekend", unmatched: "Weekday" }),
    ("night", BranchLabels { matched: "Night", unmatched: "Day" }),
];

const CALENDAR_KEYWORDS: &[(&str, BranchLabels)] = &[
    ("holiday", BranchLabels { matched: "IS Holiday", unmatched: "NOT Holiday" }),
    ("closed", BranchLabels { matched: "Closed", unmatched: "Open" }),
    ("closure", BranchLabels { matched: "Closed", unmatched: "Open" }),
    ("event", BranchLabels { matched: "During Event", unmatched: "No Event" }),
];

fn lookup(name: &str, table: &[(&str, BranchLabels)]) -> Option<BranchLabels> {
    table
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, labels)| *labels)
}

/// Pick branch labels from the condition's name and mode.
///
/// The mode's own table is consulted first, then the other one; anything
/// unrecognized falls back to [`GENERIC_BRANCHES`].
pub fn branch_labels(condition: &TimeCondition) -> BranchLabels {
    let name = condition
        .name
        .to_lowercase();
    let (first, second) = match condition.mode {
        TimeConditionMode::CalendarGroup => (CALENDAR_KEYWORDS, TIME_GROUP_KEYWORDS),
        TimeConditionMode::TimeGroup | TimeConditionMode::Unknown => {
            (TIME_GROUP_KEYWORDS, CALENDAR_KEYWORDS)
        }
    };
    lookup(&name, first)
        .or_else(|| lookup(&name, second))
        .unwrap_or(GENERIC_BRANCHES)
}

/// Which caller-ID part a template rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerIdPart {
    Name,
    Number,
}

impl CallerIdPart {
    fn noun(&self) -> &'static str {
        match self {
            CallerIdPart::Name => "caller's name",
            CallerIdPart::Number => "caller's number",
        }
    }

    fn tokens(&self) -> &'static [&'static str] {
        match self {
            CallerIdPart::Name => &["${CALLERID(name)}", "${CALLERID(all)}"],
            CallerIdPart::Number => &[
                "${CALLERID(num)}",
                "${CALLERID(number)}",
                "${CALLERID(all)}",
            ],
        }
    }
}

/// What a caller-ID template does to the existing value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerIdChange {
    Keep,
    Clear,
    Replace(String),
    Prepend(String),
    Append(String),
    Wrap(String, String),
}

/// Classify a template against the pass-through token for `part`
pub fn classify_template(template: &str, part: CallerIdPart) -> CallerIdChange {
    if template
        .trim()
        .is_empty()
    {
        return CallerIdChange::Clear;
    }

    let found = part
        .tokens()
        .iter()
        .find_map(|token| {
            template
                .find(token)
                .map(|pos| (pos, token.len()))
        });

    match found {
        None => CallerIdChange::Replace(template.to_string()),
        Some((pos, len)) => {
            let before = &template[..pos];
            let after = &template[pos + len..];
            match (before.is_empty(), after.is_empty()) {
                (true, true) => CallerIdChange::Keep,
                (false, true) => CallerIdChange::Prepend(before.to_string()),
                (true, false) => CallerIdChange::Append(after.to_string()),
                (false, false) => CallerIdChange::Wrap(before.to_string(), after.to_string()),
            }
        }
    }
}

/// One sentence for one template
pub fn describe_change(change: &CallerIdChange, part: CallerIdPart) -> String {
    let noun = part.noun();
    match change {
        CallerIdChange::Keep => format!("Keep {}", noun),
        CallerIdChange::Clear => format!("Clear {}", noun),
        CallerIdChange::Replace(value) => format!("Set {} to '{}'", noun, value),
        CallerIdChange::Prepend(prefix) => format!("Prepend '{}' to {}", prefix, noun),
        CallerIdChange::Append(suffix) => format!("Append '{}' to {}", suffix, noun),
        CallerIdChange::Wrap(prefix, suffix) => {
            format!("Wrap {} with '{}' and '{}'", noun, prefix, suffix)
        }
    }
}

/// Static description of a Set-Caller-ID rule, name first then number
pub fn describe_caller_id_rule(rule: &CallerIdRule) -> String {
    let name = classify_template(&rule.cid_name, CallerIdPart::Name);
    let number = classify_template(&rule.cid_num, CallerIdPart::Number);
    format!(
        "{}; {}",
        describe_change(&name, CallerIdPart::Name),
        describe_change(&number, CallerIdPart::Number)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(name: &str, mode: TimeConditionMode) -> TimeCondition {
        TimeCondition {
            id: "1".into(),
            name: name.into(),
            mode,
            true_dest: String::new(),
            false_dest: String::new(),
            time_group: String::new(),
        }
    }

    #[test]
    fn business_hours_time_group() {
        let labels = branch_labels(&condition("Business Hours Check", TimeConditionMode::TimeGroup));
        assert_eq!(labels.matched, "Business Hours");
        assert_eq!(labels.unmatched, "After Hours");
    }

    #[test]
    fn holiday_calendar_group() {
        let labels = branch_labels(&condition("US Holidays 2025", TimeConditionMode::CalendarGroup));
        assert_eq!(labels.matched, "IS Holiday");
        assert_eq!(labels.unmatched, "NOT Holiday");
    }

    #[test]
    fn holiday_name_on_time_group_still_recognized() {
        let labels = branch_labels(&condition("Holiday override", TimeConditionMode::TimeGroup));
        assert_eq!(labels.matched, "IS Holiday");
    }

    #[test]
    fn unconventional_name_falls_back() {
        assert_eq!(
            branch_labels(&condition("TC-7", TimeConditionMode::Unknown)),
            GENERIC_BRANCHES
        );
    }

    #[test]
    fn templates_classify() {
        let part = CallerIdPart::Name;
        assert_eq!(
            classify_template("Night: ${CALLERID(name)}", part),
            CallerIdChange::Prepend("Night: ".into())
        );
        assert_eq!(classify_template("${CALLERID(name)}", part), CallerIdChange::Keep);
        assert_eq!(
            classify_template("${CALLERID(name)} (VIP)", part),
            CallerIdChange::Append(" (VIP)".into())
        );
        assert_eq!(
            classify_template("[${CALLERID(name)}]", part),
            CallerIdChange::Wrap("[".into(), "]".into())
        );
        assert_eq!(
            classify_template("Reception", part),
            CallerIdChange::Replace("Reception".into())
        );
        assert_eq!(classify_template("", part), CallerIdChange::Clear);
    }

    #[test]
    fn rule_description_covers_name_and_number() {
        let rule = CallerIdRule {
            id: "3".into(),
            description: "Night prefix".into(),
            cid_name: "Night: ${CALLERID(name)}".into(),
            cid_num: "${CALLERID(num)}".into(),
            destination: "ext-local,410,1".into(),
        };
        assert_eq!(
            describe_caller_id_rule(&rule),
            "Prepend 'Night: ' to caller's name; Keep caller's number"
        );
    }
}
