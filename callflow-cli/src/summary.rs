//! Schema mapping summary for fpbx-callflow

use colored::*;
use freepbx_callflow::{Analysis, CollectionStatus, ComponentKind};

/// Prints which table each component came from and how collection went
pub struct SchemaSummary {
    color: bool,
}

impl SchemaSummary {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn print(&self, analysis: &Analysis) {
        for line in self.lines(analysis) {
            println!("{}", line);
        }
        println!();
    }

    /// One line per component, in mapping order
    pub fn lines(&self, analysis: &Analysis) -> Vec<String> {
        let mut lines = vec![self.heading("Schema mapping")];

        for kind in ComponentKind::ALL {
            let Some(data) = analysis
                .collected
                .get(kind)
            else {
                continue;
            };

            let columns = analysis
                .mappings
                .as_ref()
                .and_then(|set| set.get(kind))
                .map(|mapping| {
                    mapping
                        .fields
                        .iter()
                        .map(|(logical, physical)| {
                            if logical == physical {
                                logical.clone()
                            } else {
                                format!("{}={}", logical, physical)
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(", ")
                });

            let table = data
                .table
                .as_deref()
                .unwrap_or("-");
            let line = format!("  {:<18} {:<16}", kind.as_str(), table);
            let status = self.status(&data.status, data.records.len());
            lines.push(match columns {
                Some(columns) if !columns.is_empty() => {
                    format!("{} {} [{}]", line, status, columns)
                }
                _ => format!("{} {}", line, status),
            });
        }

        lines
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold()
                .to_string()
        } else {
            text.to_string()
        }
    }

    /// Color coding by collection outcome
    fn status(&self, status: &CollectionStatus, records: usize) -> String {
        let text = match status {
            CollectionStatus::Collected => format!("{} records", records),
            CollectionStatus::Failed(reason) => format!("failed: {}", reason),
            CollectionStatus::Unmapped => "unmapped".to_string(),
        };
        if !self.color {
            return text;
        }
        let colored: ColoredString = match status {
            CollectionStatus::Collected => text.green(),
            CollectionStatus::Failed(_) => text.red(),
            CollectionStatus::Unmapped => text.yellow(),
        };
        colored.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freepbx_callflow::{CollectedData, ComponentData, ComponentRecord};

    #[test]
    fn plain_lines_show_status() {
        let mut data = CollectedData::new().with_records(
            ComponentKind::Extensions,
            vec![ComponentRecord::with_fields([("extension", "410")])],
        );
        data.insert(ComponentKind::Queues, ComponentData::failed("queues_config", "timeout"));
        data.insert(ComponentKind::Trunks, ComponentData::unmapped());
        let analysis = Analysis::from_collected(data);

        let lines = SchemaSummary::new(false).lines(&analysis);
        assert_eq!(lines[0], "Schema mapping");
        assert!(lines[1].contains("extensions") && lines[1].ends_with("1 records"));
        assert!(lines[2].contains("queues_config") && lines[2].ends_with("failed: timeout"));
        assert!(lines[3].contains("trunks") && lines[3].ends_with("unmapped"));
    }
}
