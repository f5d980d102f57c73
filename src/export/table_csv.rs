//! Tabular CSV export of a Q-table
//!
//! One row per state in registration order, one column per action in
//! vocabulary order, preceded by a `state` column holding the state's text
//! form. Meant for inspection in a spreadsheet, not for reloading.

use std::io::Write;

use crate::{Result, q_learning::SavedQTable};

/// Exporter for the human-readable Q-table dump
pub struct TableCsvExporter;

impl TableCsvExporter {
    /// Write `snapshot` as CSV. Values missing from a row are left blank.
    pub fn write<W: Write>(snapshot: &SavedQTable, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(snapshot.actions.len() + 1);
        header.push("state".to_string());
        header.extend(snapshot.actions.iter().map(|a| a.to_string()));
        csv.write_record(&header)?;

        for row in &snapshot.rows {
            let mut record = Vec::with_capacity(header.len());
            record.push(row.state.to_string());
            for action in &snapshot.actions {
                record.push(
                    row.values
                        .get(action)
                        .map(|value| value.to_string())
                        .unwrap_or_default(),
                );
            }
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        actions::{Action, ActionSet},
        q_learning::QLearningAgent,
        state::StateKey,
    };

    #[test]
    fn test_csv_layout() {
        let actions = ActionSet::new(["donothing", "trainscv"]).unwrap();
        let mut agent = QLearningAgent::with_defaults(actions);
        let first = StateKey::from((0, 12));
        let second = StateKey::from((1, 12));
        agent.ensure_state(&first);
        agent.ensure_state(&second);
        agent.set(&first, "trainscv", 0.25).unwrap();
        agent.set_exclusions(&second, [Action::new("trainscv")]);

        let mut buffer = Vec::new();
        TableCsvExporter::write(&SavedQTable::from_agent(&agent), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "state,donothing,trainscv");
        assert_eq!(lines[1], "\"(0, 12)\",0,0.25");
        assert_eq!(lines[2], "\"(1, 12)\",0,0");
        assert_eq!(lines.len(), 3);
    }
}
