//! Inspect command - Summarize a stored Q-table

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        commands::read_snapshot,
        output::{format_number, print_kv, print_section, print_subsection},
    },
    q_learning::SavedQTable,
};

#[derive(Parser, Debug)]
#[command(about = "Summarize a stored Q-table")]
pub struct InspectArgs {
    /// Data directory holding qlearn.gz
    pub dir: PathBuf,

    /// Number of states to list, highest best value first
    #[arg(long, short = 'n', default_value_t = 10)]
    pub top: usize,
}

/// Best action and value of one stored row
#[derive(Debug, Clone, PartialEq)]
pub struct RowSummary {
    pub state: String,
    pub action: String,
    pub value: f64,
}

/// Best action per stored state, sorted by value descending.
///
/// Masks are ignored: every stored value is considered.
pub fn best_actions(snapshot: &SavedQTable) -> Vec<RowSummary> {
    let mut summaries: Vec<RowSummary> = snapshot
        .rows
        .iter()
        .filter_map(|row| {
            snapshot
                .actions
                .iter()
                .filter_map(|action| row.values.get(action).map(|value| (action, *value)))
                .fold(None, |best: Option<(_, f64)>, (action, value)| match best {
                    Some((_, current)) if current >= value => best,
                    _ => Some((action, value)),
                })
                .map(|(action, value)| RowSummary {
                    state: row.state.to_string(),
                    action: action.to_string(),
                    value,
                })
        })
        .collect();
    summaries.sort_by(|a, b| b.value.total_cmp(&a.value));
    summaries
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let snapshot = read_snapshot(&args.dir)?;

    print_section(&format!("Q-table at {}", args.dir.display()));
    let names: Vec<&str> = snapshot.actions.iter().map(|a| a.as_str()).collect();
    print_kv("Format version", &snapshot.version.to_string());
    print_kv("Actions", &names.join(", "));
    print_kv("States", &format_number(snapshot.state_count()));
    print_kv("Masked states", &format_number(snapshot.exclusions.len()));

    let summaries = best_actions(&snapshot);
    if summaries.is_empty() {
        return Ok(());
    }

    print_subsection(&format!("Top {} states by best value", args.top.min(summaries.len())));
    for summary in summaries.iter().take(args.top) {
        println!(
            "  {:30} {:20} {:>10.4}",
            summary.state, summary.action, summary.value
        );
    }

    Ok(())
}
