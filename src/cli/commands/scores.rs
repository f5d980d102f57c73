//! Scores command - Summarize the episode score log

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::output::{format_number, print_kv, print_section},
    score::ScoreLog,
};

#[derive(Parser, Debug)]
#[command(about = "Summarize recorded episode scores")]
pub struct ScoresArgs {
    /// Data directory holding score.csv
    pub dir: PathBuf,
}

pub fn execute(args: ScoresArgs) -> Result<()> {
    let log = ScoreLog::new(&args.dir);
    let Some(summary) = log.summary()? else {
        println!("No scores recorded in {}", log.path().display());
        return Ok(());
    };

    print_section(&format!("Scores in {}", log.path().display()));
    print_kv("Episodes", &format_number(summary.episodes));
    print_kv("Mean", &format!("{:.2}", summary.mean));
    print_kv("Min", &format!("{:.2}", summary.min));
    print_kv("Max", &format!("{:.2}", summary.max));
    print_kv("Last", &format!("{:.2}", summary.last));
    Ok(())
}
