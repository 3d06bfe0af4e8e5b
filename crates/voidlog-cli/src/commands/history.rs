use chrono::Local;
use voidlog_core::{Config, HistoryEntry};

use crate::common::{open_store, CliResult};

pub fn run(config: &Config, json: bool) -> CliResult {
    let store = open_store(config)?;
    let history = store.history();

    if json {
        println!("{}", serde_json::to_string_pretty(history)?);
        return Ok(());
    }

    if history.is_empty() {
        println!("no streaks recorded");
        return Ok(());
    }
    for (idx, entry) in history.iter().enumerate() {
        println!("{}", format_row(idx, entry));
    }
    Ok(())
}

fn format_row(idx: usize, entry: &HistoryEntry) -> String {
    let date = entry.completed_at.with_timezone(&Local).format("%Y-%m-%d");
    format!("SEQ_{idx:03}  {date}  {}D", entry.duration_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_has_sequence_and_duration() {
        let row = format_row(7, &HistoryEntry::new(1_700_000_000_000, 12));
        assert!(row.starts_with("SEQ_007  2023-11-1"));
        assert!(row.ends_with("  12D"));
    }
}
