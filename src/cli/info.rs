use tabled::Table;

use crate::{
    info,
    management::{FailureListManager, RunRecordManager},
    types::{RunRecord, RunRecordTableRow},
    warning,
};

/// Shows the summary of the last `run`.
///
/// Loads the record saved in the local data directory and prints it as a
/// table, followed by the number of entries currently waiting in the
/// remainder file of that run.
///
/// # Example Output
///
/// ```text
/// +-------------+---------------------------+
/// | field       | value                     |
/// +-------------+---------------------------+
/// | finished at | 2025-03-01 18:22:10 UTC   |
/// | input       | input.txt                 |
/// ...
/// [o] 3 entries waiting for retry in 'output.txt'.
/// ```
pub async fn info() {
    let record = match RunRecordManager::new().load().await {
        Ok(record) => record,
        Err(e) => {
            warning!("No previous run found. Run trackfetch run first.\n Error: {}", e);
            return;
        }
    };

    println!("{}", Table::new(record_rows(&record)));

    let remainder = FailureListManager::new(&record.output);
    if !remainder.exists() {
        info!("No entries waiting for retry.");
        return;
    }

    match remainder.load().await {
        Ok(lines) => info!(
            "{} entries waiting for retry in '{}'.",
            lines.len(),
            record.output.display()
        ),
        Err(e) => warning!("Cannot read '{}': {}", record.output.display(), e),
    }
}

fn record_rows(record: &RunRecord) -> Vec<RunRecordTableRow> {
    let row = |field: &str, value: String| RunRecordTableRow {
        field: field.to_string(),
        value,
    };

    vec![
        row(
            "finished at",
            record.finished_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
        row("input", record.input.display().to_string()),
        row("output", record.output.display().to_string()),
        row("workers", record.workers.to_string()),
        row("lines", record.total_lines.to_string()),
        row("malformed", record.malformed.to_string()),
        row("attempted", record.attempted.to_string()),
        row("downloaded", record.succeeded.to_string()),
        row("unresolved", record.unresolved.to_string()),
    ]
}
