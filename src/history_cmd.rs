use std::io::Read as _;
use std::path::Path;

use chrono::Utc;

use dftrack::history::{self, RunSummary};
use dftrack::render;

fn read_payload(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;
            Ok(buf)
        }
    }
}

/// Print the runs of a raw refresh-history payload. Exits 1 when the payload
/// cannot be parsed.
///
/// # Errors
///
/// Returns an error if the payload cannot be read.
pub fn cmd_history(file: Option<&Path>) -> anyhow::Result<i32> {
    let raw = read_payload(file)?;
    let raw = raw.trim();
    if raw.is_empty() {
        eprintln!("[dftrack] no history available");
        return Ok(0);
    }
    let runs = match history::try_parse(raw) {
        Ok(runs) => runs,
        Err(e) => {
            eprintln!("[dftrack] could not parse history: {e}");
            return Ok(1);
        }
    };
    if runs.is_empty() {
        eprintln!("[dftrack] no runs found");
        return Ok(0);
    }

    let summary = RunSummary::from_history(&runs);
    if let Some(status) = &summary.last_status {
        println!(
            "Last run: {status} ({})",
            render::relative_time(summary.last_time.as_deref(), Utc::now())
        );
    }
    println!("Recent:   {}", render::summary_strip(&summary.recent));
    print!("{}", render::history_rows(&runs));
    Ok(0)
}
