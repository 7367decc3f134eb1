//! Poll-cycle history and reporting.
//!
//! Stores one record per poll cycle in JSONL files at
//! ~/.object-announcer-history/{date}.jsonl.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::warn;

fn history_dir() -> PathBuf {
    dirs::home_dir()
        .expect("No home directory")
        .join(".object-announcer-history")
}

fn history_file(date: &str) -> PathBuf {
    history_dir().join(format!("{date}.jsonl"))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PollRecord {
    pub timestamp: String,
    pub endpoint: String,
    pub object_count: usize,
    pub fetch_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub spoken: bool,
}

pub fn save_poll_record(record: &PollRecord) {
    let dir = history_dir();
    if let Err(e) = fs::create_dir_all(&dir) {
        warn!("Failed to create history dir: {e}");
        return;
    }

    let date = Local::now().format("%Y-%m-%d").to_string();
    let path = history_file(&date);

    let mut file = match fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to open history file: {e}");
            return;
        }
    };

    match serde_json::to_string(record) {
        Ok(line) => {
            if let Err(e) = writeln!(file, "{line}") {
                warn!("Failed to write history record: {e}");
            }
        }
        Err(e) => warn!("Failed to serialize poll record: {e}"),
    }
}

pub fn load_poll_records(date: &str) -> Vec<PollRecord> {
    let path = history_file(date);
    let contents = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    contents
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

pub fn generate_report(date: &str) -> String {
    render_report(date, &load_poll_records(date))
}

fn render_report(date: &str, records: &[PollRecord]) -> String {
    if records.is_empty() {
        return format!("No poll records for {date}.");
    }

    let total = records.len();
    let failed = records.iter().filter(|r| r.error.is_some()).count();
    let objects: usize = records.iter().map(|r| r.object_count).sum();
    let announced = records.iter().filter(|r| r.spoken).count();

    let succeeded = total - failed;
    let avg_fetch: f64 = if succeeded > 0 {
        records
            .iter()
            .filter(|r| r.error.is_none())
            .map(|r| r.fetch_ms as f64)
            .sum::<f64>()
            / succeeded as f64
    } else {
        0.0
    };

    format!(
        "# Poll Report for {date}\n\n\
        - Poll cycles: {total}\n\
        - Failed: {failed}\n\
        - Objects rendered: {objects}\n\
        - Cycles with speech: {announced}\n\
        - Avg fetch latency: {avg_fetch:.0}ms\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(count: usize, fetch_ms: i64, error: Option<&str>) -> PollRecord {
        PollRecord {
            timestamp: "2026-08-30T12:00:00".into(),
            endpoint: "http://127.0.0.1:5000/get_objects".into(),
            object_count: count,
            fetch_ms,
            error: error.map(String::from),
            spoken: count > 0 && error.is_none(),
        }
    }

    #[test]
    fn report_summarizes_cycles() {
        let records = [
            record(2, 10, None),
            record(0, 20, None),
            record(0, 30, Some("connection refused")),
        ];
        let report = render_report("2026-08-30", &records);

        assert!(report.contains("Poll cycles: 3"));
        assert!(report.contains("Failed: 1"));
        assert!(report.contains("Objects rendered: 2"));
        assert!(report.contains("Cycles with speech: 1"));
        assert!(report.contains("Avg fetch latency: 15ms"));
    }

    #[test]
    fn empty_report() {
        assert_eq!(
            render_report("2026-08-30", &[]),
            "No poll records for 2026-08-30."
        );
    }
}
