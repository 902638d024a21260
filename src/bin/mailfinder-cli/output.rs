use anyhow::{Result, bail};
use mailfinder_lib::{Outcome, SessionError};
use serde::Serialize;

use crate::args::Cli;

const FORMATS: &[&str] = &["human", "json", "ndjson", "csv"];

/// One executed operation and what came of it.
#[derive(Debug, Serialize)]
pub struct OutputRow {
    pub line: usize,
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OutputRow {
    pub fn new(
        line: usize,
        operation: impl Into<String>,
        result: Result<Outcome, SessionError>,
    ) -> Self {
        let (outcome, error) = match result {
            Ok(outcome) => (Some(outcome), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            line,
            operation: operation.into(),
            outcome,
            error,
        }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn human_summary(&self) -> String {
        match (&self.outcome, &self.error) {
            (Some(outcome), _) => format!("[OK]    {outcome}"),
            (None, Some(error)) => format!("[ERROR] {} :: {error}", self.operation),
            (None, None) => format!("[?]     {}", self.operation),
        }
    }
}

pub fn check_format(format: &str) -> Result<()> {
    if !FORMATS.contains(&format) {
        bail!("unknown --format '{format}', use: human|json|ndjson|csv");
    }
    #[cfg(not(feature = "with-csv"))]
    if format == "csv" {
        bail!("format=csv requires the 'with-csv' feature");
    }
    Ok(())
}

/// 0 when every operation succeeded, 2 when at least one failed.
pub fn exit_code(rows: &[OutputRow]) -> i32 {
    if rows.iter().any(OutputRow::failed) { 2 } else { 0 }
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let bytes = render(rows, &cli.format)?;
    emit(bytes, cli)
}

fn render(rows: &[OutputRow], format: &str) -> Result<Vec<u8>> {
    match format {
        "human" => {
            let mut text = String::new();
            for row in rows {
                text.push_str(&row.human_summary());
                text.push('\n');
            }
            Ok(text.into_bytes())
        }
        "json" => Ok(serde_json::to_string_pretty(rows)?.into_bytes()),
        "ndjson" => {
            let mut buf = Vec::new();
            for row in rows {
                buf.extend_from_slice(serde_json::to_string(row)?.as_bytes());
                buf.push(b'\n');
            }
            Ok(buf)
        }
        "csv" => csv_bytes(rows),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

/// One CSV row per record; email lists are joined with `;`.
#[cfg(feature = "with-csv")]
fn csv_bytes(rows: &[OutputRow]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["line", "operation", "key", "value", "error"])?;
    for row in rows {
        let line = row.line.to_string();
        match (&row.outcome, &row.error) {
            (Some(outcome), _) if !outcome.records.is_empty() => {
                for (key, record) in &outcome.records {
                    let value = match record {
                        mailfinder_lib::Record::Status(status) => status.clone(),
                        mailfinder_lib::Record::Emails(emails) => emails.join(";"),
                    };
                    wtr.write_record([
                        line.as_str(),
                        row.operation.as_str(),
                        key.as_str(),
                        value.as_str(),
                        "",
                    ])?;
                }
            }
            (Some(outcome), _) => {
                let key = outcome.key.as_deref().unwrap_or("");
                wtr.write_record([line.as_str(), row.operation.as_str(), key, "", ""])?;
            }
            (None, error) => {
                let error = error.as_deref().unwrap_or("");
                wtr.write_record([line.as_str(), row.operation.as_str(), "", "", error])?;
            }
        }
    }
    Ok(wtr.into_inner()?)
}

#[cfg(not(feature = "with-csv"))]
fn csv_bytes(_rows: &[OutputRow]) -> Result<Vec<u8>> {
    bail!("format=csv requires the 'with-csv' feature")
}

fn emit(bytes: Vec<u8>, cli: &Cli) -> Result<()> {
    use std::io::Write;

    match &cli.out {
        Some(path) => write_all_atomically(path, &bytes),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            if cli.format == "json" {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
            Ok(())
        }
    }
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;
    let tmp = format!("{}.tmp", path);
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailfinder_lib::{ApiError, EmailApi, Session};

    #[derive(Clone)]
    struct FixedApi;

    impl EmailApi for FixedApi {
        fn verify_email(&self, _email: &str) -> Result<String, ApiError> {
            Ok("valid".to_string())
        }

        fn domain_search(&self, _domain: &str) -> Result<Vec<String>, ApiError> {
            Ok(vec!["a@x.com".to_string(), "b@x.com".to_string()])
        }
    }

    fn run(lines: &[&str]) -> Vec<OutputRow> {
        let mut session = Session::new(FixedApi);
        lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                session
                    .run_line(line)
                    .map(|result| OutputRow::new(idx + 1, line.trim(), result))
            })
            .collect()
    }

    #[test]
    fn check_format_accepts_known_rejects_unknown() {
        for format in ["human", "json", "ndjson"] {
            assert!(check_format(format).is_ok(), "{format}");
        }
        let err = check_format("xml").unwrap_err();
        assert!(err.to_string().contains("unknown --format 'xml'"), "{err}");
        assert_eq!(check_format("csv").is_ok(), cfg!(feature = "with-csv"));
    }

    #[test]
    fn human_summary_marks_ok_and_error_rows() {
        let rows = run(&["create email a@x.com", "create email a@x.com", "frob email a@x.com"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].human_summary(), "[OK]    created email a@x.com: valid");
        assert!(
            rows[1].human_summary().starts_with("[ERROR] create email a@x.com :: "),
            "{}",
            rows[1].human_summary()
        );
        assert!(rows[2].human_summary().starts_with("[ERROR] frob email a@x.com :: "));
        assert!(!rows[0].failed());
        assert!(rows[1].failed() && rows[2].failed());
    }

    #[test]
    fn exit_code_reflects_failures() {
        assert_eq!(exit_code(&[]), 0);
        assert_eq!(exit_code(&run(&["create email a@x.com", "read email"])), 0);
        assert_eq!(
            exit_code(&run(&["create email a@x.com", "delete email b@x.com"])),
            2
        );
    }

    #[test]
    fn ndjson_writes_one_object_per_row() {
        let rows = run(&["create domain x.com", "# skipped", "", "delete domain y.com"]);
        let text = String::from_utf8(render(&rows, "ndjson").unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["line"], 1);
        assert_eq!(first["outcome"]["records"]["x.com"][1], "b@x.com");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["line"], 4);
        assert!(second["error"].is_string());
        assert!(second.get("outcome").is_none());
    }

    #[test]
    fn render_rejects_unknown_format() {
        assert!(render(&[], "xml").is_err());
    }

    #[cfg(feature = "with-csv")]
    #[test]
    fn csv_flattens_records_and_errors() {
        let rows = run(&[
            "create domain x.com",
            "create email a@x.com",
            "read email",
            "delete email b@x.com",
        ]);
        let text = String::from_utf8(csv_bytes(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "line,operation,key,value,error");
        assert_eq!(lines[1], "1,create domain x.com,x.com,a@x.com;b@x.com,");
        assert_eq!(lines[2], "2,create email a@x.com,a@x.com,valid,");
        assert_eq!(lines[3], "3,read email,a@x.com,valid,");
        assert!(lines[4].starts_with("4,delete email b@x.com,,,"), "{}", lines[4]);
        assert_eq!(lines.len(), 5);
    }

    #[cfg(not(feature = "with-csv"))]
    #[test]
    fn csv_without_feature_is_an_error() {
        let err = csv_bytes(&[]).unwrap_err();
        assert!(err.to_string().contains("with-csv"));
    }
}
