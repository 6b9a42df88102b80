use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::{self, Write};

use crate::config::OutputFormat;
use crate::entry::SessionOutcome;
use crate::report::Report;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Local>,
    #[serde(flatten)]
    report: &'a Report,
}

pub fn write_report<W: Write>(out: &mut W, report: &Report, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => write!(out, "{report}"),
        OutputFormat::Json => {
            let doc = JsonReport {
                generated_at: Local::now(),
                report,
            };
            serde_json::to_writer_pretty(&mut *out, &doc)?;
            writeln!(out)
        }
    }
}

/// Write whatever a finished session has to say: the report, or why there is none.
pub fn write_outcome<W: Write>(
    out: &mut W,
    outcome: &SessionOutcome,
    format: OutputFormat,
) -> io::Result<()> {
    match outcome {
        SessionOutcome::Report(report) => write_report(out, report, format),
        SessionOutcome::Empty => writeln!(out, "No assignments entered. Exiting."),
        SessionOutcome::Aborted => writeln!(out, "Exiting program..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryFlow;

    fn finished_report() -> Report {
        let mut flow = EntryFlow::default();
        for line in ["add", "Quiz1", "formative", "50", "100", "add", "Final", "summative", "50", "100"] {
            flow.submit(line);
        }
        flow.report().unwrap()
    }

    #[test]
    fn text_report() {
        let mut buf = Vec::new();
        write_report(&mut buf, &finished_report(), OutputFormat::Text).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("STATUS: PASS"));
        assert!(!text.contains("REASON"));
    }

    #[test]
    fn json_report_has_timestamp_and_fields() {
        let mut buf = Vec::new();
        write_report(&mut buf, &finished_report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(value["generated_at"].is_string());
        assert_eq!(value["status"], "PASS");
        assert_eq!(value["total"], 100.0);
        assert_eq!(value["gpa"], 5.0);
        assert_eq!(value["assignments"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn outcomes_without_report() {
        let mut buf = Vec::new();
        write_outcome(&mut buf, &SessionOutcome::Empty, OutputFormat::Json).unwrap();
        write_outcome(&mut buf, &SessionOutcome::Aborted, OutputFormat::Text).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "No assignments entered. Exiting.\nExiting program...\n");
    }
}
