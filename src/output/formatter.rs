//! Output formatters for run results
//!
//! Provides the text summary line and JSON renderings of a [`RunResult`].

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{RunResult, TestStatus};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }

    /// Parse, turning unknown names into an error
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| Error::Unsupported {
            what: "output format",
            value: s.to_string(),
        })
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format the result of a whole run
    pub fn format_result(&self, result: &RunResult) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Text => self.format_text(result),
            OutputFormat::Json => serde_json::to_string(result)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(result)?,
        })
    }

    fn format_text(&self, result: &RunResult) -> String {
        let line = result.to_string();
        let line = if !self.colorize {
            line
        } else if result.is_ok() {
            format!("\x1b[32m{line}\x1b[0m")
        } else {
            format!("\x1b[31m{line}\x1b[0m")
        };
        format!("{line}\t{:.3}s", result.duration_ms as f64 / 1000.0)
    }

    /// One line per test, in run order
    pub fn format_outcomes(&self, result: &RunResult) -> String {
        let mut output = String::new();
        for outcome in &result.outcomes {
            let status = if self.colorize {
                match outcome.status {
                    TestStatus::Passed => format!("\x1b[32m{outcome}\x1b[0m"),
                    TestStatus::Missed => format!("\x1b[33m{outcome}\x1b[0m"),
                    TestStatus::Failed | TestStatus::Panicked => {
                        format!("\x1b[31m{outcome}\x1b[0m")
                    }
                }
            } else {
                outcome.to_string()
            };
            output.push_str(&status);
            output.push('\n');
        }
        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Text)
    }
}

/// Write a run result to a file
pub fn write_result_to_file(
    path: impl AsRef<Path>,
    result: &RunResult,
    format: OutputFormat,
) -> Result<()> {
    let formatter = ResultFormatter::new(format).no_color();
    let content = formatter.format_result(result)?;

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestOutcome;
    use tempfile::tempdir;

    fn sample() -> RunResult {
        let mut result = RunResult::new();
        result.suites = 1;
        result.record(TestOutcome::new("Calc.TestAdd", TestStatus::Passed, 1));
        result.record(TestOutcome::new("Calc.TestDiv", TestStatus::Panicked, 0));
        result
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TEXT"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("csv"), None);
        assert!(OutputFormat::parse("csv").is_err());
    }

    #[test]
    fn test_text_summary() {
        let formatter = ResultFormatter::new(OutputFormat::Text).no_color();
        let text = formatter.format_result(&sample()).unwrap();
        assert!(text.starts_with("OOPS: 1 passed, 1 PANICKED\t"));
    }

    #[test]
    fn test_json_summary() {
        let formatter = ResultFormatter::new(OutputFormat::Json);
        let json = formatter.format_result(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["passed"], 1);
        assert_eq!(value["outcomes"][1]["status"], "panicked");
    }

    #[test]
    fn test_outcome_lines() {
        let formatter = ResultFormatter::default().no_color();
        let lines = formatter.format_outcomes(&sample());
        assert_eq!(lines.lines().count(), 2);
        assert!(lines.contains("PANIC Calc.TestDiv"));
    }

    #[test]
    fn test_write_result_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("result.json");
        write_result_to_file(&path, &sample(), OutputFormat::JsonPretty).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"suites\": 1"));
    }
}
