//! Fault reports
//!
//! Renders fault records and failures into the fixed text blocks written to
//! the run's output sink as the run proceeds.

use std::io::Write;
use tracing::warn;

use crate::models::{FaultKind, FaultRecord, Site};

/// Line separating report blocks
pub const SEPARATOR: &str =
    "----------------------------------------------------------------------";

/// Render a fault record as a PANIC block
pub fn render_fault(record: &FaultRecord) -> String {
    let mut output = block_header("PANIC", &record.site, &record.qualified_name);

    match record.kind {
        FaultKind::Raised { token } => {
            output.push_str(&format!("... Panic: {} (PC={:#X})\n", record.message, token));
            output.push('\n');
            for frame in &record.frames {
                output.push_str(&format!("{}\n  in {}\n", frame.site, frame.function));
            }
        }
        FaultKind::Signature | FaultKind::Cascade => {
            output.push_str(&format!("... Panic: {}\n", record.message));
        }
    }

    output
}

/// Render the log of a method that failed without panicking
pub fn render_failure(site: &Site, qualified_name: &str, messages: &[String]) -> String {
    let mut output = block_header("FAIL", site, qualified_name);
    for message in messages {
        output.push_str(message);
        output.push('\n');
    }
    output
}

fn block_header(label: &str, site: &Site, qualified_name: &str) -> String {
    format!(
        "\n{SEPARATOR}\n{label}: {}:{}: {qualified_name}\n\n",
        site.file_name(),
        site.line
    )
}

/// Appends rendered blocks to a sink in call order
pub struct Reporter<'w> {
    sink: &'w mut dyn Write,
}

impl<'w> Reporter<'w> {
    pub fn new(sink: &'w mut dyn Write) -> Self {
        Self { sink }
    }

    pub fn fault(&mut self, record: &FaultRecord) {
        self.write(&render_fault(record));
    }

    pub fn failure(&mut self, site: &Site, qualified_name: &str, messages: &[String]) {
        self.write(&render_failure(site, qualified_name, messages));
    }

    /// One-line status such as `PASS: fixture.rs:12: Suite.TestName`
    pub fn status(&mut self, label: &str, site: &Site, qualified_name: &str) {
        self.write(&format!(
            "{label}: {}:{}: {qualified_name}\n",
            site.file_name(),
            site.line
        ));
    }

    fn write(&mut self, text: &str) {
        let written = self
            .sink
            .write_all(text.as_bytes())
            .and_then(|_| self.sink.flush());
        if let Err(e) = written {
            warn!("Failed to write report: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frame;
    use std::io;

    #[test]
    fn test_raised_block_layout() {
        let record = FaultRecord::raised(
            Site::new("/work/tests/fixture.rs", 20),
            "FixtureHelper.Test1",
            "Test1",
            0xAB12,
            None,
            vec![
                Frame::new(
                    Site::new("/rustc/core/src/panicking.rs", 75),
                    "core::panicking::panic_fmt",
                ),
                Frame::new(
                    Site::new("/work/tests/fixture.rs", 33),
                    "fixture::FixtureHelper::trace",
                ),
            ],
        );

        let expected = format!(
            "\n{SEPARATOR}\n\
             PANIC: fixture.rs:20: FixtureHelper.Test1\n\
             \n\
             ... Panic: Test1 (PC=0xAB12)\n\
             \n\
             /rustc/core/src/panicking.rs:75\n  in core::panicking::panic_fmt\n\
             /work/tests/fixture.rs:33\n  in fixture::FixtureHelper::trace\n"
        );
        assert_eq!(render_fault(&record), expected);
    }

    #[test]
    fn test_synthetic_block_layout() {
        let record = FaultRecord::cascade(Site::new("fixture.rs", 40), "FixtureHelper.Test1");
        assert_eq!(
            render_fault(&record),
            format!(
                "\n{SEPARATOR}\nPANIC: fixture.rs:40: FixtureHelper.Test1\n\n\
                 ... Panic: Fixture has panicked (see related PANIC)\n"
            )
        );
    }

    #[test]
    fn test_failure_block() {
        let text = render_failure(
            &Site::new("suite.rs", 9),
            "Calc.TestAdd",
            &["first".to_string(), "second".to_string()],
        );
        assert!(text.starts_with(&format!("\n{SEPARATOR}\nFAIL: suite.rs:9: Calc.TestAdd\n\n")));
        assert!(text.ends_with("first\nsecond\n"));
    }

    #[test]
    fn test_reporter_appends_in_order() {
        let mut sink = Vec::new();
        {
            let mut reporter = Reporter::new(&mut sink);
            reporter.status("PASS", &Site::new("a.rs", 1), "S.TestA");
            reporter.status("MISS", &Site::new("a.rs", 2), "S.TestB");
        }
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "PASS: a.rs:1: S.TestA\nMISS: a.rs:2: S.TestB\n"
        );
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_do_not_panic() {
        let mut sink = BrokenSink;
        let mut reporter = Reporter::new(&mut sink);
        reporter.status("PASS", &Site::new("a.rs", 1), "S.TestA");
    }
}
