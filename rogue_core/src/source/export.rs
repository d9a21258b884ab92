//! JSON-lines export of computed breakdowns

use crate::breakdown::DamageBreakdown;
use crate::source::BreakdownSink;
use std::io::Write;
use tracing::warn;

/// Writes one JSON object per breakdown
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    written: usize,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesSink { writer, written: 0 }
    }

    /// Breakdowns written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> BreakdownSink for JsonLinesSink<W> {
    fn export(&mut self, breakdown: &DamageBreakdown) {
        let result = serde_json::to_writer(&mut self.writer, breakdown)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        match result {
            Ok(()) => self.written += 1,
            // Export failures never fail the computation
            Err(err) => warn!(%err, "failed to export breakdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_json_lines() {
        let mut sink = JsonLinesSink::new(Vec::new());
        let mut breakdown = DamageBreakdown::new();
        breakdown.insert("backstab", 100.0);
        sink.export(&breakdown);
        breakdown.insert("eviscerate", 50.5);
        sink.export(&breakdown);

        assert_eq!(sink.written(), 2);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, vec![
            r#"{"backstab":100.0}"#,
            r#"{"backstab":100.0,"eviscerate":50.5}"#,
        ]);
    }
}
