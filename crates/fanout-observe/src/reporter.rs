//! Console implementation of the per-target output seam.
use std::io::IsTerminal;

use fanout_core::Report;
use fanout_model::TargetLabel;

/// Reporter printing labeled, colored task output to the console.
///
/// Task stdout and status lines go to stdout, task stderr to stderr, each
/// line prefixed with the target's bracketed name and wrapped in the
/// target's palette color when color is on. Tracing output goes to stderr
/// separately, so piping stdout yields only task output.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReport {
    use_color: bool,
}

impl ConsoleReport {
    /// Reporter with an explicit color setting.
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Reporter coloring only when stdout is a terminal.
    pub fn auto() -> Self {
        Self::new(std::io::stdout().is_terminal())
    }
}

impl Report for ConsoleReport {
    fn stdout_line(&self, label: &TargetLabel, line: &str) {
        println!("{}", label.paint(line, self.use_color));
    }

    fn stderr_line(&self, label: &TargetLabel, line: &str) {
        eprintln!("{}", label.paint(line, self.use_color));
    }

    fn status(&self, label: &TargetLabel, message: &str) {
        println!("{}", label.paint(message, self.use_color));
    }
}

#[cfg(test)]
mod tests {
    use super::ConsoleReport;
    use fanout_core::Report;
    use fanout_model::{Target, TargetLabel};

    #[test]
    fn reporter_is_cheap_to_share() {
        let report = ConsoleReport::new(false);
        let label = TargetLabel::detached(Target::new("base"));

        // Smoke: printing must not panic with or without color.
        report.stdout_line(&label, "deployed");
        ConsoleReport::new(true).status(&label, "completed");
    }
}
