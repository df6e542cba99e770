use std::fmt::Write;

use owo_colors::OwoColorize;

use minversions_diagnostics::Reporter;

use crate::printer::Printer;

/// Prints diagnostics to stderr, in the format of `tox`'s action log.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TerminalReporter {
    printer: Printer,
}

impl TerminalReporter {
    pub(crate) fn new(printer: Printer) -> Self {
        Self { printer }
    }
}

impl Reporter for TerminalReporter {
    fn activity(&self, env: &str, name: &str, detail: &str) {
        writeln!(
            self.printer.stderr(),
            "{} {}: {detail}",
            env.bold(),
            name.cyan()
        )
        .ok();
    }

    fn warning(&self, message: &str) {
        writeln!(
            self.printer.stderr(),
            "{}: {message}",
            "WARNING".yellow().bold()
        )
        .ok();
    }

    fn error(&self, message: &str) {
        writeln!(self.printer.stderr(), "{}: {message}", "ERROR".red().bold()).ok();
    }
}
