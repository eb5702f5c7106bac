//! GitHub workflow command rendering and the logger implementations

use crate::traits::Logger;
use parking_lot::Mutex;
use std::io::Write;

/// Escape a workflow command message (percent-encoding special chars)
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Logger that speaks the runner's workflow-command protocol
///
/// `info` lines are written verbatim; everything else becomes a `::cmd::`
/// line the runner turns into debug output, annotations or log groups.
pub struct WorkflowLogger<W: Write> {
    out: Mutex<W>,
}

impl WorkflowLogger<std::io::Stdout> {
    /// Logger writing to the process stdout
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> WorkflowLogger<W> {
    /// Logger writing to an arbitrary sink
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the sink
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn line(&self, line: &str) {
        let mut out = self.out.lock();
        // A closed stdout must not abort the run
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }

    fn command(&self, name: &str, message: &str) {
        self.line(&format!("::{}::{}", name, escape_data(message)));
    }
}

impl<W: Write> Logger for WorkflowLogger<W> {
    fn info(&self, message: &str) {
        self.line(message);
    }

    fn debug(&self, message: &str) {
        self.command("debug", message);
    }

    fn warning(&self, message: &str) {
        self.command("warning", message);
    }

    fn error(&self, message: &str) {
        self.command("error", message);
    }

    fn start_group(&self, name: &str) {
        self.command("group", name);
    }

    fn end_group(&self) {
        self.line("::endgroup::");
    }
}

/// Logger forwarding to `tracing`, for runs outside a workflow
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }

    fn start_group(&self, name: &str) {
        tracing::info!(group = name, "{}", name);
    }

    fn end_group(&self) {}
}
