//! Output publishing and log formatting

pub mod commands;
pub mod format;
pub mod writer;

pub use commands::{TracingLogger, WorkflowLogger};
pub use writer::OutputWriter;
