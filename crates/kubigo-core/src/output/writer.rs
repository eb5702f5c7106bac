//! `$GITHUB_OUTPUT` file writer

use crate::error::Result;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

const DELIMITER_BASE: &str = "KUBIGO_EOF";

/// Appends step outputs to the runner's output file
#[derive(Debug, Clone)]
pub struct OutputWriter {
    path: PathBuf,
}

impl OutputWriter {
    /// Writer for an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Writer for the file named by `GITHUB_OUTPUT`, if set
    pub fn from_env() -> Option<Self> {
        std::env::var_os("GITHUB_OUTPUT")
            .filter(|p| !p.is_empty())
            .map(Self::new)
    }

    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append all outputs
    pub fn write(&self, outputs: &BTreeMap<String, String>) -> Result<()> {
        let mut f = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        f.write_all(Self::render(outputs).as_bytes())?;
        f.flush()?;
        Ok(())
    }

    /// Render outputs in the heredoc form `name<<DELIM\nvalue\nDELIM\n`
    ///
    /// The delimiter is chosen so it never occurs inside any value.
    pub fn render(outputs: &BTreeMap<String, String>) -> String {
        let delim = choose_delimiter(outputs.values().map(String::as_str));
        let mut buf = String::with_capacity(outputs.len() * 48);
        for (name, value) in outputs {
            buf.push_str(name);
            buf.push_str("<<");
            buf.push_str(&delim);
            buf.push('\n');
            buf.push_str(value);
            buf.push('\n');
            buf.push_str(&delim);
            buf.push('\n');
        }
        buf
    }
}

fn choose_delimiter<'a>(values: impl Iterator<Item = &'a str> + Clone) -> String {
    let mut delim = DELIMITER_BASE.to_string();
    let mut n = 0u32;
    while values.clone().any(|v| v.contains(&delim)) {
        n += 1;
        delim = format!("{}_{}", DELIMITER_BASE, n);
    }
    delim
}
