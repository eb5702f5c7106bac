//! Action input access and normalization
//!
//! The runner hands every input over as a plain string; GitHub sets unset
//! optional inputs to `""`, so blank and absent are treated the same.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// Source of named string inputs (the CI runner's `with:` block)
pub trait InputSource {
    /// Raw value of an input, `None` when not provided
    fn get(&self, name: &str) -> Option<String>;
}

impl InputSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl InputSource for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        BTreeMap::get(self, name).cloned()
    }
}

impl<T: InputSource + ?Sized> InputSource for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

/// Owned input map with a builder-style API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputMap(BTreeMap<String, String>);

impl InputMap {
    /// Empty input map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input, returning the map
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace an input
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Add an input only when a value is present
    pub fn insert_opt(&mut self, name: &str, value: Option<String>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }
}

impl InputSource for InputMap {
    fn get(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for InputMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Trimmed value of an input, `None` when absent or blank
pub fn optional(source: &dyn InputSource, name: &str) -> Option<String> {
    source
        .get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trimmed value of a required input
///
/// Fails with a validation error naming the input when it is absent or blank.
pub fn required(source: &dyn InputSource, name: &str) -> Result<String> {
    optional(source, name).ok_or_else(|| Error::missing_input(name))
}

/// Split a comma- or newline-separated image list
///
/// Elements are trimmed, empty elements dropped, order preserved.
pub fn parse_image_list(raw: &str) -> Result<Vec<String>> {
    let images: Vec<String> = raw
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if images.is_empty() {
        return Err(Error::Validation(
            "At least one image must be provided".to_string(),
        ));
    }
    Ok(images)
}

/// Branch name for a git ref: `refs/heads/` is stripped, other refs pass through
#[inline]
pub fn branch_from_ref(git_ref: &str) -> &str {
    git_ref.strip_prefix("refs/heads/").unwrap_or(git_ref)
}

/// Ordered fallback chain for an optional field
///
/// Candidates are evaluated left to right; the first non-blank value wins.
/// An exhausted chain resolves to `""`, never to a missing value.
#[derive(Debug, Default)]
pub struct Fallback {
    candidates: Vec<Option<String>>,
}

impl Fallback {
    /// Empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain starting with an input value
    pub fn input(source: &dyn InputSource, name: &str) -> Self {
        Self::new().or(optional(source, name))
    }

    /// Append a candidate
    pub fn or(mut self, candidate: Option<String>) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Append a candidate computed from a non-empty string
    pub fn or_value(self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.or(Some(value))
    }

    /// Append a fixed literal default
    pub fn or_default(self, literal: &str) -> Self {
        self.or_value(literal)
    }

    /// First non-blank candidate, or `""`
    pub fn resolve(self) -> String {
        self.candidates
            .into_iter()
            .flatten()
            .find(|v| !v.trim().is_empty())
            .unwrap_or_default()
    }
}
