//! Port traits: the seams between the action core and its collaborators

use crate::error::Result;
use crate::types::{ApiRequest, HttpResponse};
use std::future::Future;

/// Executes one fully-built API request
///
/// Implementations perform exactly one round-trip with no retries and must
/// honour `request.timeout`. Any HTTP status, 2xx or not, is returned as an
/// [`HttpResponse`]; only failures to obtain a response are errors.
pub trait Transport {
    /// Send the request and wait for the response or the timeout
    fn send(&self, request: &ApiRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// Line-oriented log sink with scoped grouping
pub trait Logger {
    /// Informational line, always shown
    fn info(&self, message: &str);

    /// Debug line, shown only when step debugging is enabled
    fn debug(&self, message: &str);

    /// Warning annotation
    fn warning(&self, message: &str);

    /// Error annotation
    fn error(&self, message: &str);

    /// Open a collapsible group
    fn start_group(&self, name: &str);

    /// Close the innermost group
    fn end_group(&self);

    /// Run `f` inside a named group
    fn group<R>(&self, name: &str, f: impl FnOnce() -> R) -> R
    where
        Self: Sized,
    {
        self.start_group(name);
        let out = f();
        self.end_group();
        out
    }
}
