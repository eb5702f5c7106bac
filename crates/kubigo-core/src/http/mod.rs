//! HTTP transport for the release-management API

pub mod client;

pub use client::ReleaseApiClient;
