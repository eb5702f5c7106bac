//! Request Builder: inputs + run context → one canonical API request

pub mod builder;
pub mod endpoint;

pub use builder::RequestBuilder;
pub use endpoint::endpoint_url;

/// Base URL used when neither `api-url` nor `kubigo-url` is set
pub const DEFAULT_API_URL: &str = "https://app.kubigo.cloud";

/// `triggeredBy` when the `triggered-by` input is unset
pub const DEFAULT_TRIGGERED_BY: &str = "github-actions";

/// Provider recorded in release metadata
pub const PROVIDER: &str = "github-actions";

/// Rollback reason when the `reason` input is unset
pub const DEFAULT_ROLLBACK_REASON: &str = "Rollback initiated from GitHub Actions";
