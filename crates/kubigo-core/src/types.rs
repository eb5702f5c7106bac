//! Core type definitions shared by the builder, transport and mapper

use crate::error::{Error, ErrorKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// The four release-management actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActionKind {
    /// Batch release creation through the webhook endpoint
    CreateRelease,
    /// Approve an existing release
    Approve,
    /// Deploy an existing release
    Deploy,
    /// Roll a target back to its previous release
    Rollback,
}

impl ActionKind {
    /// All actions, in a stable order
    pub const ALL: [ActionKind; 4] = [
        ActionKind::CreateRelease,
        ActionKind::Approve,
        ActionKind::Deploy,
        ActionKind::Rollback,
    ];

    /// Action name as used for the CLI subcommand
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateRelease => "create-release",
            Self::Approve => "approve",
            Self::Deploy => "deploy",
            Self::Rollback => "rollback",
        }
    }

    /// Request timeout. Deploy and rollback may do real work synchronously.
    #[inline]
    pub const fn timeout(&self) -> Duration {
        match self {
            Self::CreateRelease | Self::Approve => Duration::from_secs(30),
            Self::Deploy | Self::Rollback => Duration::from_secs(60),
        }
    }

    /// Message used when the API answers 404
    pub const fn not_found_message(&self) -> &'static str {
        match self {
            Self::CreateRelease => "Service not found. Verify repository URL and branch match your Kubigo service configuration.",
            Self::Approve | Self::Deploy => "Release not found. Please verify the release ID.",
            Self::Rollback => "Target not found. Please verify the target ID.",
        }
    }

    /// Noun prefixed to `"... failed: <reason>"` messages
    pub const fn failure_prefix(&self) -> &'static str {
        match self {
            Self::CreateRelease => "Release creation",
            Self::Approve => "Approval",
            Self::Deploy => "Deployment",
            Self::Rollback => "Rollback",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build metadata attached to a webhook release request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseMetadata {
    /// Run number
    pub build_number: String,
    /// Link to the run
    pub build_url: String,
    /// Actor that triggered the run
    pub author: String,
    /// Head commit message, push events only
    pub commit_message: String,
    /// Always `github-actions`
    pub provider: String,
    /// Workflow name
    pub workflow: String,
    /// Job id
    pub job: String,
    /// Triggering event
    pub event_name: String,
}

/// Webhook payload for batch release creation
///
/// Optional fields are always present, as empty strings when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRequest {
    /// Service name or ID
    pub service: String,
    /// Images to deploy, never empty
    pub image_tags: Vec<String>,
    /// Target environment
    pub target: String,
    /// Commit the images were built from
    pub commit_sha: String,
    /// Repository the service is matched on
    pub repository_url: String,
    /// Branch the service is matched on
    pub branch: String,
    /// Free-form trigger label
    pub triggered_by: String,
    /// Build metadata
    pub metadata: ReleaseMetadata,
}

/// Body of an approve request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApproveRequest {
    /// Approval comment, possibly empty
    pub comment: String,
}

/// Body of a deploy request (always `{}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployRequest {}

/// Body of a rollback request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackRequest {
    /// Recorded reason
    pub reason: String,
}

/// A fully-built API call, independent of any HTTP library
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    /// Action this request belongs to
    pub action: ActionKind,
    /// Absolute endpoint URL
    pub url: String,
    /// Base URL the endpoint was derived from, used in network error messages
    pub base_url: String,
    /// Value of the `X-API-Key` header
    pub api_key: String,
    /// JSON body
    pub body: serde_json::Value,
    /// Upper bound on the whole round-trip
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("action", &self.action)
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("body", &self.body)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Raw HTTP response as returned by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw body text, possibly empty
    pub body: String,
}

impl HttpResponse {
    /// Construct a response from status and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Terminal outcome of one action run
///
/// Success results carry `success="true"` plus endpoint outputs; failure
/// results carry only `success="false"` and the classified error.
#[derive(Debug)]
pub struct ActionResult {
    success: bool,
    outputs: BTreeMap<String, String>,
    failure: Option<Error>,
}

impl ActionResult {
    /// Successful run with the given data outputs
    pub fn success(mut outputs: BTreeMap<String, String>) -> Self {
        outputs.insert("success".to_string(), "true".to_string());
        Self {
            success: true,
            outputs,
            failure: None,
        }
    }

    /// Failed run; no data outputs survive
    pub fn failure(error: Error) -> Self {
        let mut outputs = BTreeMap::new();
        outputs.insert("success".to_string(), "false".to_string());
        Self {
            success: false,
            outputs,
            failure: Some(error),
        }
    }

    /// Whether the run succeeded
    #[inline]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Outputs to publish
    #[inline]
    pub fn outputs(&self) -> &BTreeMap<String, String> {
        &self.outputs
    }

    /// Single output by name
    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).map(String::as_str)
    }

    /// The classified error, for failed runs
    #[inline]
    pub fn error(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    /// Error category, for failed runs
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.failure.as_ref().map(Error::kind)
    }

    /// Human-readable failure message, for failed runs
    pub fn failure_message(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }

    /// Process exit code for this result
    #[inline]
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }
}
