//! Per-action request construction

use super::{DEFAULT_API_URL, DEFAULT_ROLLBACK_REASON, DEFAULT_TRIGGERED_BY, PROVIDER};
use crate::context::GitHubContext;
use crate::error::Result;
use crate::inputs::{optional, parse_image_list, required, Fallback, InputSource};
use crate::request::endpoint::endpoint_url;
use crate::types::{
    ActionKind, ApiRequest, ApproveRequest, DeployRequest, ReleaseMetadata, ReleaseRequest,
    RollbackRequest,
};

/// Builds the canonical request for an action from inputs and run context
///
/// Pure: no environment access, no clock. Identical inputs and context always
/// produce an identical [`ApiRequest`].
pub struct RequestBuilder<'a> {
    inputs: &'a dyn InputSource,
    context: &'a GitHubContext,
}

impl<'a> RequestBuilder<'a> {
    /// Create a builder over the given inputs and context
    pub fn new(inputs: &'a dyn InputSource, context: &'a GitHubContext) -> Self {
        Self { inputs, context }
    }

    /// API base URL: `api-url`, then `kubigo-url`, then the public default
    pub fn api_base_url(&self) -> String {
        Fallback::input(self.inputs, "api-url")
            .or(optional(self.inputs, "kubigo-url"))
            .or_default(DEFAULT_API_URL)
            .resolve()
            .trim_end_matches('/')
            .to_string()
    }

    /// Inputs that must be non-blank for `kind`, in check order
    pub fn required_inputs(kind: ActionKind) -> &'static [&'static str] {
        match kind {
            ActionKind::CreateRelease => &["api-key", "service", "images", "target"],
            ActionKind::Approve | ActionKind::Deploy => &["api-key", "release-id"],
            ActionKind::Rollback => &["api-key", "target-id"],
        }
    }

    /// Check required inputs and the image list without building anything
    pub fn validate(&self, kind: ActionKind) -> Result<()> {
        for name in Self::required_inputs(kind) {
            required(self.inputs, name)?;
        }
        if kind == ActionKind::CreateRelease {
            parse_image_list(&required(self.inputs, "images")?)?;
        }
        Ok(())
    }

    /// Validate inputs and build the request for `kind`
    pub fn build(&self, kind: ActionKind) -> Result<ApiRequest> {
        let api_key = required(self.inputs, "api-key")?;

        let (body, id) = match kind {
            ActionKind::CreateRelease => (serde_json::to_value(self.release_request()?)?, None),
            ActionKind::Approve => {
                let id = required(self.inputs, "release-id")?;
                (serde_json::to_value(self.approve_request())?, Some(id))
            }
            ActionKind::Deploy => {
                let id = required(self.inputs, "release-id")?;
                (serde_json::to_value(DeployRequest::default())?, Some(id))
            }
            ActionKind::Rollback => {
                let id = required(self.inputs, "target-id")?;
                (serde_json::to_value(self.rollback_request())?, Some(id))
            }
        };

        let base_url = self.api_base_url();
        let url = endpoint_url(&base_url, kind, id.as_deref())?;

        Ok(ApiRequest {
            action: kind,
            url,
            base_url,
            api_key,
            body,
            timeout: kind.timeout(),
        })
    }

    /// Webhook payload for create-release
    ///
    /// Required inputs are checked in declaration order (`service`, `images`,
    /// `target`) before the image list is parsed.
    pub fn release_request(&self) -> Result<ReleaseRequest> {
        let service = required(self.inputs, "service")?;
        let images = required(self.inputs, "images")?;
        let target = required(self.inputs, "target")?;
        let image_tags = parse_image_list(&images)?;

        let ctx = self.context;

        Ok(ReleaseRequest {
            service,
            image_tags,
            target,
            commit_sha: Fallback::input(self.inputs, "commit-sha")
                .or_value(ctx.sha.as_str())
                .resolve(),
            repository_url: Fallback::input(self.inputs, "repository-url")
                .or_value(ctx.repository_url())
                .resolve(),
            branch: Fallback::input(self.inputs, "branch")
                .or_value(ctx.branch())
                .resolve(),
            triggered_by: Fallback::input(self.inputs, "triggered-by")
                .or_default(DEFAULT_TRIGGERED_BY)
                .resolve(),
            metadata: ReleaseMetadata {
                build_number: ctx.run_number.clone(),
                build_url: ctx.build_url(),
                author: ctx.actor.clone(),
                commit_message: ctx.head_commit_message.clone(),
                provider: PROVIDER.to_string(),
                workflow: ctx.workflow.clone(),
                job: ctx.job.clone(),
                event_name: ctx.event_name.clone(),
            },
        })
    }

    /// Approve payload; `comment` defaults to `""`
    pub fn approve_request(&self) -> ApproveRequest {
        ApproveRequest {
            comment: Fallback::input(self.inputs, "comment").resolve(),
        }
    }

    /// Rollback payload; `reason` falls back to a fixed message
    pub fn rollback_request(&self) -> RollbackRequest {
        RollbackRequest {
            reason: Fallback::input(self.inputs, "reason")
                .or_default(DEFAULT_ROLLBACK_REASON)
                .resolve(),
        }
    }
}
