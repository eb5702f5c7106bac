//! Action runner: Builder → Transport → Mapper, once, no retries

use crate::context::GitHubContext;
use crate::error::Result;
use crate::inputs::{optional, InputSource};
use crate::request::{RequestBuilder, DEFAULT_ROLLBACK_REASON};
use crate::response::{map_response, MappedResponse, ReleaseSummary};
use crate::traits::{Logger, Transport};
use crate::types::{ActionKind, ActionResult, ApiRequest};

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    /// Not started
    Idle,
    /// Checking required inputs
    Validating,
    /// Building the API request
    Building,
    /// Waiting on the transport
    Sending,
    /// Outputs produced
    Success,
    /// Error reported
    Failure,
}

impl ActionPhase {
    /// Success and Failure are terminal
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }

    /// Whether `next` may follow `self`
    ///
    /// Strictly forward; any non-terminal phase may fail.
    pub const fn can_advance_to(&self, next: ActionPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Validating)
                | (Self::Validating, Self::Building)
                | (Self::Building, Self::Sending)
                | (Self::Sending, Self::Success)
                | (Self::Idle | Self::Validating | Self::Building | Self::Sending, Self::Failure)
        )
    }
}

struct PhaseTracker {
    kind: ActionKind,
    current: ActionPhase,
}

impl PhaseTracker {
    fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            current: ActionPhase::Idle,
        }
    }

    fn advance(&mut self, next: ActionPhase) {
        debug_assert!(
            self.current.can_advance_to(next),
            "invalid transition {:?} -> {:?}",
            self.current,
            next
        );
        tracing::debug!(action = %self.kind, from = ?self.current, to = ?next, "phase");
        self.current = next;
    }
}

/// Executes one action against a transport, reporting through a logger
pub struct ActionRunner<T, L> {
    transport: T,
    logger: L,
}

impl<T: Transport, L: Logger> ActionRunner<T, L> {
    /// Create a runner
    pub fn new(transport: T, logger: L) -> Self {
        Self { transport, logger }
    }

    /// The runner's logger
    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// The runner's transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Take the runner apart
    pub fn into_parts(self) -> (T, L) {
        (self.transport, self.logger)
    }

    /// Run `kind` to completion
    ///
    /// Never fails: every error becomes a failure result and is reported
    /// exactly once through the logger.
    pub async fn run(
        &self,
        kind: ActionKind,
        inputs: &dyn InputSource,
        context: &GitHubContext,
    ) -> ActionResult {
        let mut phase = PhaseTracker::new(kind);

        match self.execute(kind, inputs, context, &mut phase).await {
            Ok(mapped) => {
                phase.advance(ActionPhase::Success);
                ActionResult::success(mapped.outputs)
            }
            Err(err) => {
                phase.advance(ActionPhase::Failure);
                self.logger.error(&err.to_string());
                ActionResult::failure(err)
            }
        }
    }

    async fn execute(
        &self,
        kind: ActionKind,
        inputs: &dyn InputSource,
        context: &GitHubContext,
        phase: &mut PhaseTracker,
    ) -> Result<MappedResponse> {
        let builder = RequestBuilder::new(inputs, context);

        phase.advance(ActionPhase::Validating);
        builder.validate(kind)?;

        phase.advance(ActionPhase::Building);
        let request = builder.build(kind)?;
        self.announce(&request, inputs);

        phase.advance(ActionPhase::Sending);
        let response = self.transport.send(&request).await?;
        self.logger
            .debug(&format!("Response status: {}", response.status));

        let mapped = map_response(kind, &response).inspect_err(|err| {
            if err.is_api_response() {
                self.logger
                    .debug(&format!("Response data: {}", response.body));
            }
        })?;

        self.report_success(kind, &mapped, inputs);
        Ok(mapped)
    }

    /// Log what is about to be sent
    fn announce(&self, request: &ApiRequest, inputs: &dyn InputSource) {
        let log = &self.logger;
        let body = &request.body;
        let id = || {
            let name = match request.action {
                ActionKind::Rollback => "target-id",
                _ => "release-id",
            };
            optional(inputs, name).unwrap_or_default()
        };

        match request.action {
            ActionKind::CreateRelease => {
                let images: Vec<&str> = body["imageTags"]
                    .as_array()
                    .map(|tags| tags.iter().filter_map(|t| t.as_str()).collect())
                    .unwrap_or_default();
                let sha = body["commitSha"].as_str().unwrap_or("");

                log.info(&format!(
                    "Creating release for service: {}",
                    body["service"].as_str().unwrap_or("")
                ));
                log.info(&format!("Images ({}):", images.len()));
                for image in &images {
                    log.info(&format!("   - {}", image));
                }
                log.info(&format!("Target: {}", body["target"].as_str().unwrap_or("")));
                log.info(&format!("Commit: {}", short_sha(sha)));
                log.info("Platform: GitHub Actions");
            }
            ActionKind::Approve => log.info(&format!("Approving release {}...", id())),
            ActionKind::Deploy => log.info(&format!("Deploying release {}...", id())),
            ActionKind::Rollback => log.info(&format!("Rolling back target {}...", id())),
        }

        log.debug(&format!("POST {}", request.url));
        if let Ok(payload) = serde_json::to_string_pretty(body) {
            log.debug(&format!("Full payload: {}", payload));
        }
    }

    /// Log the success summary for `kind`
    fn report_success(&self, kind: ActionKind, mapped: &MappedResponse, inputs: &dyn InputSource) {
        let log = &self.logger;
        let out = |name: &str| mapped.outputs.get(name).map(String::as_str).unwrap_or("");

        match kind {
            ActionKind::CreateRelease => {
                if let Some(message) = mapped.message() {
                    log.info(message);
                }
                log.info(&format!("Releases created: {}", out("releases-created")));
                log.info(&format!("Auto-deployed: {}", out("releases-auto-deployed")));

                let releases = ReleaseSummary::from_body(&mapped.body);
                if !releases.is_empty() {
                    log.group("Release Details", || {
                        for release in &releases {
                            let marker = if release.auto_deployed { "[deployed]" } else { "[paused]" };
                            let note = if release.requires_approval {
                                " (requires approval)"
                            } else {
                                ""
                            };
                            log.info(&format!(
                                "{} {}: {}{}",
                                marker, release.target_name, release.status, note
                            ));
                        }
                    });
                }
                log.info("Release creation completed successfully!");
            }
            ActionKind::Approve => {
                log.info("Release approved successfully!");
                log.info(&format!("Status: {}", out("status")));
                if let Some(comment) = optional(inputs, "comment") {
                    log.info(&format!("Comment: {}", comment));
                }
            }
            ActionKind::Deploy => {
                log.info("Release deployed successfully!");
                log.info(&format!("Status: {}", out("status")));
                log.info(&format!("Deployed at: {}", out("deployed-at")));
            }
            ActionKind::Rollback => {
                log.info("Rollback completed successfully!");
                log.info(&format!("New release ID: {}", out("release-id")));
                log.info(&format!("Status: {}", out("status")));
                let reason = optional(inputs, "reason")
                    .unwrap_or_else(|| DEFAULT_ROLLBACK_REASON.to_string());
                log.info(&format!("Reason: {}", reason));
            }
        }
    }
}

/// First seven characters of a commit SHA
fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(7) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}
