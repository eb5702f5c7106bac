//! # Kubigo Core
//!
//! Release-management client behind the Kubigo GitHub Actions.
//!
//! Each of the four actions (create-release, approve, deploy, rollback) is
//! one pass through the same pipeline:
//! - **Request Builder** turns action inputs and the run context into a
//!   single [`ApiRequest`]
//! - **Transport** performs exactly one `POST` with a per-action timeout
//! - **Response Mapper** turns the response into outputs or a classified
//!   [`Error`]
//!
//! ## Example
//!
//! ```no_run
//! use kubigo_core::{run_action, ActionKind, GitHubContext, InputMap, TracingLogger};
//!
//! # async fn example() {
//! let inputs = InputMap::new()
//!     .with("api-key", "kbg_...")
//!     .with("release-id", "rel_42");
//!
//! let result = run_action(
//!     ActionKind::Deploy,
//!     &inputs,
//!     &GitHubContext::from_env(),
//!     TracingLogger,
//! )
//! .await;
//! println!("status: {:?}", result.output("status"));
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod action;
pub mod context;
pub mod error;
pub mod http;
pub mod inputs;
pub mod output;
pub mod request;
pub mod response;
pub mod traits;
pub mod types;

pub use action::{ActionPhase, ActionRunner};
pub use context::GitHubContext;
pub use error::{Error, ErrorKind, Result};
pub use http::ReleaseApiClient;
pub use inputs::{InputMap, InputSource};
pub use output::{OutputWriter, TracingLogger, WorkflowLogger};
pub use request::RequestBuilder;
pub use traits::{Logger, Transport};
pub use types::{ActionKind, ActionResult, ApiRequest, HttpResponse};

/// Run one action against the live API
///
/// Convenience over [`ActionRunner`] with a default [`ReleaseApiClient`].
/// The result is never an `Err`: failures, including a client that cannot be
/// constructed, are reported through `logger` and carried in the returned
/// [`ActionResult`].
pub async fn run_action<L: Logger>(
    kind: ActionKind,
    inputs: &dyn InputSource,
    context: &GitHubContext,
    logger: L,
) -> ActionResult {
    let client = match ReleaseApiClient::new() {
        Ok(client) => client,
        Err(err) => {
            logger.error(&err.to_string());
            return ActionResult::failure(err);
        }
    };

    ActionRunner::new(client, logger)
        .run(kind, inputs, context)
        .await
}
