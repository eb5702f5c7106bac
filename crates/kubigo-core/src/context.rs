//! GitHub Actions run context
//!
//! Explicit replacement for ambient `GITHUB_*` lookups: everything the
//! request builder derives from the run is read once into [`GitHubContext`]
//! and passed in by value.

use crate::inputs::branch_from_ref;
use std::path::Path;

const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Snapshot of the workflow run the action executes in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitHubContext {
    /// e.g. `https://github.com`
    pub server_url: String,
    /// Owner half of `GITHUB_REPOSITORY`
    pub repository_owner: String,
    /// Repository half of `GITHUB_REPOSITORY`
    pub repository_name: String,
    /// Full ref that triggered the run, e.g. `refs/heads/main`
    pub git_ref: String,
    /// Commit SHA of the run
    pub sha: String,
    /// User that triggered the run
    pub actor: String,
    /// Per-workflow run counter
    pub run_number: String,
    /// Globally unique run id
    pub run_id: String,
    /// Workflow name
    pub workflow: String,
    /// Job id
    pub job: String,
    /// Triggering event, e.g. `push`
    pub event_name: String,
    /// `head_commit.message` from the event payload, push events only
    pub head_commit_message: String,
}

impl GitHubContext {
    /// Load from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup
    ///
    /// Missing variables become empty strings; a missing or unreadable event
    /// payload leaves `head_commit_message` empty.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).unwrap_or_default();

        let server_url = lookup("GITHUB_SERVER_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let (repository_owner, repository_name) = split_repository(&var("GITHUB_REPOSITORY"));

        let head_commit_message = lookup("GITHUB_EVENT_PATH")
            .filter(|p| !p.is_empty())
            .map(|p| read_head_commit_message(Path::new(&p)))
            .unwrap_or_default();

        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            repository_owner,
            repository_name,
            git_ref: var("GITHUB_REF"),
            sha: var("GITHUB_SHA"),
            actor: var("GITHUB_ACTOR"),
            run_number: var("GITHUB_RUN_NUMBER"),
            run_id: var("GITHUB_RUN_ID"),
            workflow: var("GITHUB_WORKFLOW"),
            job: var("GITHUB_JOB"),
            event_name: var("GITHUB_EVENT_NAME"),
            head_commit_message,
        }
    }

    /// `{server}/{owner}/{repo}`, empty when the repository is unknown
    pub fn repository_url(&self) -> String {
        if self.repository_owner.is_empty() || self.repository_name.is_empty() {
            return String::new();
        }
        format!(
            "{}/{}/{}",
            self.server_url, self.repository_owner, self.repository_name
        )
    }

    /// Link to the current run, empty when repository or run id is unknown
    pub fn build_url(&self) -> String {
        let repo_url = self.repository_url();
        if repo_url.is_empty() || self.run_id.is_empty() {
            return String::new();
        }
        format!("{}/actions/runs/{}", repo_url, self.run_id)
    }

    /// Branch derived from the triggering ref
    #[inline]
    pub fn branch(&self) -> &str {
        branch_from_ref(&self.git_ref)
    }
}

/// Split `owner/repo`; anything else yields two empty strings
fn split_repository(repository: &str) -> (String, String) {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            (owner.to_string(), repo.to_string())
        }
        _ => (String::new(), String::new()),
    }
}

fn read_head_commit_message(path: &Path) -> String {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "event payload not readable");
            return String::new();
        }
    };

    serde_json::from_str::<serde_json::Value>(&content)
        .ok()
        .and_then(|event| {
            event
                .pointer("/head_commit/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_vars_full() {
        let env = vars(&[
            ("GITHUB_SERVER_URL", "https://github.example.com/"),
            ("GITHUB_REPOSITORY", "acme/shop"),
            ("GITHUB_REF", "refs/heads/main"),
            ("GITHUB_SHA", "0123456789abcdef"),
            ("GITHUB_ACTOR", "octocat"),
            ("GITHUB_RUN_NUMBER", "17"),
            ("GITHUB_RUN_ID", "998877"),
            ("GITHUB_WORKFLOW", "CI"),
            ("GITHUB_JOB", "release"),
            ("GITHUB_EVENT_NAME", "push"),
        ]);
        let ctx = GitHubContext::from_vars(|k| env.get(k).cloned());

        assert_eq!(ctx.server_url, "https://github.example.com");
        assert_eq!(ctx.repository_owner, "acme");
        assert_eq!(ctx.repository_name, "shop");
        assert_eq!(ctx.branch(), "main");
        assert_eq!(ctx.repository_url(), "https://github.example.com/acme/shop");
        assert_eq!(
            ctx.build_url(),
            "https://github.example.com/acme/shop/actions/runs/998877"
        );
        assert_eq!(ctx.head_commit_message, "");
    }

    #[test]
    fn test_from_vars_empty_environment() {
        let ctx = GitHubContext::from_vars(|_| None);
        assert_eq!(ctx.server_url, "https://github.com");
        assert_eq!(ctx.repository_url(), "");
        assert_eq!(ctx.build_url(), "");
        assert_eq!(ctx.branch(), "");
    }

    #[test]
    fn test_invalid_repository_format() {
        let env = vars(&[("GITHUB_REPOSITORY", "invalid")]);
        let ctx = GitHubContext::from_vars(|k| env.get(k).cloned());
        assert_eq!(ctx.repository_owner, "");
        assert_eq!(ctx.repository_url(), "");
    }

    #[test]
    fn test_head_commit_message_from_event_payload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(
            &path,
            r#"{"head_commit":{"id":"abc","message":"Fix checkout\n\nDetails"}}"#,
        )
        .unwrap();

        let env = vars(&[("GITHUB_EVENT_PATH", path.to_str().unwrap())]);
        let ctx = GitHubContext::from_vars(|k| env.get(k).cloned());
        assert_eq!(ctx.head_commit_message, "Fix checkout\n\nDetails");
    }

    #[test]
    fn test_event_payload_without_head_commit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, r#"{"pull_request":{"number":3}}"#).unwrap();

        let env = vars(&[("GITHUB_EVENT_PATH", path.to_str().unwrap())]);
        let ctx = GitHubContext::from_vars(|k| env.get(k).cloned());
        assert_eq!(ctx.head_commit_message, "");
    }

    #[test]
    fn test_missing_event_payload_is_not_an_error() {
        let env = vars(&[("GITHUB_EVENT_PATH", "/nonexistent/event.json")]);
        let ctx = GitHubContext::from_vars(|k| env.get(k).cloned());
        assert_eq!(ctx.head_commit_message, "");
    }

    #[test]
    fn test_tag_ref_branch_unchanged() {
        let ctx = GitHubContext {
            git_ref: "refs/tags/v1".into(),
            ..Default::default()
        };
        assert_eq!(ctx.branch(), "refs/tags/v1");
    }
}
