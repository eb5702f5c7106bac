//! Endpoint URL construction

use crate::error::{Error, Result};
use crate::types::ActionKind;
use reqwest::Url;

/// Path segments shared by every release-management endpoint
const RELEASES_PATH: [&str; 4] = ["api", "v2", "release-management", "releases"];

/// Absolute endpoint URL for an action
///
/// Create-release posts to `.../releases/webhook`; the other actions post to
/// `.../releases/{id}/{action}`. The id is percent-encoded as a single path
/// segment.
pub fn endpoint_url(base_url: &str, kind: ActionKind, id: Option<&str>) -> Result<String> {
    let mut url = Url::parse(base_url).map_err(|e| invalid_base(base_url, &e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid_base(base_url, "scheme must be http or https"));
    }
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| invalid_base(base_url, "cannot be a base URL"))?;
        segments.pop_if_empty().extend(RELEASES_PATH);

        match (kind, id) {
            (ActionKind::CreateRelease, _) => {
                segments.push("webhook");
            }
            // Dot segments would be dropped from the path
            (_, Some(bad @ ("" | "." | ".."))) => {
                return Err(Error::Validation(format!("Invalid resource id \"{}\"", bad)));
            }
            (_, Some(id)) => {
                segments.push(id).push(kind.as_str());
            }
            (_, None) => {
                return Err(Error::Config(format!(
                    "{} endpoint requires a resource id",
                    kind
                )));
            }
        }
    }

    Ok(url.to_string())
}

fn invalid_base(base_url: &str, reason: &str) -> Error {
    Error::Validation(format!("Invalid API URL \"{}\": {}", base_url, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_webhook_url() {
        let url = endpoint_url("https://app.kubigo.cloud", ActionKind::CreateRelease, None).unwrap();
        assert_eq!(
            url,
            "https://app.kubigo.cloud/api/v2/release-management/releases/webhook"
        );
    }

    #[test]
    fn test_release_action_urls() {
        let base = "https://kubigo.internal:8443";
        assert_eq!(
            endpoint_url(base, ActionKind::Approve, Some("42")).unwrap(),
            "https://kubigo.internal:8443/api/v2/release-management/releases/42/approve"
        );
        assert_eq!(
            endpoint_url(base, ActionKind::Deploy, Some("42")).unwrap(),
            "https://kubigo.internal:8443/api/v2/release-management/releases/42/deploy"
        );
        assert_eq!(
            endpoint_url(base, ActionKind::Rollback, Some("tgt-1")).unwrap(),
            "https://kubigo.internal:8443/api/v2/release-management/releases/tgt-1/rollback"
        );
    }

    #[test]
    fn test_base_with_path_prefix_and_trailing_slash() {
        let url = endpoint_url("http://proxy.local/kubigo/", ActionKind::Deploy, Some("7")).unwrap();
        assert_eq!(
            url,
            "http://proxy.local/kubigo/api/v2/release-management/releases/7/deploy"
        );
    }

    #[test]
    fn test_id_is_single_encoded_segment() {
        let url = endpoint_url("https://app.kubigo.cloud", ActionKind::Approve, Some("rel 4/x")).unwrap();
        assert!(url.ends_with("/releases/rel%204%2Fx/approve"), "got {url}");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = endpoint_url("not a url", ActionKind::CreateRelease, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("not a url"));

        let err = endpoint_url("ftp://files.local", ActionKind::CreateRelease, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_dot_segment_ids_rejected() {
        for id in [".", ".."] {
            let err = endpoint_url("https://app.kubigo.cloud", ActionKind::Approve, Some(id)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(endpoint_url("https://app.kubigo.cloud", ActionKind::Approve, Some("...")).is_ok());
    }

    #[test]
    fn test_missing_id() {
        let err = endpoint_url("https://app.kubigo.cloud", ActionKind::Deploy, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
