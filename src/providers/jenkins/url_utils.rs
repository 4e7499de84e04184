use log::warn;
use url::Url;

use crate::error::{JenkinsError, Result};

/// Parses and normalizes the configured Jenkins address: trailing `/` are
/// stripped and only absolute http(s) URLs are accepted.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let mut url = Url::parse(trimmed)
        .map_err(|e| JenkinsError::ConfigError(format!("Invalid Jenkins URL '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(JenkinsError::ConfigError(format!(
            "Jenkins URL must be an absolute http(s) address, got '{raw}'"
        )));
    }

    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Appends path segments to `base`, percent-encoding each one.
pub fn endpoint<'a, I>(base: &Url, segments: I) -> Result<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| JenkinsError::ConfigError(format!("Cannot append a path to {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `team/app` addresses a job inside a folder: `job/team/job/app`.
pub fn job_segments(job_name: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = job_name
        .split('/')
        .filter(|s| !s.trim().is_empty())
        .flat_map(|name| ["job", name])
        .collect();

    if segments.is_empty() {
        return Err(JenkinsError::ConfigError("Job name must not be empty".to_string()));
    }
    Ok(segments)
}

pub fn job_endpoint(base: &Url, job_name: &str, tail: &[&str]) -> Result<Url> {
    let mut segments = job_segments(job_name)?;
    segments.extend_from_slice(tail);
    endpoint(base, segments)
}

/// Resolves the `Location` of a queued build to its JSON API address.
///
/// Jenkins normally answers with an absolute URL; a relative location is
/// appended to the base address. An absolute location on another origin
/// (Jenkins reporting its internal root URL behind a proxy) keeps its path
/// but is moved onto the base origin, so credentials never leave it.
pub fn queue_api_url(base: &Url, location: &str) -> Result<Url> {
    let location = location.trim();
    if location.is_empty() {
        return Err(JenkinsError::ProtocolError("Empty queue URL in response".to_string()));
    }

    let item = if location.starts_with("http://") || location.starts_with("https://") {
        let item = Url::parse(location).map_err(|e| {
            JenkinsError::ProtocolError(format!("Invalid queue URL '{location}': {e}"))
        })?;
        if item.origin() == base.origin() {
            item
        } else {
            warn!(
                "Queue URL {location} is outside {}; polling it through the configured address",
                base.origin().ascii_serialization()
            );
            let mut rebased = base.clone();
            rebased.set_path(item.path());
            rebased
        }
    } else {
        endpoint(base, location.split('/').filter(|s| !s.is_empty()))?
    };

    endpoint(&item, ["api", "json"])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        parse_base_url("http://jenkins.local:8080/").unwrap()
    }

    #[test]
    fn test_parse_base_url_strips_trailing_slashes() {
        let url = parse_base_url("https://ci.example.com/jenkins///").unwrap();
        assert_eq!(url.as_str(), "https://ci.example.com/jenkins");
    }

    #[test]
    fn test_parse_base_url_rejects_missing_scheme() {
        assert!(matches!(
            parse_base_url("jenkins.local:8080"),
            Err(JenkinsError::ConfigError(_))
        ));
        assert!(matches!(
            parse_base_url("ftp://jenkins.local"),
            Err(JenkinsError::ConfigError(_))
        ));
    }

    #[test]
    fn test_endpoint_root_api() {
        let url = endpoint(&base(), ["api", "json"]).unwrap();
        assert_eq!(url.as_str(), "http://jenkins.local:8080/api/json");
    }

    #[test]
    fn test_endpoint_keeps_context_path() {
        let base = parse_base_url("https://ci.example.com/jenkins/").unwrap();
        let url = endpoint(&base, ["api", "json"]).unwrap();
        assert_eq!(url.as_str(), "https://ci.example.com/jenkins/api/json");
    }

    #[test]
    fn test_job_endpoint_encodes_name() {
        let url = job_endpoint(&base(), "nightly build", &["lastBuild", "api", "json"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://jenkins.local:8080/job/nightly%20build/lastBuild/api/json"
        );
    }

    #[test]
    fn test_job_endpoint_nests_folders() {
        let url = job_endpoint(&base(), "team/app", &["build"]).unwrap();
        assert_eq!(url.as_str(), "http://jenkins.local:8080/job/team/job/app/build");
    }

    #[test]
    fn test_job_segments_rejects_empty_name() {
        assert!(job_segments("").is_err());
        assert!(job_segments(" / ").is_err());
    }

    #[test]
    fn test_queue_api_url_relative() {
        let url = queue_api_url(&base(), "/queue/item/42").unwrap();
        assert_eq!(url.as_str(), "http://jenkins.local:8080/queue/item/42/api/json");
    }

    #[test]
    fn test_queue_api_url_absolute_with_trailing_slash() {
        let url = queue_api_url(&base(), "http://jenkins.local:8080/queue/item/42/").unwrap();
        assert_eq!(url.as_str(), "http://jenkins.local:8080/queue/item/42/api/json");
    }

    #[test]
    fn test_queue_api_url_foreign_origin_is_rebased() {
        let base = parse_base_url("https://ci.example.com/jenkins").unwrap();
        let url = queue_api_url(&base, "http://10.0.0.5:8080/jenkins/queue/item/42/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ci.example.com/jenkins/queue/item/42/api/json"
        );
    }

    #[test]
    fn test_queue_api_url_scheme_change_is_rebased() {
        let url = queue_api_url(&base(), "https://jenkins.local:8080/queue/item/7/").unwrap();
        assert_eq!(url.as_str(), "http://jenkins.local:8080/queue/item/7/api/json");
    }

    #[test]
    fn test_queue_api_url_empty_is_protocol_error() {
        assert!(matches!(
            queue_api_url(&base(), "  "),
            Err(JenkinsError::ProtocolError(_))
        ));
    }
}
