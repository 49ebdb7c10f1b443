//! Client configuration
//!
//! Values come from command-line overrides, then `REELGEN_*` environment
//! variables, then built-in defaults.

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default generation service location
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default delay between status checks
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Default HTTP request timeout (uploads can be large)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable for the service base URL
pub const ENV_API_URL: &str = "REELGEN_API_URL";
/// Environment variable for the poll interval in milliseconds
pub const ENV_POLL_INTERVAL_MS: &str = "REELGEN_POLL_INTERVAL_MS";
/// Environment variable for the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "REELGEN_TIMEOUT_SECS";
/// Environment variable for the download directory
pub const ENV_OUTPUT_DIR: &str = "REELGEN_OUTPUT_DIR";

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the generation service
    pub api_url: Url,
    /// Delay between status checks
    pub poll_interval: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Where downloaded videos go when no explicit path is given
    pub output_dir: PathBuf,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Service base URL
    pub api_url: Option<String>,
    /// Poll interval in milliseconds
    pub poll_interval_ms: Option<u64>,
    /// Request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Download directory
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from overrides and the process environment
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        Self::from_lookup(overrides, |key| env::var(key).ok())
    }

    /// Load configuration using a custom variable lookup
    pub fn from_lookup<F>(overrides: &ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = overrides
            .api_url
            .clone()
            .or_else(|| lookup(ENV_API_URL))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = parse_api_url(&raw_url)?;

        let poll_ms = match overrides.poll_interval_ms {
            Some(ms) => ms,
            None => parse_number(ENV_POLL_INTERVAL_MS, lookup(ENV_POLL_INTERVAL_MS))?
                .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
        };
        if poll_ms == 0 {
            return Err(Error::Config("poll interval must be positive".to_string()));
        }

        let timeout_secs = match overrides.request_timeout_secs {
            Some(secs) => secs,
            None => parse_number(ENV_TIMEOUT_SECS, lookup(ENV_TIMEOUT_SECS))?
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(Error::Config("request timeout must be positive".to_string()));
        }

        let output_dir = overrides
            .output_dir
            .clone()
            .or_else(|| lookup(ENV_OUTPUT_DIR).map(PathBuf::from))
            .or_else(dirs::video_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            api_url,
            poll_interval: Duration::from_millis(poll_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            output_dir,
        })
    }

    /// Configuration pointing at a given base URL, defaults elsewhere
    pub fn for_url(api_url: &str) -> Result<Self> {
        Self::from_lookup(
            &ConfigOverrides {
                api_url: Some(api_url.to_string()),
                ..ConfigOverrides::default()
            },
            |_| None,
        )
    }

    /// Full URL of a service endpoint path (e.g. `/generate`)
    pub fn endpoint(&self, path: &str) -> String {
        join_base(&self.api_url, path)
    }

    /// Resolve a video reference returned by the service.
    ///
    /// Absolute http(s) URLs are returned unchanged; paths are appended to
    /// the base URL.
    pub fn resolve_video_url(&self, reference: &str) -> String {
        match Url::parse(reference) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => reference.to_string(),
            _ => join_base(&self.api_url, reference),
        }
    }
}

/// Parse and check a service base URL
pub fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::Config(format!("invalid API URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "API URL must use http or https: {raw}"
        )));
    }
    Ok(url)
}

fn parse_number(key: &str, value: Option<String>) -> Result<Option<u64>> {
    value
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map_err(|e| Error::Config(format!("{key}={v}: {e}")))
        })
        .transpose()
}

fn join_base(base: &Url, path: &str) -> String {
    let base = base.as_str().trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(&ConfigOverrides::default(), |_| None).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.poll_interval, Duration::from_millis(5000));
        assert_eq!(config.request_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_env_values() {
        let lookup = lookup_from(&[
            (ENV_API_URL, "https://video.example.com"),
            (ENV_POLL_INTERVAL_MS, "250"),
            (ENV_OUTPUT_DIR, "/tmp/reels"),
        ]);
        let config = Config::from_lookup(&ConfigOverrides::default(), lookup).unwrap();
        assert_eq!(config.endpoint("/generate"), "https://video.example.com/generate");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/reels"));
    }

    #[test]
    fn test_override_beats_env() {
        let lookup = lookup_from(&[(ENV_API_URL, "https://env.example.com")]);
        let overrides = ConfigOverrides {
            api_url: Some("http://flag.example.com:9000".into()),
            poll_interval_ms: Some(10),
            ..ConfigOverrides::default()
        };
        let config = Config::from_lookup(&overrides, lookup).unwrap();
        assert_eq!(config.endpoint("status/x"), "http://flag.example.com:9000/status/x");
        assert_eq!(config.poll_interval, Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_url = lookup_from(&[(ENV_API_URL, "not a url")]);
        assert!(matches!(
            Config::from_lookup(&ConfigOverrides::default(), bad_url),
            Err(Error::Config(_))
        ));

        let ftp = lookup_from(&[(ENV_API_URL, "ftp://example.com")]);
        assert!(Config::from_lookup(&ConfigOverrides::default(), ftp).is_err());

        let bad_interval = lookup_from(&[(ENV_POLL_INTERVAL_MS, "soon")]);
        assert!(Config::from_lookup(&ConfigOverrides::default(), bad_interval).is_err());

        let zero = ConfigOverrides {
            poll_interval_ms: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(Config::from_lookup(&zero, |_| None).is_err());
    }

    #[test]
    fn test_resolve_video_url() {
        let config = Config::for_url("http://localhost:8000").unwrap();
        assert_eq!(
            config.resolve_video_url("/videos/out.mp4"),
            "http://localhost:8000/videos/out.mp4"
        );
        assert_eq!(
            config.resolve_video_url("https://cdn.example.com/a.mp4"),
            "https://cdn.example.com/a.mp4"
        );
    }

    #[test]
    fn test_base_path_prefix_kept() {
        let config = Config::for_url("https://example.com/api/").unwrap();
        assert_eq!(
            config.resolve_video_url("/videos/out.mp4"),
            "https://example.com/api/videos/out.mp4"
        );
    }
}
