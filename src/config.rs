use std::env;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_QUERY_HOST: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Runtime settings for the dashboard server.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    /// Address the dashboard listens on
    pub bind_addr: String,

    /// Base URL of the XML analysis service
    pub api_url: String,

    /// Base URL of the metric query service
    pub query_host: String,

    /// Timeout applied to every outbound request; `None` waits forever
    pub http_timeout: Option<Duration>,

    /// Largest accepted upload body
    pub max_upload_bytes: usize,

    /// Directory served under `/static`
    pub static_dir: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            query_host: DEFAULT_QUERY_HOST.to_string(),
            http_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            static_dir: "static".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Reads the `ECFR_*` environment variables, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`DashboardConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |name: &str, default: String| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        let timeout_secs = lookup("ECFR_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            bind_addr: text("ECFR_BIND_ADDR", defaults.bind_addr),
            api_url: trim_base(&text("ECFR_API_URL", defaults.api_url)),
            query_host: trim_base(&text("ECFR_QUERY_HOST", defaults.query_host)),
            http_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            max_upload_bytes: lookup("ECFR_MAX_UPLOAD_BYTES")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(defaults.max_upload_bytes),
            static_dir: text("ECFR_STATIC_DIR", defaults.static_dir),
        }
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
