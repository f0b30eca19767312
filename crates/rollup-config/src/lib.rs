//! Shared configuration for the rollup request loop.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a
//! configuration file (`--config-path` or `ROLLUP_CONFIG_PATH`), then
//! `ROLLUP_*` environment variables, then command-line flags. The node
//! endpoint therefore honours the conventional `ROLLUP_HTTP_SERVER_URL`
//! variable.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod endpoint;
mod options;

pub use defaults::{
    DEFAULT_HTTP_SERVER_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_IDLE_BACKOFF_MS,
    DEFAULT_LOG_FILTER, default_http_server_url, default_http_timeout_secs,
    default_idle_backoff_ms, default_initial_verdict, default_log_filter,
    default_log_filter_string, default_log_format, default_partial_emission,
};
pub use endpoint::{EndpointParseError, NodeEndpoint};
pub use options::{InitialVerdict, LogFormat, OptionParseError, PartialEmissionPolicy};

/// Resolved configuration for the `rollupd` binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "ROLLUP")]
pub struct Config {
    /// Base URL of the rollup node's HTTP API.
    #[serde(default = "defaults::default_http_server_url")]
    #[ortho_config(default = defaults::default_http_server_url())]
    pub http_server_url: NodeEndpoint,
    /// `tracing` filter expression.
    #[serde(default = "defaults::default_log_filter_string")]
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "defaults::default_log_format")]
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
    /// Verdict reported on the first negotiation call.
    #[serde(default = "defaults::default_initial_verdict")]
    #[ortho_config(default = defaults::default_initial_verdict())]
    pub initial_verdict: InitialVerdict,
    /// Verdict policy for partially emitted advance requests.
    #[serde(default = "defaults::default_partial_emission")]
    #[ortho_config(default = defaults::default_partial_emission())]
    pub partial_emission: PartialEmissionPolicy,
    /// Per-call HTTP timeout in seconds.
    #[serde(default = "defaults::default_http_timeout_secs")]
    #[ortho_config(default = defaults::default_http_timeout_secs())]
    pub http_timeout_secs: u64,
    /// Pause between negotiation retries while the node has no request.
    #[serde(default = "defaults::default_idle_backoff_ms")]
    #[ortho_config(default = defaults::default_idle_backoff_ms())]
    pub idle_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_server_url: default_http_server_url(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            initial_verdict: default_initial_verdict(),
            partial_emission: default_partial_emission(),
            http_timeout_secs: default_http_timeout_secs(),
            idle_backoff_ms: default_idle_backoff_ms(),
        }
    }
}

impl Config {
    /// Base URL of the rollup node.
    #[must_use]
    pub fn http_server_url(&self) -> &NodeEndpoint {
        &self.http_server_url
    }

    /// Filter expression applied to the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Selected log format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Verdict reported before any request has been processed.
    #[must_use]
    pub fn initial_verdict(&self) -> InitialVerdict {
        self.initial_verdict
    }

    /// Verdict policy applied after a failed emission.
    #[must_use]
    pub fn partial_emission(&self) -> PartialEmissionPolicy {
        self.partial_emission
    }

    /// Timeout applied to each HTTP call made to the node.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Pause between negotiation retries while no request is pending.
    #[must_use]
    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }
}
