use crate::endpoint::NodeEndpoint;
use crate::options::{InitialVerdict, LogFormat, PartialEmissionPolicy};

/// Default base URL of the rollup node's HTTP API.
pub const DEFAULT_HTTP_SERVER_URL: &str = "http://127.0.0.1:5004";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default per-call HTTP timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Default pause between negotiation retries while the node is idle.
pub const DEFAULT_IDLE_BACKOFF_MS: u64 = 100;

/// Default node endpoint.
pub fn default_http_server_url() -> NodeEndpoint {
    NodeEndpoint::localhost()
}

/// Default log filter expression used by the binary.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default verdict reported before the first request.
pub fn default_initial_verdict() -> InitialVerdict {
    InitialVerdict::Accept
}

/// Default partial-emission policy.
pub fn default_partial_emission() -> PartialEmissionPolicy {
    PartialEmissionPolicy::Reject
}

/// Default HTTP timeout in seconds.
pub fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

/// Default idle backoff in milliseconds.
pub fn default_idle_backoff_ms() -> u64 {
    DEFAULT_IDLE_BACKOFF_MS
}
