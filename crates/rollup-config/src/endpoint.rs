use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Base URL of the rollup node's HTTP API.
///
/// Only `http` and `https` URLs with a host are accepted. The base path always
/// ends with `/` so that [`NodeEndpoint::join`] appends route names instead of
/// replacing the last segment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeEndpoint {
    secure: bool,
    host: String,
    port: Option<u16>,
    base_path: String,
}

impl NodeEndpoint {
    /// Builds a plain HTTP endpoint.
    #[must_use]
    pub fn http(host: impl Into<String>, port: u16) -> Self {
        Self {
            secure: false,
            host: host.into(),
            port: Some(port),
            base_path: String::from("/"),
        }
    }

    /// Endpoint served by a node on the local machine at its conventional port.
    #[must_use]
    pub fn localhost() -> Self {
        Self::http("127.0.0.1", 5004)
    }

    /// Host name or address of the node.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, when one was configured.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Builds the URL for a named route below the base (for example `finish`).
    pub fn join(&self, route: &str) -> Result<Url, EndpointParseError> {
        let url = format!("{self}{}", route.trim_start_matches('/'));
        Ok(Url::parse(&url)?)
    }

    fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }
}

impl fmt::Display for NodeEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}://{}", self.scheme(), self.host)?;
        if let Some(port) = self.port {
            write!(formatter, ":{port}")?;
        }
        formatter.write_str(&self.base_path)
    }
}

impl FromStr for NodeEndpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(input.trim())?;
        let secure = match url.scheme() {
            "http" => false,
            "https" => true,
            other => return Err(EndpointParseError::UnsupportedScheme(other.to_owned())),
        };
        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_owned(),
            _ => return Err(EndpointParseError::MissingHost(input.to_owned())),
        };
        let mut base_path = url.path().to_owned();
        if !base_path.ends_with('/') {
            base_path.push('/');
        }
        Ok(Self {
            secure,
            host,
            port: url.port(),
            base_path,
        })
    }
}

impl TryFrom<String> for NodeEndpoint {
    type Error = EndpointParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeEndpoint> for String {
    fn from(endpoint: NodeEndpoint) -> Self {
        endpoint.to_string()
    }
}

/// Errors encountered while parsing a [`NodeEndpoint`] from text.
#[derive(Debug, Error)]
pub enum EndpointParseError {
    /// Scheme was not `http` or `https`.
    #[error("unsupported node endpoint scheme '{0}'")]
    UnsupportedScheme(String),
    /// Host name was missing.
    #[error("missing host in node endpoint '{0}'")]
    MissingHost(String),
    /// URL failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}
