//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types implement `Deserialize` for loading from config files.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Root configuration for the recording proxy.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (port to bind).
    pub listener: ListenerConfig,

    /// Destination every inbound request is forwarded to.
    pub forward: ForwardConfig,

    /// Exchange log settings.
    pub recording: RecordingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// TCP port to bind on all interfaces. Port 0 picks an ephemeral port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl ListenerConfig {
    /// Socket address the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Forwarding destination.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ForwardConfig {
    /// Base address of the form `scheme://host[:port]`.
    pub address: Option<ForwardAddress>,
}

/// Exchange log configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Directory holding one log file per destination.
    pub logs_dir: PathBuf,

    /// Capacity of the queue between request handlers and the logging agent.
    pub queue_capacity: usize,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from("logs"),
            queue_capacity: crate::recording::DEFAULT_CAPACITY,
        }
    }
}

/// Reasons a forward address is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("the address must be a valid URL: {0}")]
    NotAUrl(#[from] url::ParseError),

    #[error("the scheme must be http or https, got {0:?}")]
    UnsupportedScheme(String),

    #[error("the address must be a valid HTTP URL of type scheme://host, got {0:?}")]
    NotSchemeHost(String),
}

/// A validated `scheme://host[:port]` address with no path, query or fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardAddress {
    url: Url,
    /// `host[:port]` as written; the parsed URL drops default ports.
    authority: String,
}

impl ForwardAddress {
    /// Parse and validate a forward address. A single trailing `/` is ignored.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let trimmed = input.strip_suffix('/').unwrap_or(input);
        let url = Url::parse(trimmed)?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AddressError::UnsupportedScheme(url.scheme().to_string()));
        }

        let extra = url.host_str().is_none()
            || url.path() != "/"
            || trimmed.ends_with('/')
            || url.query().is_some()
            || url.fragment().is_some()
            || !url.username().is_empty()
            || url.password().is_some();
        if extra {
            return Err(AddressError::NotSchemeHost(input.to_string()));
        }

        let authority = trimmed
            .split_once("://")
            .map(|(_, authority)| authority.trim())
            .filter(|authority| !authority.is_empty() && !authority.contains(['/', '\\']))
            .ok_or_else(|| AddressError::NotSchemeHost(input.to_string()))?;

        Ok(Self {
            url,
            authority: authority.to_string(),
        })
    }

    /// The address as a URL with an empty (`/`) path.
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// `host[:port]` as it appears in the address.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Name of the destination log file: the authority with `:` replaced by `.`.
    pub fn log_file_name(&self) -> String {
        self.authority().replace(':', ".")
    }
}

impl fmt::Display for ForwardAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.url.scheme(), self.authority())
    }
}

impl FromStr for ForwardAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for ForwardAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
