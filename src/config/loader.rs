//! Configuration loading from disk and command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{ForwardAddress, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("can't listen on port {port}: {source}")]
    PortUnavailable {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values given on the command line. Each one set replaces the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub forward_address: Option<ForwardAddress>,
    pub logs_dir: Option<PathBuf>,
    pub queue_capacity: Option<usize>,
}

impl Overrides {
    fn apply(self, config: &mut ProxyConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(address) = self.forward_address {
            config.forward.address = Some(address);
        }
        if let Some(dir) = self.logs_dir {
            config.recording.logs_dir = dir;
        }
        if let Some(capacity) = self.queue_capacity {
            config.recording.queue_capacity = capacity;
        }
    }
}

/// Load configuration from a TOML file. Missing sections take defaults.
///
/// The result is not validated; [`resolve_config`] validates once
/// command-line overrides have been applied.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Build the effective configuration: defaults, then the optional file, then overrides.
pub fn resolve_config(
    file: Option<&Path>,
    overrides: Overrides,
) -> Result<ProxyConfig, ConfigError> {
    let mut config = match file {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    overrides.apply(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn overrides_replace_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[listener]\nport = 9000\n\n[forward]\naddress = \"http://file-target\"\n"
        )
        .unwrap();

        let config = resolve_config(
            Some(file.path()),
            Overrides {
                forward_address: Some(ForwardAddress::parse("http://cli-target:81").unwrap()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.forward.address.unwrap().authority(), "cli-target:81");
    }

    #[test]
    fn missing_forward_address_is_rejected() {
        let err = resolve_config(None, Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors)
            if errors == &[ValidationError::MissingForwardAddress]));
    }

    #[test]
    fn huge_queue_capacity_is_rejected() {
        let err = resolve_config(
            None,
            Overrides {
                forward_address: Some(ForwardAddress::parse("http://target").unwrap()),
                queue_capacity: Some(usize::MAX),
                ..Default::default()
            },
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(ref errors)
            if matches!(errors[..], [ValidationError::QueueCapacityTooLarge { .. }])));
    }

    #[test]
    fn file_without_forward_address_can_be_completed_by_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[recording]\nqueue_capacity = 8").unwrap();

        assert!(load_config(file.path()).unwrap().forward.address.is_none());
        let config = resolve_config(
            Some(file.path()),
            Overrides {
                forward_address: Some(ForwardAddress::parse("http://target").unwrap()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(config.recording.queue_capacity, 8);
    }

    #[test]
    fn invalid_address_in_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[forward]\naddress = \"http://example.com/path\"").unwrap();

        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }
}
