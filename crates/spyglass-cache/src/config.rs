//! Typed limits configuration for the inspection cache.
//!
//! The cache is configured from a small YAML document (usually a section of
//! the host's config file). All fields default to the values below, so an
//! empty document is valid.

use std::path::Path;

use serde::Deserialize;

/// Default bound on stored entity snapshots.
pub const DEFAULT_MAX_ENTITIES: usize = 5000;

/// Default bound on stored packets.
pub const DEFAULT_MAX_PACKETS: usize = 1000;

/// Errors that can occur when loading cache configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read cache config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse cache config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Store limits.
///
/// Runtime limit changes take effect lazily at the next eviction check; a
/// downward change caps future growth rather than evicting immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entity snapshots held at once.
    #[serde(default = "default_max_entities")]
    pub max_entities: usize,

    /// Maximum number of logged packets held at once.
    #[serde(default = "default_max_packets")]
    pub max_packets: usize,
}

const fn default_max_entities() -> usize {
    DEFAULT_MAX_ENTITIES
}

const fn default_max_packets() -> usize {
    DEFAULT_MAX_PACKETS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
            max_packets: DEFAULT_MAX_PACKETS,
        }
    }
}

impl CacheConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CacheConfig::parse("{}").unwrap_or_default();
        assert_eq!(config, CacheConfig::default());
        assert_eq!(config.max_entities, 5000);
        assert_eq!(config.max_packets, 1000);
    }

    #[test]
    fn partial_document_overrides_one_limit() {
        let config = CacheConfig::parse("max_packets: 250\n").unwrap_or_default();
        assert_eq!(config.max_entities, 5000);
        assert_eq!(config.max_packets, 250);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(CacheConfig::parse(": not yaml :").is_err());
    }
}
