//! Engine configuration.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional file, then `SVCWATCH_*` environment variables.
//!
//! ```toml
//! platform_id = "marathon"
//! event_capacity = 64
//!
//! [labels]
//! framework_name = "DCOS_PACKAGE_FRAMEWORK_NAME"
//! package_version = "DCOS_PACKAGE_VERSION"
//! package_metadata = "DCOS_PACKAGE_METADATA"
//!
//! [platform_images]
//! icon-small = "img/services/icon-service-marathon-small.png"
//! icon-medium = "img/services/icon-service-marathon-medium.png"
//! icon-large = "img/services/icon-service-marathon-large.png"
//! ```

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::ServiceImages;
use crate::error::ConfigError;

/// Default service name of the synthetic platform entry.
pub const DEFAULT_PLATFORM_ID: &str = "marathon";

/// Top-level engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Service name of the synthetic platform liveness entry.
    pub platform_id: String,
    /// Label keys read from application records.
    pub labels: LabelKeys,
    /// Icons reported for the platform entry.
    pub platform_images: ServiceImages,
    /// Buffer size of the change notification channel.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            platform_id: DEFAULT_PLATFORM_ID.to_string(),
            labels: LabelKeys::default(),
            platform_images: ServiceImages {
                icon_small: "img/services/icon-service-marathon-small.png".to_string(),
                icon_medium: "img/services/icon-service-marathon-medium.png".to_string(),
                icon_large: "img/services/icon-service-marathon-large.png".to_string(),
            },
            event_capacity: 64,
        }
    }
}

/// Label keys carrying package metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelKeys {
    /// Human-facing service name. Falls back to the application id.
    pub framework_name: String,
    /// Package version string.
    pub package_version: String,
    /// Base64 encoded JSON package metadata, including icons.
    pub package_metadata: String,
}

impl Default for LabelKeys {
    fn default() -> Self {
        Self {
            framework_name: "DCOS_PACKAGE_FRAMEWORK_NAME".to_string(),
            package_version: "DCOS_PACKAGE_VERSION".to_string(),
            package_metadata: "DCOS_PACKAGE_METADATA".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from an optional file plus the environment.
    ///
    /// Environment variables use the `SVCWATCH` prefix and `__` as the
    /// nesting separator, e.g. `SVCWATCH_LABELS__FRAMEWORK_NAME`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix("SVCWATCH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let engine: EngineConfig = config.try_deserialize()?;
        engine.validate()?;
        Ok(engine)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.platform_id.trim().is_empty() {
            return Err(ConfigError::Invalid("platform_id must not be empty".into()));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid("event_capacity must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.platform_id, "marathon");
        assert_eq!(config.labels.framework_name, "DCOS_PACKAGE_FRAMEWORK_NAME");
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            platform_id = "scheduler"

            [labels]
            package_version = "PKG_VERSION"
            "#
        )
        .unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.platform_id, "scheduler");
        assert_eq!(config.labels.package_version, "PKG_VERSION");
        // Untouched keys keep their defaults
        assert_eq!(config.labels.package_metadata, "DCOS_PACKAGE_METADATA");
        assert!(config.platform_images.icon_large.ends_with("large.png"));
    }

    #[test]
    fn test_empty_platform_id_rejected() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, r#"platform_id = "  ""#).unwrap();

        let result = EngineConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = EngineConfig::load(Some(Path::new("/nonexistent/svcwatch.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
