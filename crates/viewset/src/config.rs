//! Render configuration and lifecycle mode.
//!
//! [`RenderConfig`] describes where templates live and which files count as
//! templates. It is created once and never mutated after the adapter is built.
//!
//! ```rust
//! use viewset::RenderConfig;
//!
//! let config = RenderConfig::default()
//!     .with_templates_dir("site/views")
//!     .with_extensions([".html", ".tpl.html"])
//!     .with_debug(true);
//!
//! assert_eq!(config.layout, "layouts/base");
//! ```
//!
//! Configuration can also be read from YAML; missing keys take their defaults:
//!
//! ```yaml
//! templates_dir: site/views
//! extensions: [".html"]
//! debug: true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ViewError;

/// Default template root.
pub const DEFAULT_TEMPLATES_DIR: &str = "app/views/";

/// Default layout template name.
pub const DEFAULT_LAYOUT: &str = "layouts/base";

/// Default recognized extensions.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".html"];

/// Environment variable consulted by [`Mode::from_env`].
pub const MODE_ENV_VAR: &str = "VIEWSET_ENV";

/// Where templates are loaded from and how verbosely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Root of the template tree.
    pub templates_dir: PathBuf,
    /// Layout used by [`Views::instance_in_layout`](crate::Views::instance_in_layout).
    pub layout: String,
    /// Extensions matched exactly against each file's full relative-path dot-suffix.
    pub extensions: Vec<String>,
    /// Log every loaded template at debug level.
    pub debug: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            layout: DEFAULT_LAYOUT.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            debug: false,
        }
    }
}

impl RenderConfig {
    /// Creates a configuration rooted at `templates_dir` with all other defaults.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self::default().with_templates_dir(templates_dir)
    }

    /// Parses a configuration from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ViewError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ViewError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ViewError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Replaces the extension list.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Registry lifecycle policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Rebuild the registry from disk before every lookup.
    #[default]
    Development,
    /// Build once and reuse for the life of the process.
    Production,
}

impl Mode {
    /// Reads the mode from `VIEWSET_ENV`.
    ///
    /// Unset, empty, or `development` selects [`Mode::Development`];
    /// `production` selects [`Mode::Production`]. Unrecognized values fall
    /// back to development.
    pub fn from_env() -> Self {
        match std::env::var(MODE_ENV_VAR) {
            Ok(value) => Self::parse(&value).unwrap_or_else(|| {
                tracing::warn!(
                    value = %value,
                    "unrecognized {}, using development mode",
                    MODE_ENV_VAR
                );
                Mode::Development
            }),
            Err(_) => Mode::Development,
        }
    }

    /// Parses a mode name. Matching is case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" => Some(Mode::Development),
            "prod" | "production" => Some(Mode::Production),
            _ => None,
        }
    }

    pub fn is_development(self) -> bool {
        self == Mode::Development
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.templates_dir, PathBuf::from("app/views/"));
        assert_eq!(config.layout, "layouts/base");
        assert_eq!(config.extensions, vec![".html".to_string()]);
        assert!(!config.debug);
    }

    #[test]
    fn test_builder() {
        let config = RenderConfig::new("views")
            .with_layout("shell")
            .with_extensions([".tmpl"])
            .with_debug(true);
        assert_eq!(config.templates_dir, PathBuf::from("views"));
        assert_eq!(config.layout, "shell");
        assert_eq!(config.extensions, vec![".tmpl".to_string()]);
        assert!(config.debug);
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let config = RenderConfig::from_yaml_str("templates_dir: site\ndebug: true\n").unwrap();
        assert_eq!(config.templates_dir, PathBuf::from("site"));
        assert_eq!(config.layout, "layouts/base");
        assert_eq!(config.extensions, vec![".html".to_string()]);
        assert!(config.debug);
    }

    #[test]
    fn test_yaml_unknown_key_rejected() {
        let err = RenderConfig::from_yaml_str("template_dir: oops\n").unwrap_err();
        assert!(matches!(err, ViewError::Config(_)));
    }

    #[test]
    fn test_yaml_file_missing() {
        let err = RenderConfig::from_yaml_file("/nonexistent/viewset.yaml").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse(""), Some(Mode::Development));
        assert_eq!(Mode::parse("Development"), Some(Mode::Development));
        assert_eq!(Mode::parse("production"), Some(Mode::Production));
        assert_eq!(Mode::parse("staging"), None);
    }

    #[test]
    #[serial]
    fn test_mode_from_env() {
        std::env::remove_var(MODE_ENV_VAR);
        assert_eq!(Mode::from_env(), Mode::Development);

        std::env::set_var(MODE_ENV_VAR, "production");
        assert_eq!(Mode::from_env(), Mode::Production);

        std::env::set_var(MODE_ENV_VAR, "staging");
        assert_eq!(Mode::from_env(), Mode::Development);

        std::env::remove_var(MODE_ENV_VAR);
    }
}
