//! Error types for template compilation and rendering.
//!
//! [`ViewError`] is the single error type returned by the crate. Build-time
//! variants ([`Walk`](ViewError::Walk), [`Read`](ViewError::Read),
//! [`Parse`](ViewError::Parse)) are fatal: a registry is either built from
//! every matching file or not built at all.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for all viewset operations.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The template directory could not be traversed.
    #[error("failed to walk template directory {}: {message}", .path.display())]
    Walk {
        /// Path being visited when the walk failed
        path: PathBuf,
        /// Error message from the filesystem
        message: String,
    },

    /// A matched template file could not be read.
    #[error("failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template body failed to compile.
    #[error("failed to parse template \"{name}\" ({}): {source}", .path.display())]
    Parse {
        /// Derived template name
        name: String,
        /// File the body was read from
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A render was attempted for a name that is not in the registry.
    #[error("template not found: \"{0}\"")]
    TemplateNotFound(String),

    /// Template execution failed.
    #[error("failed to render template \"{name}\": {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// Writing rendered output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewError {
    /// Returns true for errors raised while building a registry.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            ViewError::Walk { .. } | ViewError::Read { .. } | ViewError::Parse { .. }
        )
    }
}

impl From<serde_yaml::Error> for ViewError {
    fn from(err: serde_yaml::Error) -> Self {
        ViewError::Config(err.to_string())
    }
}
