//! Unified error types for the acontext-scaffold toolkit.

use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur while resolving, materializing, or customizing a template.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    // --- Registry ---

    /// The registry document was not found or could not be read.
    #[error("template registry not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry document exists but is not valid YAML of the expected shape.
    #[error("failed to parse template registry ({origin})")]
    ConfigParse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The registry document parsed but violates a structural rule.
    #[error("invalid template registry: {0}")]
    ConfigInvalid(String),

    /// The requested language has no bucket in the registry.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// The requested template is not offered for the language.
    #[error("unknown template '{template}' for language '{language}'")]
    UnknownTemplate { language: String, template: String },

    // --- Catalog collaborators ---

    /// Listing the presets of a language failed.
    #[error("template discovery failed: {0}")]
    Discovery(String),

    /// Placing the template tree on disk failed.
    #[error("template download failed: {0}")]
    Materialize(String),

    // --- Manifest rewriting ---

    /// The manifest to rewrite does not exist.
    #[error("manifest not found: {0}")]
    FileNotFound(PathBuf),

    /// The manifest exists but could not be read.
    #[error("failed to read manifest {path}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest content is not a valid document of its format.
    #[error("failed to parse manifest {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// Staging or committing the rewritten manifest failed. The original is untouched.
    #[error("failed to write manifest {path}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // --- Project ---

    /// Walking the materialized tree failed.
    #[error("failed to walk {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Attempted to create a project in a directory that already exists.
    #[error("project directory already exists: {0}")]
    ProjectExists(PathBuf),

    // --- General ---

    /// A filesystem I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScaffoldError {
    /// True for errors raised while loading the registry. These are fatal at startup.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigParse { .. } | Self::ConfigInvalid(_)
        )
    }
}

/// Alias for `Result<T, ScaffoldError>`.
pub type Result<T> = std::result::Result<T, ScaffoldError>;
