//! End-to-end project creation.
//!
//! Ties the pieces together for the `create` command:
//!
//! ```text
//! registry ──► preset ──► Materializer ──► <destination>/ ──► substitute_vars
//!   (static or discovered)   (copy/download)                  (manifest names)
//! ```
//!
//! The destination must not exist yet. If materializing fails the
//! half-written directory is removed; once substitution starts, files
//! rewritten before an error stay rewritten.

use std::path::{Path, PathBuf};

use crate::catalog::{Discoverer, Materializer};
use crate::error::{Result, ScaffoldError};
use crate::registry::{TemplatePreset, TemplateRegistry};
use crate::substitute::{substitute_vars, RewrittenManifest, VariableSet};

/// What to scaffold and where.
#[derive(Debug, Clone)]
pub struct ScaffoldRequest<'a> {
    pub language: &'a str,
    pub template: &'a str,
    /// Display name as typed by the user.
    pub project_name: &'a str,
    pub destination: &'a Path,
}

/// Result of a successful scaffolding run.
#[derive(Debug, Clone)]
pub struct ScaffoldOutcome {
    pub preset: TemplatePreset,
    pub destination: PathBuf,
    pub manifests: Vec<RewrittenManifest>,
}

/// Create the destination directory, refusing to reuse an existing path.
pub fn create_project_dir(destination: &Path) -> Result<()> {
    if destination.exists() {
        return Err(ScaffoldError::ProjectExists(destination.to_path_buf()));
    }
    std::fs::create_dir_all(destination)?;
    Ok(())
}

/// Resolve, materialize, and customize a template.
pub async fn scaffold(
    registry: &TemplateRegistry,
    discoverer: &dyn Discoverer,
    materializer: &dyn Materializer,
    request: &ScaffoldRequest<'_>,
) -> Result<ScaffoldOutcome> {
    let preset = registry
        .find_preset(request.language, request.template, discoverer)
        .await?;

    create_project_dir(request.destination)?;

    tracing::info!(
        preset = %preset.name,
        source = %preset.source,
        destination = %request.destination.display(),
        "materializing template"
    );
    if let Err(e) = materializer.materialize(&preset, request.destination).await {
        if let Err(cleanup) = std::fs::remove_dir_all(request.destination) {
            tracing::warn!(error = %cleanup, "failed to remove partial project directory");
        }
        return Err(e);
    }

    let vars = VariableSet::with_project_name(request.project_name);
    let manifests = substitute_vars(request.destination, &vars)?;

    Ok(ScaffoldOutcome {
        preset,
        destination: request.destination.to_path_buf(),
        manifests,
    })
}
