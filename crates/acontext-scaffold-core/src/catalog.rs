//! Collaborators that enumerate presets and place template trees on disk.
//!
//! The engine only depends on the [`Discoverer`] and [`Materializer`]
//! traits. [`LocalCatalog`] implements both against a directory laid out as
//! `<root>/<language>/<preset>/...`, which is how the bundled `templates/`
//! directory is organised.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::error::{Result, ScaffoldError};
use crate::registry::TemplatePreset;

/// Lists the presets available for a language at runtime.
#[async_trait]
pub trait Discoverer: Send + Sync {
    /// Preset identifiers for `language`, in catalog order.
    async fn discover(&self, language: &str) -> Result<Vec<String>>;
}

/// Places a preset's file tree under a destination directory.
#[async_trait]
pub trait Materializer: Send + Sync {
    /// Copy or download `preset` into `destination`, which already exists and is empty.
    async fn materialize(&self, preset: &TemplatePreset, destination: &Path) -> Result<()>;
}

/// Template catalog backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalCatalog {
    root: PathBuf,
}

impl LocalCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[async_trait]
impl Discoverer for LocalCatalog {
    async fn discover(&self, language: &str) -> Result<Vec<String>> {
        let dir = self.root.join(language);
        tokio::task::spawn_blocking(move || list_presets(&dir))
            .await
            .map_err(|e| ScaffoldError::Discovery(e.to_string()))?
    }
}

/// Names of the non-hidden subdirectories of `dir`, sorted.
fn list_presets(dir: &Path) -> Result<Vec<String>> {
    let discovery_err =
        |e: std::io::Error| ScaffoldError::Discovery(format!("cannot list {}: {e}", dir.display()));

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(discovery_err)? {
        let entry = entry.map_err(discovery_err)?;
        if !entry.file_type().map_err(discovery_err)?.is_dir() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) if !is_hidden(name) => names.push(name.to_string()),
            Some(_) => {}
            None => tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 template name"),
        }
    }
    names.sort();
    Ok(names)
}

#[async_trait]
impl Materializer for LocalCatalog {
    async fn materialize(&self, preset: &TemplatePreset, destination: &Path) -> Result<()> {
        let source = self.root.join(&preset.source);
        if !source.is_dir() {
            return Err(ScaffoldError::Materialize(format!(
                "template '{}' not found at {}",
                preset.name,
                source.display()
            )));
        }

        let destination = destination.to_path_buf();
        tokio::task::spawn_blocking(move || copy_tree(&source, &destination))
            .await
            .map_err(|e| ScaffoldError::Materialize(e.to_string()))?
    }
}

/// Recursively copy `from` into `to`, skipping `.git`.
fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    let walker = WalkDir::new(from)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    let mut copied = 0usize;
    for entry in walker {
        let entry = entry.map_err(|e| ScaffoldError::Walk {
            path: e.path().unwrap_or(from).to_path_buf(),
            source: e,
        })?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| ScaffoldError::Materialize(e.to_string()))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        } else {
            tracing::warn!(path = %entry.path().display(), "skipping non-regular template entry");
        }
    }

    tracing::debug!(files = copied, from = %from.display(), "materialized template");
    Ok(())
}
