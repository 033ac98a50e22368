//! In-place rewriting of the package name inside project manifests.
//!
//! Each supported manifest format is a [`ManifestKind`] variant that knows
//! its file name, its naming convention, and how to set the name field in a
//! parsed document. Adding a format means adding a variant and its strategy.
//!
//! | Kind | File | Name declaration | Identifier |
//! |------|------|------------------|------------|
//! | [`ManifestKind::PyProject`] | `pyproject.toml` | `[project] name = "..."` | `snake_case` |
//! | [`ManifestKind::PackageJson`] | `package.json` | top-level `"name"` | `kebab-case` |
//!
//! ## Atomicity
//!
//! The new content is staged in a temporary file next to the manifest and
//! moved over it only after parsing and serializing succeeded. On any error
//! the original file is left as it was.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;
use toml_edit::{DocumentMut, Item, TableLike};

use crate::error::{Result, ScaffoldError};
use crate::sanitize::{sanitize, PackageFormat};

const DEFAULT_JSON_INDENT: &str = "  ";

/// A manifest format whose name declaration can be rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    /// Python `pyproject.toml` (PEP 621, with a Poetry fallback).
    PyProject,
    /// npm `package.json`.
    PackageJson,
}

impl ManifestKind {
    pub const ALL: [ManifestKind; 2] = [Self::PyProject, Self::PackageJson];

    /// File name that identifies this manifest in a template tree.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::PyProject => "pyproject.toml",
            Self::PackageJson => "package.json",
        }
    }

    /// Detect the manifest kind from a path's file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        Self::ALL.into_iter().find(|kind| kind.file_name() == name)
    }

    /// Naming convention of the ecosystem this manifest belongs to.
    pub fn package_format(self) -> PackageFormat {
        match self {
            Self::PyProject => PackageFormat::Python,
            Self::PackageJson => PackageFormat::Npm,
        }
    }

    /// Return `content` with its name declaration set to `identifier`.
    ///
    /// The error string describes why the document could not be parsed.
    pub fn set_name(self, content: &str, identifier: &str) -> std::result::Result<String, String> {
        match self {
            Self::PyProject => set_pyproject_name(content, identifier),
            Self::PackageJson => set_package_json_name(content, identifier),
        }
    }

    /// Rewrite the manifest at `path` so its name is `project_name` sanitized
    /// for this format. Returns the identifier that was written.
    pub fn rewrite_name(self, path: &Path, project_name: &str) -> Result<String> {
        let identifier = sanitize(project_name, self.package_format());

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScaffoldError::FileNotFound(path.to_path_buf())
            } else {
                ScaffoldError::ManifestRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let updated =
            self.set_name(&content, &identifier)
                .map_err(|message| ScaffoldError::ManifestParse {
                    path: path.to_path_buf(),
                    message,
                })?;

        write_staged(path, &updated)?;
        tracing::debug!(path = %path.display(), name = %identifier, "rewrote manifest name");
        Ok(identifier)
    }
}

fn set_pyproject_name(content: &str, identifier: &str) -> std::result::Result<String, String> {
    let mut doc = content.parse::<DocumentMut>().map_err(|e| e.to_string())?;

    let poetry_declares_name = doc
        .get("tool")
        .and_then(|tool| tool.get("poetry"))
        .and_then(|poetry| poetry.get("name"))
        .is_some();

    let table = if doc.contains_key("project") || !poetry_declares_name {
        doc.get_mut("project")
    } else {
        doc.get_mut("tool").and_then(|tool| tool.get_mut("poetry"))
    }
    .and_then(Item::as_table_like_mut)
    .ok_or_else(|| "missing [project] table".to_string())?;

    set_string_field(table, "name", identifier);
    Ok(doc.to_string())
}

/// Replace a string value, keeping the whitespace and comments around it.
fn set_string_field(table: &mut dyn TableLike, key: &str, new_value: &str) {
    match table.get_mut(key).and_then(Item::as_value_mut) {
        Some(existing) => {
            let decor = existing.decor().clone();
            *existing = toml_edit::Value::from(new_value);
            *existing.decor_mut() = decor;
        }
        None => {
            table.insert(key, toml_edit::value(new_value));
        }
    }
}

fn set_package_json_name(content: &str, identifier: &str) -> std::result::Result<String, String> {
    let mut doc: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    doc.as_object_mut()
        .ok_or_else(|| "top-level value is not a JSON object".to_string())?
        .insert("name".into(), serde_json::Value::String(identifier.into()));

    let indent = detect_json_indent(content);
    let mut buf = Vec::with_capacity(content.len());
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut serializer).map_err(|e| e.to_string())?;

    let mut out = String::from_utf8(buf).map_err(|e| e.to_string())?;
    if content.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Indentation of the first indented line, or two spaces.
fn detect_json_indent(content: &str) -> &str {
    content
        .lines()
        .skip(1)
        .find_map(|line| {
            let trimmed = line.trim_start_matches([' ', '\t']);
            let indent = &line[..line.len() - trimmed.len()];
            (!indent.is_empty() && !trimmed.is_empty()).then_some(indent)
        })
        .unwrap_or(DEFAULT_JSON_INDENT)
}

/// Write `contents` to a temp file beside `path`, then move it into place.
fn write_staged(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source: std::io::Error| ScaffoldError::ManifestWrite {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let permissions = std::fs::metadata(path).map_err(write_err)?.permissions();

    let mut staged = NamedTempFile::new_in(parent).map_err(write_err)?;
    staged.write_all(contents.as_bytes()).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;
    std::fs::set_permissions(staged.path(), permissions).map_err(write_err)?;
    staged.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
