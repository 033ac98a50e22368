//! Core library for the acontext-scaffold toolkit.
//!
//! Turns a language starter template into a fresh project: the
//! [`registry::TemplateRegistry`] decides which presets exist (or whether they
//! must be discovered live), a [`catalog::Materializer`] places the template
//! tree on disk, and [`substitute::substitute_vars`] rewrites the package name
//! of every recognised manifest using [`sanitize::sanitize`].
//!
//! Supported manifests are listed in [`manifest::ManifestKind`]:
//! - `pyproject.toml` — `[project] name`, written as `snake_case`
//! - `package.json` — top-level `"name"`, written as `kebab-case`

pub mod catalog;
pub mod error;
pub mod manifest;
pub mod prereq;
pub mod project;
pub mod registry;
pub mod sanitize;
pub mod substitute;
