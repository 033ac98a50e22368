//! CLI command implementations for acontext-scaffold.
//!
//! Each module corresponds to a subcommand (`acontext-scaffold <command>`).

pub mod create;
pub mod templates;

use std::path::Path;

use acontext_scaffold_core::registry::TemplateRegistry;
use anyhow::Result;

/// Load the registry override if one was given, else the built-in document.
pub fn load_registry(path: Option<&Path>) -> Result<TemplateRegistry> {
    let registry = match path {
        Some(path) => TemplateRegistry::load(path)?,
        None => TemplateRegistry::builtin()?,
    };
    Ok(registry)
}
