//! Template variable substitution over a materialized tree.
//!
//! Only the `project_name` variable is defined today. It is applied by
//! rewriting the name declaration of every recognised manifest (see
//! [`ManifestKind`]); other files are left alone.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, ScaffoldError};
use crate::manifest::ManifestKind;

/// Directories never descended into while substituting.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];

/// Template variables supplied by the caller, keyed by variable name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    vars: BTreeMap<String, String>,
}

impl VariableSet {
    /// Display name of the project, before any sanitizing.
    pub const PROJECT_NAME: &'static str = "project_name";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project_name(project_name: impl Into<String>) -> Self {
        let mut vars = Self::new();
        vars.insert(Self::PROJECT_NAME, project_name);
        vars
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn project_name(&self) -> Option<&str> {
        self.get(Self::PROJECT_NAME)
    }
}

/// A manifest whose name declaration was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenManifest {
    pub path: PathBuf,
    pub kind: ManifestKind,
    /// Identifier written into the name field.
    pub name: String,
}

/// Apply `vars` to every manifest under `root`, visiting entries in file name order.
///
/// Stops at the first manifest that fails to rewrite and returns its error.
/// Manifests rewritten before the failure keep their new content.
pub fn substitute_vars(root: &Path, vars: &VariableSet) -> Result<Vec<RewrittenManifest>> {
    let Some(project_name) = vars.project_name() else {
        tracing::debug!(root = %root.display(), "no project_name set, nothing to substitute");
        return Ok(Vec::new());
    };

    let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|entry| {
        !(entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
    });

    let mut rewritten = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| ScaffoldError::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(kind) = ManifestKind::from_path(entry.path()) else {
            continue;
        };

        let name = kind.rewrite_name(entry.path(), project_name)?;
        rewritten.push(RewrittenManifest {
            path: entry.into_path(),
            kind,
            name,
        });
    }

    tracing::info!(root = %root.display(), manifests = rewritten.len(), "substituted template variables");
    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_template_vars() {
        let dir = tempfile::tempdir().unwrap();
        let pyproject = dir.path().join("pyproject.toml");
        std::fs::write(&pyproject, "[project]\nname = \"acontext-examples\"\nversion = \"0.1.0\"\n").unwrap();
        let package_json = dir.path().join("package.json");
        std::fs::write(
            &package_json,
            "{\n  \"name\": \"acontext-examples\",\n  \"version\": \"0.1.0\"\n}\n",
        )
        .unwrap();

        let vars = VariableSet::with_project_name("My-New-Project");
        let rewritten = substitute_vars(dir.path(), &vars).unwrap();
        assert_eq!(rewritten.len(), 2);

        let py = std::fs::read_to_string(&pyproject).unwrap();
        assert!(py.contains("name ="));
        assert!(py.contains("my_new_project"));

        let js = std::fs::read_to_string(&package_json).unwrap();
        assert!(js.contains(r#""name": "my-new-project""#));
    }

    #[test]
    fn test_nested_manifests_and_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("web/src")).unwrap();
        std::fs::write(dir.path().join("web/package.json"), r#"{"name": "web"}"#).unwrap();
        std::fs::write(dir.path().join("README.md"), "# acontext-examples\n").unwrap();

        let rewritten =
            substitute_vars(dir.path(), &VariableSet::with_project_name("Chat Bot")).unwrap();

        assert_eq!(rewritten.len(), 1);
        assert_eq!(rewritten[0].kind, ManifestKind::PackageJson);
        assert_eq!(rewritten[0].name, "chat-bot");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("README.md")).unwrap(),
            "# acontext-examples\n"
        );
    }

    #[test]
    fn test_skips_node_modules() {
        let dir = tempfile::tempdir().unwrap();
        let vendored = dir.path().join("node_modules/left-pad/package.json");
        std::fs::create_dir_all(vendored.parent().unwrap()).unwrap();
        std::fs::write(&vendored, r#"{"name": "left-pad"}"#).unwrap();

        let rewritten =
            substitute_vars(dir.path(), &VariableSet::with_project_name("demo")).unwrap();
        assert!(rewritten.is_empty());
        assert_eq!(
            std::fs::read_to_string(&vendored).unwrap(),
            r#"{"name": "left-pad"}"#
        );
    }

    #[test]
    fn test_without_project_name_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, r#"{"name": "keep"}"#).unwrap();

        let rewritten = substitute_vars(dir.path(), &VariableSet::new()).unwrap();
        assert!(rewritten.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"name": "keep"}"#);
    }

    #[test]
    fn test_failure_surfaces_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = substitute_vars(dir.path(), &VariableSet::with_project_name("demo")).unwrap_err();
        match err {
            ScaffoldError::ManifestParse { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_failure_keeps_earlier_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a/pyproject.toml");
        let bad = dir.path().join("b/package.json");
        std::fs::create_dir_all(good.parent().unwrap()).unwrap();
        std::fs::create_dir_all(bad.parent().unwrap()).unwrap();
        std::fs::write(&good, "[project]\nname = \"acontext-examples\"\n").unwrap();
        std::fs::write(&bad, "{ not json").unwrap();

        let err = substitute_vars(dir.path(), &VariableSet::with_project_name("My App"))
            .unwrap_err();
        match err {
            ScaffoldError::ManifestParse { path: failed, .. } => assert_eq!(failed, bad),
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(
            std::fs::read_to_string(&good).unwrap(),
            "[project]\nname = \"my_app\"\n"
        );
        assert_eq!(std::fs::read_to_string(&bad).unwrap(), "{ not json");
    }

    #[test]
    fn test_missing_root_reports_walk_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("not-materialized");

        let err = substitute_vars(&root, &VariableSet::with_project_name("demo")).unwrap_err();
        match err {
            ScaffoldError::Walk { path, .. } => assert_eq!(path, root),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_variable_set_accessors() {
        let mut vars = VariableSet::new();
        assert_eq!(vars.project_name(), None);
        vars.insert("project_name", "Demo App");
        assert_eq!(vars.project_name(), Some("Demo App"));
        assert_eq!(vars.get("missing"), None);
    }
}
