//! Template registry: the per-language catalog of starter presets.
//!
//! The registry is loaded once at startup from a YAML document and is
//! read-only afterwards. Callers build it explicitly and pass it by
//! reference; there is no process-wide instance.
//!
//! ## Document shape
//!
//! ```yaml
//! repo: memodb-io/Acontext-Examples
//! templates:
//!   python:
//!     tools: [uv]
//!     presets:
//!       - name: openai
//!         path: python/openai    # optional, defaults to <language>/<name>
//!   typescript: {}               # no presets: resolved through discovery
//! ```
//!
//! A language bucket without static presets is resolved live through a
//! [`Discoverer`].

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::catalog::Discoverer;
use crate::error::{Result, ScaffoldError};

/// Registry document shipped with the binary.
pub const BUILTIN_REGISTRY: &str = include_str!("../../../templates/registry.yaml");

/// A named, ready-to-use template variant of one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplatePreset {
    pub name: String,
    /// Catalog-relative reference handed to the materializer.
    pub source: String,
    /// True when the preset came from live discovery rather than the registry.
    pub requires_discovery: bool,
}

impl TemplatePreset {
    /// A preset listed statically in the registry document.
    pub fn listed(language: &str, name: &str, path: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            source: path
                .map(str::to_string)
                .unwrap_or_else(|| format!("{language}/{name}")),
            requires_discovery: false,
        }
    }

    /// A preset reported by a [`Discoverer`].
    pub fn discovered(language: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: format!("{language}/{name}"),
            requires_discovery: true,
        }
    }
}

/// Everything the registry knows about one language.
#[derive(Debug, Clone, Default)]
pub struct LanguageEntry {
    presets: Vec<TemplatePreset>,
    tools: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    repo: String,
    #[serde(default)]
    templates: IndexMap<String, Option<LanguageDocument>>,
}

#[derive(Debug, Default, Deserialize)]
struct LanguageDocument {
    #[serde(default)]
    tools: Vec<String>,
    #[serde(default)]
    presets: Vec<PresetDocument>,
}

#[derive(Debug, Deserialize)]
struct PresetDocument {
    name: String,
    #[serde(default)]
    path: Option<String>,
}

/// Per-language template catalog.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    repo: String,
    languages: IndexMap<String, LanguageEntry>,
}

impl TemplateRegistry {
    /// Parse the registry embedded at compile time.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_REGISTRY, "builtin")
    }

    /// Load a registry document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ScaffoldError::ConfigNotFound {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::parse(&contents, &path.display().to_string())
    }

    /// Parse a registry document held in memory.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::parse(yaml, "inline")
    }

    fn parse(yaml: &str, origin: &str) -> Result<Self> {
        let doc: RegistryDocument =
            serde_yaml::from_str(yaml).map_err(|e| ScaffoldError::ConfigParse {
                origin: origin.to_string(),
                source: e,
            })?;

        if doc.repo.trim().is_empty() {
            return Err(ScaffoldError::ConfigInvalid("'repo' must not be empty".into()));
        }
        if doc.templates.is_empty() {
            return Err(ScaffoldError::ConfigInvalid(
                "'templates' declares no languages".into(),
            ));
        }

        let mut languages = IndexMap::with_capacity(doc.templates.len());
        for (language, bucket) in doc.templates {
            if language.trim().is_empty() {
                return Err(ScaffoldError::ConfigInvalid("empty language key".into()));
            }
            let bucket = bucket.unwrap_or_default();

            let mut seen = IndexSet::new();
            let mut presets = Vec::with_capacity(bucket.presets.len());
            for preset in &bucket.presets {
                if !seen.insert(preset.name.as_str()) {
                    return Err(ScaffoldError::ConfigInvalid(format!(
                        "duplicate preset '{}' for language '{language}'",
                        preset.name
                    )));
                }
                presets.push(TemplatePreset::listed(
                    &language,
                    &preset.name,
                    preset.path.as_deref(),
                ));
            }

            languages.insert(
                language,
                LanguageEntry {
                    presets,
                    tools: bucket.tools,
                },
            );
        }

        tracing::debug!(origin, languages = languages.len(), "loaded template registry");
        Ok(Self {
            repo: doc.repo,
            languages,
        })
    }

    /// Catalog root identifier the presets are published under.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Every language in the registry, in document order.
    pub fn languages(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }

    fn entry(&self, language: &str) -> Result<&LanguageEntry> {
        self.languages
            .get(language)
            .ok_or_else(|| ScaffoldError::UnknownLanguage(language.to_string()))
    }

    /// True when the language lists no static presets and must be discovered live.
    pub fn needs_discovery(&self, language: &str) -> Result<bool> {
        Ok(self.entry(language)?.presets.is_empty())
    }

    /// Statically listed presets of a language (empty when discovery is needed).
    pub fn presets(&self, language: &str) -> Result<&[TemplatePreset]> {
        Ok(&self.entry(language)?.presets)
    }

    /// Executables a project of this language expects on `PATH`.
    pub fn tools(&self, language: &str) -> Result<&[String]> {
        Ok(&self.entry(language)?.tools)
    }

    /// Presets offered for a language, asking `discoverer` only when the
    /// registry lists none.
    pub async fn resolve_presets(
        &self,
        language: &str,
        discoverer: &dyn Discoverer,
    ) -> Result<Vec<TemplatePreset>> {
        if !self.needs_discovery(language)? {
            return Ok(self.presets(language)?.to_vec());
        }

        tracing::info!(language, "discovering templates");
        let names = discoverer.discover(language).await?;
        let unique: IndexSet<String> = names.into_iter().collect();
        Ok(unique
            .iter()
            .map(|name| TemplatePreset::discovered(language, name))
            .collect())
    }

    /// Look up one preset by name.
    pub async fn find_preset(
        &self,
        language: &str,
        template: &str,
        discoverer: &dyn Discoverer,
    ) -> Result<TemplatePreset> {
        self.resolve_presets(language, discoverer)
            .await?
            .into_iter()
            .find(|p| p.name == template)
            .ok_or_else(|| ScaffoldError::UnknownTemplate {
                language: language.to_string(),
                template: template.to_string(),
            })
    }
}

/// Human-readable label for a raw preset identifier.
///
/// `-` and `_` both split words, each word is title-cased and the words are
/// joined with single spaces: `"my-custom_template"` becomes
/// `"My Custom Template"`. The language does not affect the result yet.
pub fn format_display_name(_language: &str, raw_name: &str) -> String {
    raw_name
        .split(['-', '_'])
        .filter(|segment| !segment.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    const MIXED: &str = r#"
repo: memodb-io/Acontext-Examples
templates:
  python:
    tools: [uv]
    presets:
      - name: openai
      - name: agno
        path: python/agno-basic
  typescript:
    presets: []
  go:
"#;

    struct FixedDiscoverer(Vec<&'static str>);

    #[async_trait]
    impl Discoverer for FixedDiscoverer {
        async fn discover(&self, _language: &str) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    #[test]
    fn test_builtin_registry_loads() {
        let registry = TemplateRegistry::builtin().unwrap();
        assert!(!registry.repo().is_empty());
        let languages = registry.languages();
        assert!(languages.contains(&"python"));
        assert!(languages.contains(&"typescript"));
    }

    #[test]
    fn test_builtin_languages_need_discovery() {
        let registry = TemplateRegistry::builtin().unwrap();
        assert!(registry.needs_discovery("python").unwrap());
        assert!(registry.needs_discovery("typescript").unwrap());
    }

    #[test]
    fn test_languages_keep_document_order() {
        let registry = TemplateRegistry::from_yaml_str(MIXED).unwrap();
        assert_eq!(registry.languages(), vec!["python", "typescript", "go"]);
    }

    #[test]
    fn test_needs_discovery_per_bucket() {
        let registry = TemplateRegistry::from_yaml_str(MIXED).unwrap();
        assert!(!registry.needs_discovery("python").unwrap());
        assert!(registry.needs_discovery("typescript").unwrap());
        assert!(registry.needs_discovery("go").unwrap());
    }

    #[test]
    fn test_unknown_language() {
        let registry = TemplateRegistry::from_yaml_str(MIXED).unwrap();
        let err = registry.needs_discovery("cobol").unwrap_err();
        assert!(matches!(err, ScaffoldError::UnknownLanguage(ref l) if l == "cobol"));
    }

    #[test]
    fn test_preset_sources() {
        let registry = TemplateRegistry::from_yaml_str(MIXED).unwrap();
        let presets = registry.presets("python").unwrap();
        assert_eq!(presets[0].source, "python/openai");
        assert_eq!(presets[1].source, "python/agno-basic");
        assert!(presets.iter().all(|p| !p.requires_discovery));
        assert_eq!(registry.tools("python").unwrap(), ["uv".to_string()]);
    }

    #[test]
    fn test_duplicate_preset_rejected() {
        let yaml = "repo: r\ntemplates:\n  python:\n    presets:\n      - name: a\n      - name: a\n";
        let err = TemplateRegistry::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ScaffoldError::ConfigInvalid(_)));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_malformed_registry() {
        let err = TemplateRegistry::from_yaml_str("templates: [1, 2").unwrap_err();
        assert!(matches!(err, ScaffoldError::ConfigParse { .. }));

        let err = TemplateRegistry::from_yaml_str("repo: \"\"\ntemplates:\n  python:\n").unwrap_err();
        assert!(matches!(err, ScaffoldError::ConfigInvalid(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TemplateRegistry::load(Path::new("/nonexistent/acontext/registry.yaml"))
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::ConfigNotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_static_presets_skips_discovery() {
        let registry = TemplateRegistry::from_yaml_str(MIXED).unwrap();
        let discoverer = FixedDiscoverer(vec!["should-not-appear"]);
        let presets = registry.resolve_presets("python", &discoverer).await.unwrap();
        let names: Vec<_> = presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["openai", "agno"]);
    }

    #[tokio::test]
    async fn test_resolve_discovered_presets_dedupes() {
        let registry = TemplateRegistry::from_yaml_str(MIXED).unwrap();
        let discoverer = FixedDiscoverer(vec!["vercel-ai", "openai", "vercel-ai"]);
        let presets = registry.resolve_presets("typescript", &discoverer).await.unwrap();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets[0].source, "typescript/vercel-ai");
        assert!(presets[0].requires_discovery);
    }

    #[tokio::test]
    async fn test_find_unknown_template() {
        let registry = TemplateRegistry::from_yaml_str(MIXED).unwrap();
        let discoverer = FixedDiscoverer(vec![]);
        let err = registry
            .find_preset("python", "langchain", &discoverer)
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::UnknownTemplate { .. }));
    }

    #[test]
    fn test_format_display_name() {
        assert_eq!(format_display_name("python", "openai"), "Openai");
        assert_eq!(format_display_name("typescript", "vercel-ai"), "Vercel Ai");
        assert_eq!(format_display_name("python", "custom_template"), "Custom Template");
        assert_eq!(
            format_display_name("typescript", "my-custom_template"),
            "My Custom Template"
        );
    }

    #[test]
    fn test_format_display_name_edge_cases() {
        assert_eq!(format_display_name("go", "OPENAI-SDK"), "Openai Sdk");
        assert_eq!(format_display_name("go", "--a__b-"), "A B");
        assert_eq!(format_display_name("go", "v2.beta"), "V2.beta");
        assert_eq!(format_display_name("go", ""), "");
    }
}
