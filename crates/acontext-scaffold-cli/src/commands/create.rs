use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use dialoguer::{Input, Select};

use acontext_scaffold_core::catalog::LocalCatalog;
use acontext_scaffold_core::manifest::ManifestKind;
use acontext_scaffold_core::prereq;
use acontext_scaffold_core::project::{self, ScaffoldRequest};
use acontext_scaffold_core::registry::{format_display_name, TemplateRegistry};
use acontext_scaffold_core::sanitize::{sanitize, PackageFormat};

use crate::output;

/// Options of `acontext-scaffold create`; anything left `None` is prompted for.
pub struct CreateArgs {
    pub name: Option<String>,
    pub language: Option<String>,
    pub template: Option<String>,
    pub dir: Option<PathBuf>,
}

/// Create a new project from a starter template.
///
/// Resolves the template (listing the catalog when the registry has no
/// static presets for the language), copies it into the target directory,
/// renames `pyproject.toml` / `package.json` after the project, and warns
/// about missing tools.
pub async fn run(registry: &TemplateRegistry, templates_dir: &Path, args: CreateArgs) -> Result<()> {
    let catalog = LocalCatalog::new(templates_dir);

    let name = match args.name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Project name")
            .validate_with(|input: &String| validate_project_name(input))
            .interact_text()?,
    };
    validate_project_name(&name).map_err(anyhow::Error::msg)?;

    output::print_header(&format!("acontext-scaffold create: {name}"));

    // Select language (interactive if not provided)
    output::print_step(1, 3, "Resolving template");
    let language = match args.language {
        Some(language) => language,
        None => {
            let languages = registry.languages();
            let selection = Select::new()
                .with_prompt("Select language")
                .items(&languages)
                .default(0)
                .interact()?;
            languages[selection].to_string()
        }
    };

    let template = match args.template {
        Some(template) => template,
        None => {
            let presets = registry.resolve_presets(&language, &catalog).await?;
            if presets.is_empty() {
                bail!("no templates available for {language}");
            }
            let labels: Vec<String> = presets
                .iter()
                .map(|p| format_display_name(&language, &p.name))
                .collect();
            let selection = Select::new()
                .with_prompt("Select template")
                .items(&labels)
                .default(0)
                .interact()?;
            presets[selection].name.clone()
        }
    };

    let destination = args.dir.unwrap_or_else(|| PathBuf::from(&name));
    output::print_key_value("Language", &language);
    output::print_key_value("Template", &format_display_name(&language, &template));
    output::print_key_value("Directory", &destination.display().to_string());

    output::print_step(2, 3, "Copying template files");
    let spinner = output::spinner(&format!("{language}/{template}"));
    let result = project::scaffold(
        registry,
        &catalog,
        &catalog,
        &ScaffoldRequest {
            language: &language,
            template: &template,
            project_name: &name,
            destination: &destination,
        },
    )
    .await;
    spinner.finish_and_clear();
    let outcome = result?;

    for manifest in &outcome.manifests {
        output::print_key_value(
            &manifest.path.display().to_string(),
            &format!("name = {}", manifest.name),
        );
    }

    output::print_step(3, 3, "Checking prerequisites");
    let missing = prereq::check_tools(registry.tools(&language)?);
    if missing.is_empty() {
        output::print_success("All required tools found");
    }
    for m in &missing {
        output::print_warning(&format!("Missing: {}", m.tool_name));
    }

    output::print_success(&format!(
        "Project '{name}' created from {language}/{template}"
    ));
    println!();
    println!("  Next steps:");
    println!("    cd {}", destination.display());
    for hint in next_steps(outcome.manifests.iter().map(|m| m.kind)) {
        println!("    {hint}");
    }
    println!();

    Ok(())
}

/// Reject names that leave nothing once sanitized.
fn validate_project_name(name: &str) -> std::result::Result<(), String> {
    if sanitize(name, PackageFormat::Python).is_empty() {
        return Err(format!("'{name}' is not a usable project name"));
    }
    Ok(())
}

fn next_steps(kinds: impl Iterator<Item = ManifestKind>) -> Vec<&'static str> {
    let mut hints = Vec::new();
    for kind in kinds {
        let hint = match kind {
            ManifestKind::PyProject => "uv sync",
            ManifestKind::PackageJson => "npm install",
        };
        if !hints.contains(&hint) {
            hints.push(hint);
        }
    }
    hints
}
