use std::path::Path;

use anyhow::Result;

use acontext_scaffold_core::catalog::LocalCatalog;
use acontext_scaffold_core::registry::{format_display_name, TemplateRegistry};

use crate::output;

/// List the templates offered for each language.
///
/// Languages with static presets are listed from the registry; the rest are
/// discovered from the templates directory. A language whose discovery fails
/// is reported as a warning and the listing continues.
pub async fn run(
    registry: &TemplateRegistry,
    templates_dir: &Path,
    language: Option<&str>,
) -> Result<()> {
    let catalog = LocalCatalog::new(templates_dir);
    let languages = match language {
        Some(language) => {
            // Fail early on an unknown language
            registry.needs_discovery(language)?;
            vec![language]
        }
        None => registry.languages(),
    };

    output::print_header(&format!("Templates ({})", registry.repo()));
    for language in languages {
        println!();
        println!("  {language}");
        match registry.resolve_presets(language, &catalog).await {
            Ok(presets) if presets.is_empty() => output::print_warning("no templates found"),
            Ok(presets) => {
                for preset in presets {
                    output::print_key_value(
                        &preset.name,
                        &format_display_name(language, &preset.name),
                    );
                }
            }
            Err(e) => output::print_warning(&e.to_string()),
        }
    }
    println!();

    Ok(())
}
