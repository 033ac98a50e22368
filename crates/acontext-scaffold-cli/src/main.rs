//! acontext-scaffold CLI — start a new project from an Acontext starter template.
//!
//! Provides two commands: `create`, which materializes a template and renames
//! its package manifests after the new project, and `templates`, which lists
//! what the registry offers per language.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "acontext-scaffold",
    about = "Scaffold Acontext projects from language starter templates",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Template registry document (default: the built-in registry)
    #[arg(long, global = true, env = "ACONTEXT_REGISTRY")]
    registry: Option<PathBuf>,

    /// Directory holding `<language>/<template>/` starter trees
    #[arg(
        long,
        global = true,
        env = "ACONTEXT_TEMPLATES_DIR",
        default_value = "templates"
    )]
    templates_dir: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project from a template
    Create {
        /// Project name (prompted for if omitted)
        name: Option<String>,

        /// Template language, e.g. python or typescript
        #[arg(long, short)]
        language: Option<String>,

        /// Template preset within the language
        #[arg(long, short)]
        template: Option<String>,

        /// Target directory (default: ./<name>)
        #[arg(long, short)]
        dir: Option<PathBuf>,
    },

    /// List available templates
    Templates {
        /// Only list templates for this language
        #[arg(long, short)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let registry = commands::load_registry(cli.registry.as_deref())?;

    match cli.command {
        Commands::Create {
            name,
            language,
            template,
            dir,
        } => {
            commands::create::run(
                &registry,
                &cli.templates_dir,
                commands::create::CreateArgs {
                    name,
                    language,
                    template,
                    dir,
                },
            )
            .await?;
        }
        Commands::Templates { language } => {
            commands::templates::run(&registry, &cli.templates_dir, language.as_deref())
                .await?;
        }
    }

    Ok(())
}
