use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use erd_share::codec;
use erd_share::export::{self, ExportMetadata};
use erd_share::import;
use erd_share::types::Diagram;
use erd_share::views::{self, ViewStore};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "erd-share")]
#[command(about = "Import schema dumps, save views and share ER diagrams as compact links")]
struct Cli {
    /// Saved views file
    #[arg(long, global = true, default_value = "erd-views.json")]
    views: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a diagram from a CSV schema dump
    Import {
        /// CSV file path
        #[arg(value_name = "CSV")]
        csv: PathBuf,

        /// Output file path (stdout if omitted)
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Diagram name stored in the export metadata
        #[arg(long, short)]
        name: Option<String>,
    },
    /// Print a share link for a diagram file
    Share {
        /// Diagram JSON file
        #[arg(value_name = "DIAGRAM")]
        diagram: PathBuf,

        /// Base URL of the diagram viewer
        #[arg(long, default_value = "http://localhost:5173")]
        base_url: String,

        /// Print only the encoded path segment
        #[arg(long)]
        segment_only: bool,
    },
    /// Decode a share link back into a diagram file
    Open {
        /// Share URL, /share/... path or bare encoded segment
        #[arg(value_name = "LINK")]
        link: String,

        /// Output file path (stdout if omitted)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Manage saved views
    Views {
        #[command(subcommand)]
        command: ViewCommands,
    },
}

#[derive(Subcommand)]
enum ViewCommands {
    /// List saved views
    List,
    /// Save a diagram file as a new view
    Save {
        /// Diagram JSON file
        #[arg(value_name = "DIAGRAM")]
        diagram: PathBuf,

        /// View name
        #[arg(long, short)]
        name: String,

        /// View description
        #[arg(long, short, default_value = "")]
        description: String,
    },
    /// Print a view as diagram JSON
    Show { id: String },
    /// Delete a view
    Delete { id: String },
    /// Star or unstar a view
    Star { id: String },
    /// Print a share link for a view
    Share {
        id: String,

        /// Base URL of the diagram viewer
        #[arg(long, default_value = "http://localhost:5173")]
        base_url: String,
    },
}

fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import { csv, out, name } => run_import(&csv, out.as_deref(), name),
        Commands::Share {
            diagram,
            base_url,
            segment_only,
        } => run_share(&diagram, &base_url, segment_only),
        Commands::Open { link, out } => run_open(&link, out.as_deref()),
        Commands::Views { command } => run_views(&cli.views, command),
    }
}

fn emit(diagram: &Diagram, metadata: &ExportMetadata, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            export::write_json_file(diagram, metadata, path)?;
            println!("Exported to: {}", path.display());
        }
        None => println!("{}", export::export_json(diagram, metadata)?),
    }
    Ok(())
}

fn run_import(csv_path: &Path, out: Option<&Path>, name: Option<String>) -> Result<()> {
    let diagram = import::read_csv_file(csv_path)?;
    let metadata = ExportMetadata {
        name,
        description: None,
    };
    emit(&diagram, &metadata, out)
}

fn run_share(diagram_path: &Path, base_url: &str, segment_only: bool) -> Result<()> {
    let imported = export::read_json_file(diagram_path)?;
    let link = if segment_only {
        codec::encode(&imported.diagram)?
    } else {
        codec::share_url(base_url, &imported.diagram)?
    };
    println!("{}", link);
    Ok(())
}

fn run_open(link: &str, out: Option<&Path>) -> Result<()> {
    let diagram = codec::segment_from_link(link)
        .and_then(|segment| codec::decode(&segment))
        .context("Share link is invalid or corrupted")?;
    emit(&diagram, &ExportMetadata::default(), out)
}

fn run_views(views_path: &Path, command: ViewCommands) -> Result<()> {
    let mut store = ViewStore::load(views_path)
        .with_context(|| format!("Failed to load views: {}", views_path.display()))?;

    match command {
        ViewCommands::List => {
            if store.views().is_empty() {
                println!("No saved views in {}", store.path().display());
            }
            for view in store.views() {
                println!(
                    "{} {} {} ({} tables)",
                    if view.starred { "*" } else { " " },
                    view.id,
                    view.name,
                    view.data.nodes.len()
                );
            }
        }
        ViewCommands::Save {
            diagram,
            name,
            description,
        } => {
            let imported = export::read_json_file(&diagram)?;
            let view = store.create_from_diagram(&name, &description, &imported.diagram)?;
            println!("Saved view {} ({})", view.name, view.id);
        }
        ViewCommands::Show { id } => {
            let view = store
                .get(&id)
                .with_context(|| format!("View not found: {}", id))?;
            let metadata = ExportMetadata {
                name: Some(view.name.clone()),
                description: Some(view.description.clone()).filter(|d| !d.is_empty()),
            };
            emit(&views::to_diagram(view), &metadata, None)?;
        }
        ViewCommands::Delete { id } => {
            let removed = store.delete(&id)?;
            println!("Deleted view {}", removed.name);
        }
        ViewCommands::Star { id } => {
            let starred = store.toggle_star(&id)?;
            println!("{} view {}", if starred { "Starred" } else { "Unstarred" }, id);
        }
        ViewCommands::Share { id, base_url } => {
            let view = store
                .get(&id)
                .with_context(|| format!("View not found: {}", id))?;
            println!("{}", codec::share_url(&base_url, &views::to_diagram(view))?);
        }
    }

    Ok(())
}
