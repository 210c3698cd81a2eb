//! mdspace CLI entry point.
//!
//! Works on a directory-backed store (one JSON file per key), by default the
//! platform data directory.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mdspace::kernel::services::adapters::{ensure_store_dir, load_settings, FileStore};
use mdspace::models::NodeKind;
use mdspace::Workspace;

mod logging;

#[derive(Parser, Debug)]
#[command(name = "mdspace")]
#[command(about = "Manage a markdown workspace: folders, documents and their versions")]
struct Cli {
    /// Store directory (defaults to the configured or platform data directory)
    #[arg(long, env = "MDSPACE_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the file tree
    Tree,
    /// List documents
    Docs,
    /// Create a document
    New {
        name: Option<String>,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Create a folder
    Mkdir {
        name: Option<String>,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Move an item to the top level, after a sibling, or into a folder
    Mv {
        item: String,
        target: Option<String>,
        #[arg(long)]
        into: bool,
    },
    /// Rename a tree item (renaming a file renames its document)
    Rename { item: String, name: String },
    /// Remove a tree item and the documents below it
    Rm { item: String },
    /// Add missing leaves for documents
    Sync,
    /// Make a document active and print it
    Open { document: String },
    /// Save the current state of a document as a version
    Snapshot { document: String },
    /// List saved versions, or restore one
    Versions {
        document: String,
        #[arg(long)]
        restore: Option<u32>,
    },
}

fn main() -> ExitCode {
    let log_guard = logging::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "command failed");
            eprintln!("Error: {e:?}");
            if let Some(guard) = &log_guard {
                eprintln!("logs: {}", guard.log_dir().display());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings();
    let dir = match cli.store.or_else(|| settings.workspace.store_dir.clone()) {
        Some(dir) => dir,
        None => ensure_store_dir().context("cannot determine store directory")?,
    };
    let store =
        FileStore::open(&dir).with_context(|| format!("cannot open store at {}", dir.display()))?;
    let mut workspace = Workspace::new(store, settings);

    match cli.command {
        Command::Tree => print_tree(&workspace),
        Command::Docs => {
            for doc in workspace.documents().iter() {
                println!("{}\t{}\tv{}\t{}", doc.id, doc.title, doc.version, doc.updated_at);
            }
        }
        Command::New { name, parent } => {
            let doc = workspace.create_file(parent.as_deref(), name.as_deref());
            println!("{}", doc.id);
        }
        Command::Mkdir { name, parent } => {
            let folder = workspace.create_folder(parent.as_deref(), name.as_deref());
            println!("{}", folder.id());
        }
        Command::Mv { item, target, into } => {
            if !workspace.move_item(&item, target.as_deref(), into) {
                anyhow::bail!("nothing moved: check the item and target ids");
            }
        }
        Command::Rename { item, name } => {
            if !workspace.rename_item(&item, &name) {
                anyhow::bail!("no item with id {item}");
            }
        }
        Command::Rm { item } => {
            if !workspace.remove_item(&item) {
                anyhow::bail!("no item with id {item}");
            }
        }
        Command::Sync => {
            workspace.reconcile();
            print_tree(&workspace);
        }
        Command::Open { document } => {
            let doc = workspace
                .document(&document)
                .with_context(|| format!("no document with id {document}"))?;
            workspace.switch_to(&doc.id);
            println!("{}", doc.content);
        }
        Command::Snapshot { document } => {
            let version = workspace
                .snapshot(&document)
                .with_context(|| format!("no document with id {document}"))?;
            println!("v{}", version.version);
        }
        Command::Versions { document, restore } => match restore {
            Some(version) => {
                let restored = workspace
                    .restore(&document, version)
                    .with_context(|| format!("no version {version} of {document}"))?;
                println!("restored v{} as v{}", restored.restored_from, restored.version);
            }
            None => {
                for v in workspace.versions(&document) {
                    println!("v{}\t{}\t{}", v.version, v.timestamp, v.title);
                }
            }
        },
    }
    Ok(())
}

fn print_tree(workspace: &Workspace<FileStore>) {
    for row in workspace.tree().flatten_for_view() {
        let marker = match row.kind {
            NodeKind::Folder => "/",
            NodeKind::Markdown | NodeKind::File => "",
        };
        println!(
            "{}{}{}\t{}",
            "  ".repeat(row.depth as usize),
            row.name,
            marker,
            row.id
        );
    }
}
