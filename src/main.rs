use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pbxgraft::config::Manifest;
use pbxgraft::report::{change_tree, render_tree};
use pbxgraft::run::{run, RunOptions};

#[derive(Parser)]
#[command(name = "pbxgraft")]
#[command(about = "Add missing source files to an Xcode project")]
struct Cli {
    /// Manifest listing the files to add (defaults to the builtin one)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Project document to edit, overriding the manifest
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Compute the changes without writing them
    #[arg(long)]
    dry_run: bool,

    /// Print the added files as a tree under their groups
    #[arg(long)]
    tree: bool,
}

/// Initialize tracing on stderr, keeping stdout for the run trace
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "pbxgraft=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let manifest = Manifest::load(cli.manifest.as_deref())?;

    let mut options = RunOptions::from_manifest(&manifest);
    if let Some(project) = cli.project {
        options.project = project;
    }
    options.dry_run = cli.dry_run;

    tracing::info!(project = %options.project.display(), "updating project");
    let report = run(&manifest, &options)?;

    println!("{}", report);
    if cli.tree && !report.links.is_empty() {
        println!();
        print!("{}", render_tree(&change_tree(&report.links, &report.groups)));
    }

    Ok(())
}
