//! The whole run: read, plan, apply, write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use pbxgraft_core::models::Entry;
use pbxgraft_core::Document;

use crate::config::Manifest;
use crate::mutator::Mutator;
use crate::report::{Outcome, RunReport};
use crate::store;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub project: PathBuf,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            project: manifest.project.clone(),
            dry_run: false,
        }
    }
}

/// Add the manifest's entries to the project document.
///
/// The document is only written when at least one entry qualifies and every
/// step before the write succeeded. Fatal errors leave the file untouched.
pub fn run(manifest: &Manifest, options: &RunOptions) -> Result<RunReport> {
    let mutator = Mutator::new(manifest.ids.clone(), manifest.sources_phase.clone());
    run_entries(&mutator, &manifest.entries(), options)
}

pub fn run_entries(mutator: &Mutator, entries: &[Entry], options: &RunOptions) -> Result<RunReport> {
    let path = &options.project;
    let text = store::read_document(path)?;
    let doc = Document::parse(text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let plan = mutator
        .plan(entries, &doc)
        .with_context(|| format!("Failed to plan changes to {}", path.display()))?;
    if plan.is_empty() {
        tracing::info!("no entries qualify, leaving document untouched");
        return Ok(RunReport {
            decisions: plan.decisions,
            warnings: Vec::new(),
            added: 0,
            outcome: Outcome::NothingToAdd,
            links: Vec::new(),
            groups: Vec::new(),
        });
    }

    let applied = mutator
        .apply(&plan, &doc)
        .with_context(|| format!("Failed to update {}", path.display()))?;

    let outcome = if options.dry_run {
        Outcome::DryRun
    } else {
        store::write_atomic(path, applied.document.text())?;
        Outcome::Written
    };

    tracing::info!(
        added = plan.files.len(),
        warnings = applied.warnings.len(),
        path = %path.display(),
        "run finished"
    );

    Ok(RunReport {
        added: plan.files.len(),
        decisions: plan.decisions,
        warnings: applied.warnings,
        outcome,
        links: applied.links,
        groups: applied.groups,
    })
}
