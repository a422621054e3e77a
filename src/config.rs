//! Manifest of files to add.
//!
//! The manifest is JSON. It is looked up in this order: an explicit path,
//! the `PBXGRAFT_MANIFEST` environment variable, `pbxgraft.json` in the
//! current directory, and finally the manifest compiled into the binary.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::ids::IdScheme;
use pbxgraft_core::models::{Entry, NewGroupSpec};

const MANIFEST_ENV: &str = "PBXGRAFT_MANIFEST";
const LOCAL_MANIFEST: &str = "pbxgraft.json";
const BUILTIN_MANIFEST: &str = include_str!("../data/manifest.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Project document, relative to the invocation directory.
    #[serde(default = "default_project")]
    pub project: PathBuf,
    #[serde(default)]
    pub ids: IdScheme,
    /// Pins the sources build phase by id. The first one in the document is
    /// used when unset.
    #[serde(default)]
    pub sources_phase: Option<String>,
    /// Files placed in groups that already exist.
    #[serde(default)]
    pub files: Vec<FileSpec>,
    /// Groups created on demand, each with its files.
    #[serde(default)]
    pub new_groups: Vec<NewGroupConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSpec {
    pub path: String,
    pub group: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewGroupConfig {
    pub id: String,
    pub name: String,
    pub path: String,
    pub parent: String,
    pub files: Vec<String>,
}

fn default_project() -> PathBuf {
    PathBuf::from("GitFlow.xcodeproj/project.pbxproj")
}

impl Manifest {
    /// Resolve and load the manifest.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(MANIFEST_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(LOCAL_MANIFEST);
        if local.exists() {
            return Self::from_file(local);
        }
        tracing::debug!("using builtin manifest");
        Self::builtin()
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_MANIFEST).context("Failed to parse builtin manifest")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let manifest = Self::from_json(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded manifest");
        Ok(manifest)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if self.ids.build_prefix == self.ids.file_prefix {
            bail!(
                "id prefixes must differ (both are {:?})",
                self.ids.build_prefix
            );
        }

        let files = self.files.len()
            + self.new_groups.iter().map(|g| g.files.len()).sum::<usize>();
        let room = u64::from(u32::MAX - self.ids.start) + 1;
        if files as u64 > room {
            bail!(
                "id start {} leaves room for {} ids, but the manifest lists {} files",
                self.ids.start,
                room,
                files
            );
        }

        for file in &self.files {
            check_path(&file.path)?;
            if file.group.trim().is_empty() {
                bail!("file {} has an empty group id", file.path);
            }
        }

        let mut seen = HashSet::new();
        for group in &self.new_groups {
            if group.id.trim().is_empty() {
                bail!("new group {:?} has an empty id", group.name);
            }
            if !seen.insert(group.id.as_str()) {
                bail!("new group {} is defined twice", group.id);
            }
            if group.parent == group.id {
                bail!("new group {} is its own parent", group.id);
            }
            if group.files.is_empty() {
                bail!("new group {} has no files", group.id);
            }
            for path in &group.files {
                check_path(path)?;
            }
        }
        Ok(())
    }

    /// Flatten into entries: files for existing groups first, then the files
    /// of each new group, all in manifest order.
    pub fn entries(&self) -> Vec<Entry> {
        let existing = self
            .files
            .iter()
            .map(|f| Entry::new(f.path.clone(), f.group.clone()));

        let created = self.new_groups.iter().flat_map(|g| {
            let spec = NewGroupSpec {
                id: g.id.clone(),
                name: g.name.clone(),
                path: g.path.clone(),
                parent: g.parent.clone(),
            };
            g.files
                .iter()
                .map(move |path| Entry::in_new_group(path.clone(), spec.clone()))
        });

        existing.chain(created).collect()
    }
}

fn check_path(path: &str) -> Result<()> {
    if path.trim().is_empty() || path.ends_with('/') {
        bail!("invalid file path {:?}", path);
    }
    Ok(())
}
