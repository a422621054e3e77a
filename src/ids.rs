//! Id allocation for new records.
//!
//! Ids come from a counter rendered with a fixed prefix (`ADD200`,
//! `ADDFILE200`, ...). A candidate is only handed out when neither id of the
//! pair occurs in the document and neither was handed out earlier in the run.
//! The two prefixes must differ; config loading rejects schemes where they
//! don't.

use std::collections::HashSet;

use pbxgraft_core::Document;
use serde::Deserialize;

/// How new ids are spelled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IdScheme {
    pub build_prefix: String,
    pub file_prefix: String,
    pub start: u32,
}

impl Default for IdScheme {
    fn default() -> Self {
        Self {
            build_prefix: "ADD".to_string(),
            file_prefix: "ADDFILE".to_string(),
            start: 200,
        }
    }
}

/// Ids for one file: its build record and its file reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPair {
    pub build: String,
    pub file: String,
}

pub struct IdAllocator<'a> {
    doc: &'a Document,
    scheme: &'a IdScheme,
    /// `None` once the counter has run past `u32::MAX`.
    next: Option<u32>,
    issued: HashSet<String>,
}

impl<'a> IdAllocator<'a> {
    pub fn new(doc: &'a Document, scheme: &'a IdScheme) -> Self {
        Self {
            doc,
            scheme,
            next: Some(scheme.start),
            issued: HashSet::new(),
        }
    }

    /// Keep `id` out of the pool, e.g. the id of a group created this run.
    pub fn reserve(&mut self, id: &str) {
        self.issued.insert(id.to_string());
    }

    fn is_free(&self, id: &str) -> bool {
        !self.doc.is_taken(id) && !self.issued.contains(id)
    }

    /// The next free pair, or `None` when the counter is exhausted.
    pub fn next_pair(&mut self) -> Option<IdPair> {
        loop {
            let n = self.next?;
            self.next = n.checked_add(1);

            let build = format!("{}{:03}", self.scheme.build_prefix, n);
            let file = format!("{}{:03}", self.scheme.file_prefix, n);
            if !self.is_free(&build) || !self.is_free(&file) {
                tracing::debug!(%build, %file, "id candidate taken, skipping");
                continue;
            }

            self.issued.insert(build.clone());
            self.issued.insert(file.clone());
            return Some(IdPair { build, file });
        }
    }
}
