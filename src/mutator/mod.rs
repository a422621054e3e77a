//! Plan and apply insertions of new source files into a project document.
//!
//! A run is two pure steps over an in-memory [`Document`]:
//!
//! - [`Mutator::plan`] drops entries whose display name already occurs in the
//!   document, allocates ids for the rest and decides which group each file
//!   and each new group is linked into.
//! - [`Mutator::apply`] splices the planned records into the original text at
//!   the section markers and list spans found by the parser, then re-parses
//!   the result.
//!
//! Nothing is written to disk here; see [`crate::store`].

mod apply;
mod plan;
mod records;

use std::fmt;

use pbxgraft_core::ParseError;
use thiserror::Error;

use crate::ids::IdScheme;

pub use apply::Applied;
pub use plan::{Child, Decision, GroupLink, MutationPlan, PlannedFile, PlannedGroup};

/// End-of-section markers that must each occur exactly once.
pub const BUILD_FILE_END: &str = "/* End PBXBuildFile section */";
pub const FILE_REFERENCE_END: &str = "/* End PBXFileReference section */";
pub const GROUP_END: &str = "/* End PBXGroup section */";

/// Fatal errors. Any of these aborts the run before anything is written.
#[derive(Debug, Error)]
pub enum MutateError {
    #[error("section marker `{marker}` not found")]
    MissingSectionMarker { marker: &'static str },

    #[error("section marker `{marker}` occurs {count} times")]
    DuplicateSectionMarker { marker: &'static str, count: usize },

    #[error("no PBXSourcesBuildPhase with a file list")]
    MissingSourcesPhase,

    #[error("sources build phase {id} not found")]
    SourcesPhaseNotFound { id: String },

    #[error("no free ids left after {prefix}{last}")]
    IdsExhausted { prefix: String, last: u32 },

    #[error("edited document no longer parses: {0}")]
    Corrupted(#[source] ParseError),
}

/// Recoverable problems. The affected link is skipped and the rest of the
/// plan still applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A target group could not be located, so its new children were not
    /// linked.
    GroupNotFound { group: String },
    /// A new group's parent could not be located, so the group was not
    /// created. Its files keep their build records.
    ParentGroupNotFound { group: String, parent: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::GroupNotFound { group } => write!(f, "Could not find group {}", group),
            Warning::ParentGroupNotFound { group, parent } => write!(
                f,
                "Could not create group {}: parent group {} not found",
                group, parent
            ),
        }
    }
}

/// Settings shared by planning and applying.
#[derive(Debug, Clone, Default)]
pub struct Mutator {
    ids: IdScheme,
    sources_phase: Option<String>,
}

impl Mutator {
    pub fn new(ids: IdScheme, sources_phase: Option<String>) -> Self {
        Self { ids, sources_phase }
    }
}
