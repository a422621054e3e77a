//! Domain models for pbxgraft.
//!
//! # Core Concepts
//!
//! - [`Entry`]: One instruction to add a source file under a group. The display
//!   name is the final path segment and is what duplicate detection keys on.
//! - [`GroupTarget`]: Where an entry lands, either a group that already exists
//!   in the document or a [`NewGroupSpec`] created on demand.
//! - [`FileKind`]: The `lastKnownFileType` tag written for a new file reference.
//!
//! Entries are ephemeral: they live for a single run and carry no ids. Ids are
//! allocated while planning.

mod entry;
mod file_kind;

pub use entry::*;
pub use file_kind::*;
