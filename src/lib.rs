//! pbxgraft adds source files to an Xcode project document without
//! rewriting the parts it does not touch.

pub mod config;
pub mod ids;
pub mod mutator;
pub mod report;
pub mod run;
pub mod store;

pub use pbxgraft_core::{document, models, Document};
