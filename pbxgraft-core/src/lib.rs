//! Core library for pbxgraft: entry models and the project document index.

pub mod document;
pub mod models;

pub use document::{Document, IdList, Object, ParseError};
