//! Read-only index over a `project.pbxproj` document.
//!
//! The full text is parsed into a span-annotated value tree, then the
//! `objects` dictionary is flattened into an [`Object`] per record. Nothing
//! here re-serializes the document: callers use the recorded offsets to
//! splice new text into the original string, so untouched content stays
//! byte-for-byte identical.

mod lexer;
mod parser;

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::ops::Range;

use thiserror::Error;

pub use parser::{Field, Value};

/// The document could not be read as a property list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn at(src: &str, offset: usize, message: impl Into<String>) -> Self {
        let before = &src[..offset.min(src.len())];
        let line = before.matches('\n').count() + 1;
        let column = before.len() - before.rfind('\n').map(|i| i + 1).unwrap_or(0) + 1;
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// An ordered list of ids held by an object, such as a group's `children`
/// or a build phase's `files`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdList {
    pub items: Vec<String>,
    /// Offset of the `(`.
    pub open: usize,
    /// Offset of the `)`.
    pub close: usize,
    /// Offset just past the last item when that item has no trailing `,`.
    pub unterminated_at: Option<usize>,
    /// Offset just past the last item and its `,`, or just past the `(`
    /// when the list is empty.
    pub tail: usize,
}

/// One record from the `objects` dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub id: String,
    pub isa: String,
    /// From the start of the id to just past the terminating `;`.
    pub span: Range<usize>,
    attrs: Vec<(String, String)>,
    lists: Vec<(String, IdList)>,
}

impl Object {
    /// Scalar attribute by key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn list(&self, key: &str) -> Option<&IdList> {
        self.lists.iter().find(|(k, _)| k == key).map(|(_, l)| l)
    }

    /// Child sequence of a group.
    pub fn children(&self) -> Option<&IdList> {
        self.list("children")
    }

    /// File list of a build phase.
    pub fn files(&self) -> Option<&IdList> {
        self.list("files")
    }

    pub fn is_group(&self) -> bool {
        self.isa == isa::GROUP
    }
}

/// Render a scalar, quoting it when it is not a valid bare word.
pub fn quote(value: &str) -> Cow<'_, str> {
    if !value.is_empty() && value.chars().all(lexer::is_word_char) && !value.contains("/*") {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    Cow::Owned(out)
}

/// `isa` tags this crate cares about.
pub mod isa {
    pub const BUILD_FILE: &str = "PBXBuildFile";
    pub const FILE_REFERENCE: &str = "PBXFileReference";
    pub const GROUP: &str = "PBXGroup";
    pub const SOURCES_BUILD_PHASE: &str = "PBXSourcesBuildPhase";
}

#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    objects: Vec<Object>,
    by_id: HashMap<String, usize>,
    /// Every scalar in the document, dictionary keys included.
    taken: HashSet<String>,
}

impl Document {
    pub fn parse(text: impl Into<String>) -> Result<Self, ParseError> {
        let text = text.into();
        let root = parser::parse(&text)?;

        let Some(objects_value) = root.get("objects") else {
            return Err(ParseError::at(&text, 0, "missing `objects` dictionary"));
        };
        let Some(fields) = objects_value.fields() else {
            return Err(ParseError::at(
                &text,
                objects_value.span().start,
                "`objects` is not a dictionary",
            ));
        };

        let mut objects = Vec::with_capacity(fields.len());
        let mut by_id = HashMap::with_capacity(fields.len());
        let mut taken = HashSet::new();
        collect_scalars(&root, &mut taken);

        for field in fields {
            let object = index_object(field);
            if by_id.insert(object.id.clone(), objects.len()).is_some() {
                tracing::warn!(id = %object.id, "duplicate object id in document");
            }
            objects.push(object);
        }

        tracing::debug!(objects = objects.len(), "indexed document");

        Ok(Self {
            text,
            objects,
            by_id,
            taken,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn object(&self, id: &str) -> Option<&Object> {
        self.by_id.get(id).map(|&i| &self.objects[i])
    }

    /// Objects of one `isa`, in document order.
    pub fn objects_of<'a>(&'a self, isa: &'a str) -> impl Iterator<Item = &'a Object> + 'a {
        self.objects.iter().filter(move |o| o.isa == isa)
    }

    /// A group by id. Objects with another `isa` do not count.
    pub fn group(&self, id: &str) -> Option<&Object> {
        self.object(id).filter(|o| o.is_group())
    }

    /// Whether `id` already occurs in the document, either as a dictionary
    /// key or as a value.
    pub fn is_taken(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    /// Plain substring search over the whole text.
    pub fn mentions(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

fn collect_scalars(value: &Value, out: &mut HashSet<String>) {
    match value {
        Value::Scalar { text, .. } => {
            out.insert(text.clone());
        }
        Value::Array { items, .. } => items.iter().for_each(|v| collect_scalars(v, out)),
        Value::Dict { fields, .. } => {
            for field in fields {
                out.insert(field.key.clone());
                collect_scalars(&field.value, out);
            }
        }
    }
}

fn index_object(field: &Field) -> Object {
    let mut attrs = Vec::new();
    let mut lists = Vec::new();

    for inner in field.value.fields().unwrap_or_default() {
        match &inner.value {
            Value::Scalar { text, .. } => attrs.push((inner.key.clone(), text.clone())),
            Value::Array {
                items,
                span,
                trailing_comma,
                tail,
            } => {
                let unterminated_at = match items.last() {
                    Some(last) if !*trailing_comma => Some(last.span().end),
                    _ => None,
                };
                let ids = items
                    .iter()
                    .filter_map(Value::as_scalar)
                    .map(str::to_string)
                    .collect();
                lists.push((
                    inner.key.clone(),
                    IdList {
                        items: ids,
                        open: span.start,
                        close: span.end - 1,
                        unterminated_at,
                        tail: *tail,
                    },
                ));
            }
            Value::Dict { .. } => {}
        }
    }

    let isa = attrs
        .iter()
        .find(|(k, _)| k == "isa")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();

    Object {
        id: field.key.clone(),
        isa,
        span: field.key_span.start..field.end,
        attrs,
        lists,
    }
}
