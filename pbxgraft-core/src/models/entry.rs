/// A file to add to the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path relative to the project's source root, e.g. `Services/Foo.swift`.
    pub path: String,
    pub target: GroupTarget,
}

/// The group an entry is placed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupTarget {
    /// A group id expected to exist in the document.
    Existing(String),
    /// A group to create if it does not exist yet.
    New(NewGroupSpec),
}

/// Definition of a group created when the first of its files is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroupSpec {
    pub id: String,
    /// Display name, e.g. `Bitbucket`.
    pub name: String,
    /// Folder path relative to the source root, e.g. `Services/Bitbucket`.
    pub path: String,
    /// Id of the group the new group is linked into.
    pub parent: String,
}

impl Entry {
    pub fn new(path: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target: GroupTarget::Existing(group.into()),
        }
    }

    pub fn in_new_group(path: impl Into<String>, group: NewGroupSpec) -> Self {
        Self {
            path: path.into(),
            target: GroupTarget::New(group),
        }
    }

    /// Final path segment, used as the record name.
    pub fn display_name(&self) -> &str {
        last_segment(&self.path)
    }

    /// Id of the group the entry is placed in.
    pub fn group_id(&self) -> &str {
        match &self.target {
            GroupTarget::Existing(id) => id,
            GroupTarget::New(spec) => &spec.id,
        }
    }
}

impl NewGroupSpec {
    /// Folder name written as the group's `path`.
    pub fn folder_name(&self) -> &str {
        last_segment(&self.path)
    }
}

fn last_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
