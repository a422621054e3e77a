use std::collections::HashMap;

use pbxgraft_core::models::{Entry, FileKind, GroupTarget, NewGroupSpec};
use pbxgraft_core::Document;

use super::{records, MutateError, Mutator};
use crate::ids::{IdAllocator, IdPair};

/// What to insert, computed against one document.
#[derive(Debug, Clone, Default)]
pub struct MutationPlan {
    /// Files to add, in entry order.
    pub files: Vec<PlannedFile>,
    /// Groups to create, in creation order. A group is only here if at least
    /// one of its files survived deduplication.
    pub groups: Vec<PlannedGroup>,
    /// Children appended to groups that are not created by this plan.
    pub links: Vec<GroupLink>,
    /// One decision per entry, in entry order.
    pub decisions: Vec<Decision>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub name: String,
    pub path: String,
    pub kind: FileKind,
    pub ids: IdPair,
    /// Group the file reference is linked into.
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedGroup {
    pub spec: NewGroupSpec,
    pub children: Vec<Child>,
}

/// An id plus the name written in its trailing comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLink {
    pub group: String,
    pub child: Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Added {
        name: String,
        group: String,
        /// The group is created by this plan.
        new_group: bool,
    },
    AlreadyExists {
        name: String,
    },
}

impl MutationPlan {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn group(&self, id: &str) -> Option<&PlannedGroup> {
        self.groups.iter().find(|g| g.spec.id == id)
    }
}

impl Mutator {
    pub fn plan(&self, entries: &[Entry], doc: &Document) -> Result<MutationPlan, MutateError> {
        let mut ids = IdAllocator::new(doc, &self.ids);
        for entry in entries {
            if let GroupTarget::New(spec) = &entry.target {
                ids.reserve(&spec.id);
            }
        }

        let mut plan = MutationPlan::default();
        // Text of the records planned so far, checked like the document.
        let mut planned_text = String::new();
        let mut created: HashMap<String, usize> = HashMap::new();
        // Children keyed by target group, resolved once every new group is known.
        let mut pending: Vec<GroupLink> = Vec::new();

        for entry in entries {
            let name = entry.display_name();

            if doc.mentions(name) || planned_text.contains(name) {
                tracing::debug!(%name, "already present, skipping");
                plan.decisions.push(Decision::AlreadyExists {
                    name: name.to_string(),
                });
                continue;
            }

            let pair = ids.next_pair().ok_or_else(|| MutateError::IdsExhausted {
                prefix: self.ids.build_prefix.clone(),
                last: u32::MAX,
            })?;
            let group = entry.group_id().to_string();

            if let GroupTarget::New(spec) = &entry.target {
                if doc.object(&spec.id).is_none() && !created.contains_key(&spec.id) {
                    plan.create_group(spec.clone(), &mut created, &mut pending);
                }
            }
            pending.push(GroupLink {
                group: group.clone(),
                child: Child {
                    id: pair.file.clone(),
                    name: name.to_string(),
                },
            });

            tracing::debug!(%name, build = %pair.build, file = %pair.file, %group, "planned file");
            let file = PlannedFile {
                name: name.to_string(),
                path: entry.path.clone(),
                kind: FileKind::from_path(&entry.path),
                ids: pair,
                group: group.clone(),
            };
            planned_text.push_str(&records::build_file(&file));
            planned_text.push_str(&records::file_reference(&file));
            plan.files.push(file);
            plan.decisions.push(Decision::Added {
                name: name.to_string(),
                group,
                new_group: false,
            });
        }

        for link in pending {
            match created.get(&link.group) {
                Some(&i) => plan.groups[i].children.push(link.child),
                None => plan.links.push(link),
            }
        }
        for decision in &mut plan.decisions {
            if let Decision::Added {
                group, new_group, ..
            } = decision
            {
                *new_group = created.contains_key(group.as_str());
            }
        }

        Ok(plan)
    }
}

impl MutationPlan {
    /// Register a new group and queue its link into the parent. The parent
    /// may be an existing group or any group created by this plan.
    fn create_group(
        &mut self,
        spec: NewGroupSpec,
        created: &mut HashMap<String, usize>,
        pending: &mut Vec<GroupLink>,
    ) {
        pending.push(GroupLink {
            group: spec.parent.clone(),
            child: Child {
                id: spec.id.clone(),
                name: spec.name.clone(),
            },
        });

        tracing::debug!(id = %spec.id, parent = %spec.parent, "planned new group");
        created.insert(spec.id.clone(), self.groups.len());
        self.groups.push(PlannedGroup {
            spec,
            children: Vec::new(),
        });
    }
}
