use std::collections::HashSet;

use pbxgraft_core::document::isa;
use pbxgraft_core::{Document, IdList, Object};

use super::plan::{GroupLink, MutationPlan, PlannedGroup};
use super::{records, MutateError, Mutator, Warning};
use super::{BUILD_FILE_END, FILE_REFERENCE_END, GROUP_END};

/// Result of applying a plan.
#[derive(Debug)]
pub struct Applied {
    pub document: Document,
    pub warnings: Vec<Warning>,
    /// Links into pre-existing groups that were actually made.
    pub links: Vec<GroupLink>,
    /// New groups that were written.
    pub groups: Vec<PlannedGroup>,
}

/// Text to insert at a byte offset of the original document.
struct Splice {
    at: usize,
    text: String,
}

impl Mutator {
    pub fn apply(&self, plan: &MutationPlan, doc: &Document) -> Result<Applied, MutateError> {
        let text = doc.text();

        let build_end = unique_marker(text, BUILD_FILE_END)?;
        let file_ref_end = unique_marker(text, FILE_REFERENCE_END)?;
        let group_end = unique_marker(text, GROUP_END)?;
        let sources = self.sources_phase(doc)?;

        let mut warnings = Vec::new();
        let groups = linked_groups(plan, doc, &mut warnings);
        let written: HashSet<&str> = groups.iter().map(|g| g.spec.id.as_str()).collect();
        let dropped: HashSet<&str> = plan
            .groups
            .iter()
            .map(|g| g.spec.id.as_str())
            .filter(|id| !written.contains(id))
            .collect();

        let mut splices = vec![
            Splice {
                at: build_end,
                text: plan.files.iter().map(records::build_file).collect(),
            },
            Splice {
                at: file_ref_end,
                text: plan.files.iter().map(records::file_reference).collect(),
            },
        ];

        if !groups.is_empty() {
            splices.push(Splice {
                at: group_end,
                text: groups.iter().map(records::group).collect(),
            });
        }

        // Existing groups, each once, in order of first use.
        let mut links = Vec::new();
        let mut seen = HashSet::new();
        for link in &plan.links {
            if dropped.contains(link.child.id.as_str()) || !seen.insert(link.group.as_str()) {
                continue;
            }
            let Some(children) = doc.group(&link.group).and_then(Object::children) else {
                tracing::warn!(group = %link.group, "group not found");
                warnings.push(Warning::GroupNotFound {
                    group: link.group.clone(),
                });
                continue;
            };

            let batch: Vec<&GroupLink> = plan
                .links
                .iter()
                .filter(|l| l.group == link.group && !dropped.contains(l.child.id.as_str()))
                .collect();
            let items: String = batch.iter().map(|l| records::list_item(&l.child)).collect();
            append_to_list(text, children, items, &mut splices);

            tracing::debug!(group = %link.group, added = batch.len(), "updated group");
            links.extend(batch.into_iter().cloned());
        }

        let items: String = plan.files.iter().map(records::sources_item).collect();
        append_to_list(text, sources, items, &mut splices);

        let edited = splice(text, splices);
        let document = Document::parse(edited).map_err(MutateError::Corrupted)?;

        Ok(Applied {
            document,
            warnings,
            links,
            groups,
        })
    }

    fn sources_phase<'d>(&self, doc: &'d Document) -> Result<&'d IdList, MutateError> {
        if let Some(id) = &self.sources_phase {
            return doc
                .object(id)
                .filter(|o| o.isa == isa::SOURCES_BUILD_PHASE)
                .and_then(Object::files)
                .ok_or_else(|| MutateError::SourcesPhaseNotFound { id: id.clone() });
        }

        let mut phases = doc
            .objects_of(isa::SOURCES_BUILD_PHASE)
            .filter(|o| o.files().is_some());
        let first = phases.next().ok_or(MutateError::MissingSourcesPhase)?;
        if phases.next().is_some() {
            tracing::warn!(
                phase = %first.id,
                "document has several sources build phases, using the first"
            );
        }
        first.files().ok_or(MutateError::MissingSourcesPhase)
    }
}

fn unique_marker(text: &str, marker: &'static str) -> Result<usize, MutateError> {
    let mut found = text.match_indices(marker).map(|(i, _)| i);
    let first = found
        .next()
        .ok_or(MutateError::MissingSectionMarker { marker })?;
    let extra = found.count();
    if extra > 0 {
        return Err(MutateError::DuplicateSectionMarker {
            marker,
            count: extra + 1,
        });
    }
    Ok(first)
}

/// New groups that end up linked into a parent. A group whose parent is
/// missing, or whose parent was itself dropped, is left out. Parents may be
/// created later in the plan than their children.
fn linked_groups(
    plan: &MutationPlan,
    doc: &Document,
    warnings: &mut Vec<Warning>,
) -> Vec<PlannedGroup> {
    let mut rooted: HashSet<&str> = HashSet::new();
    loop {
        let before = rooted.len();
        for group in &plan.groups {
            let parent = group.spec.parent.as_str();
            let linked = if plan.group(parent).is_some() {
                rooted.contains(parent)
            } else {
                doc.group(parent).and_then(Object::children).is_some()
            };
            if linked {
                rooted.insert(group.spec.id.as_str());
            }
        }
        if rooted.len() == before {
            break;
        }
    }

    let mut kept: Vec<PlannedGroup> = Vec::new();
    for group in &plan.groups {
        if rooted.contains(group.spec.id.as_str()) {
            kept.push(group.clone());
        } else {
            let parent = &group.spec.parent;
            tracing::warn!(group = %group.spec.id, %parent, "parent group not found");
            warnings.push(Warning::ParentGroupNotFound {
                group: group.spec.id.clone(),
                parent: parent.clone(),
            });
        }
    }

    kept
}

/// Queue `items` to go after the last element of `list`, keeping existing
/// elements where they are.
fn append_to_list(text: &str, list: &IdList, items: String, splices: &mut Vec<Splice>) {
    if items.is_empty() {
        return;
    }

    if let Some(at) = list.unterminated_at {
        splices.push(Splice {
            at,
            text: ",".to_string(),
        });
    }

    // Whatever sits between the last item and `)`: usually a newline and
    // the indentation of the closing line.
    let rest = &text[list.tail..list.close];
    match rest.rfind('\n') {
        Some(i) => splices.push(Splice {
            at: list.tail + i + 1,
            text: items,
        }),
        None => splices.push(Splice {
            at: list.close,
            text: format!("\n{}\t\t\t", items),
        }),
    }
}

fn splice(text: &str, mut splices: Vec<Splice>) -> String {
    splices.sort_by_key(|s| s.at);

    let extra: usize = splices.iter().map(|s| s.text.len()).sum();
    let mut out = String::with_capacity(text.len() + extra);
    let mut last = 0;
    for s in splices {
        out.push_str(&text[last..s.at]);
        out.push_str(&s.text);
        last = s.at;
    }
    out.push_str(&text[last..]);
    out
}
