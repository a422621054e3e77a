//! User-facing output of a run.

use std::fmt;

use crate::mutator::{Decision, GroupLink, PlannedGroup, Warning};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The document was replaced.
    Written,
    /// Changes were computed but not written.
    DryRun,
    /// No entry survived deduplication; the document was not touched.
    NothingToAdd,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub decisions: Vec<Decision>,
    pub warnings: Vec<Warning>,
    /// Number of files committed to the document.
    pub added: usize,
    pub outcome: Outcome,
    /// Links into existing groups, for [`render_tree`].
    pub links: Vec<GroupLink>,
    /// Groups created, for [`render_tree`].
    pub groups: Vec<PlannedGroup>,
}

impl RunReport {
    /// One line per entry decision, then one per warning.
    pub fn trace_lines(&self) -> Vec<String> {
        let decisions = self.decisions.iter().map(|d| match d {
            Decision::Added {
                name,
                group,
                new_group: false,
            } => format!("Adding {} to {}", name, group),
            Decision::Added {
                name,
                group,
                new_group: true,
            } => format!("Adding {} to new group {}", name, group),
            Decision::AlreadyExists { name } => format!("Skipping {} - already exists", name),
        });
        let warnings = self.warnings.iter().map(|w| format!("Warning: {}", w));
        decisions.chain(warnings).collect()
    }

    pub fn summary(&self) -> String {
        let files = if self.added == 1 { "file" } else { "files" };
        let mut line = match self.outcome {
            Outcome::NothingToAdd => return "Nothing to add.".to_string(),
            Outcome::Written => format!("Added {} {}.", self.added, files),
            Outcome::DryRun => format!("Would add {} {} (dry run).", self.added, files),
        };
        match self.warnings.len() {
            0 => {}
            1 => line.push_str(" 1 warning."),
            n => line.push_str(&format!(" {} warnings.", n)),
        }
        line
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.trace_lines() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.summary())
    }
}

/// A node of the change tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<TreeNode>,
}

/// Build the change tree: one root per existing group that gained children,
/// with new groups expanded under their parent.
pub fn change_tree(links: &[GroupLink], groups: &[PlannedGroup]) -> Vec<TreeNode> {
    let mut roots: Vec<TreeNode> = Vec::new();
    for link in links {
        let child = expand(&link.child.id, &link.child.name, groups);
        match roots.iter_mut().find(|r| r.label == link.group) {
            Some(root) => root.children.push(child),
            None => roots.push(TreeNode {
                label: link.group.clone(),
                children: vec![child],
            }),
        }
    }
    roots
}

fn expand(id: &str, name: &str, groups: &[PlannedGroup]) -> TreeNode {
    match groups.iter().find(|g| g.spec.id == id) {
        Some(group) => TreeNode {
            label: format!("+ {}/", name),
            children: group
                .children
                .iter()
                .map(|c| expand(&c.id, &c.name, groups))
                .collect(),
        },
        None => TreeNode {
            label: format!("+ {}", name),
            children: Vec::new(),
        },
    }
}

/// Render the change tree as ASCII art.
///
/// Example output:
/// ```text
/// SVCGROUP
/// ├── + AutoStashService.swift
/// └── + Security/
///     ├── + GPGService.swift
///     └── + SSHKeyService.swift
/// ```
pub fn render_tree(nodes: &[TreeNode]) -> String {
    let mut output = String::new();
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        render_node(&mut output, node, "", is_last, true);
    }
    output
}

fn render_node(output: &mut String, node: &TreeNode, prefix: &str, is_last: bool, is_root: bool) {
    if is_root {
        output.push_str(&node.label);
        output.push('\n');
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push_str(&node.label);
        output.push('\n');
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutator::Child;
    use pbxgraft_core::models::NewGroupSpec;

    fn child(id: &str, name: &str) -> Child {
        Child {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn report(added: usize, outcome: Outcome, warnings: Vec<Warning>) -> RunReport {
        RunReport {
            decisions: vec![],
            warnings,
            added,
            outcome,
            links: vec![],
            groups: vec![],
        }
    }

    #[test]
    fn test_summary_singular_and_plural() {
        assert_eq!(report(1, Outcome::Written, vec![]).summary(), "Added 1 file.");
        assert_eq!(report(3, Outcome::Written, vec![]).summary(), "Added 3 files.");
        assert_eq!(report(0, Outcome::NothingToAdd, vec![]).summary(), "Nothing to add.");
        assert_eq!(
            report(2, Outcome::DryRun, vec![]).summary(),
            "Would add 2 files (dry run)."
        );
    }

    #[test]
    fn test_summary_counts_warnings() {
        let warnings = vec![Warning::GroupNotFound {
            group: "GHOST".to_string(),
        }];
        assert_eq!(
            report(1, Outcome::Written, warnings).summary(),
            "Added 1 file. 1 warning."
        );
    }

    #[test]
    fn test_trace_lines() {
        let mut r = report(1, Outcome::Written, vec![]);
        r.decisions = vec![
            Decision::Added {
                name: "Foo.swift".to_string(),
                group: "SVCGROUP".to_string(),
                new_group: false,
            },
            Decision::Added {
                name: "Bar.swift".to_string(),
                group: "NEWGROUP".to_string(),
                new_group: true,
            },
            Decision::AlreadyExists {
                name: "Baz.swift".to_string(),
            },
        ];
        r.warnings = vec![Warning::GroupNotFound {
            group: "GHOST".to_string(),
        }];
        assert_eq!(
            r.trace_lines(),
            vec![
                "Adding Foo.swift to SVCGROUP",
                "Adding Bar.swift to new group NEWGROUP",
                "Skipping Baz.swift - already exists",
                "Warning: Could not find group GHOST",
            ]
        );
    }

    #[test]
    fn test_render_nested_change_tree() {
        let links = vec![
            GroupLink {
                group: "SVCGROUP".to_string(),
                child: child("ADDFILE200", "AutoStashService.swift"),
            },
            GroupLink {
                group: "SVCGROUP".to_string(),
                child: child("SVCSECURITYGROUP", "Security"),
            },
        ];
        let groups = vec![PlannedGroup {
            spec: NewGroupSpec {
                id: "SVCSECURITYGROUP".to_string(),
                name: "Security".to_string(),
                path: "Services/Security".to_string(),
                parent: "SVCGROUP".to_string(),
            },
            children: vec![
                child("ADDFILE201", "GPGService.swift"),
                child("ADDFILE202", "SSHKeyService.swift"),
            ],
        }];

        let output = render_tree(&change_tree(&links, &groups));
        let expected = "SVCGROUP\n├── + AutoStashService.swift\n└── + Security/\n    ├── + GPGService.swift\n    └── + SSHKeyService.swift\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_render_several_roots() {
        let links = vec![
            GroupLink {
                group: "VMGROUP".to_string(),
                child: child("ADDFILE200", "A.swift"),
            },
            GroupLink {
                group: "VIEWGROUP".to_string(),
                child: child("ADDFILE201", "B.swift"),
            },
        ];
        let output = render_tree(&change_tree(&links, &[]));
        assert_eq!(output, "VMGROUP\n└── + A.swift\nVIEWGROUP\n└── + B.swift\n");
    }
}
