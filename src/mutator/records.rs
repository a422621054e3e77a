//! Text of new records, in the layout Xcode itself writes.

use pbxgraft_core::document::{isa, quote};

use super::plan::{Child, PlannedFile, PlannedGroup};

pub fn build_file(file: &PlannedFile) -> String {
    format!(
        "\t\t{build} /* {name} in Sources */ = {{isa = {isa}; fileRef = {file} /* {name} */; }};\n",
        build = file.ids.build,
        file = file.ids.file,
        name = comment(&file.name),
        isa = isa::BUILD_FILE,
    )
}

pub fn file_reference(file: &PlannedFile) -> String {
    format!(
        "\t\t{id} /* {name} */ = {{isa = {isa}; lastKnownFileType = {kind}; path = {path}; sourceTree = \"<group>\"; }};\n",
        id = file.ids.file,
        name = comment(&file.name),
        isa = isa::FILE_REFERENCE,
        kind = file.kind.as_str(),
        path = quote(&file.name),
    )
}

/// A list item such as `\t\t\t\tADDFILE200 /* Foo.swift */,`.
pub fn list_item(child: &Child) -> String {
    format!("\t\t\t\t{} /* {} */,\n", child.id, comment(&child.name))
}

/// A sources phase item referencing a build record.
pub fn sources_item(file: &PlannedFile) -> String {
    format!(
        "\t\t\t\t{} /* {} in Sources */,\n",
        file.ids.build,
        comment(&file.name)
    )
}

pub fn group(group: &PlannedGroup) -> String {
    let spec = &group.spec;
    let folder = spec.folder_name();

    let mut out = format!(
        "\t\t{} /* {} */ = {{\n\t\t\tisa = {};\n\t\t\tchildren = (\n",
        spec.id,
        comment(&spec.name),
        isa::GROUP
    );
    for child in &group.children {
        out.push_str(&list_item(child));
    }
    out.push_str("\t\t\t);\n");
    if spec.name != folder {
        out.push_str(&format!("\t\t\tname = {};\n", quote(&spec.name)));
    }
    out.push_str(&format!(
        "\t\t\tpath = {};\n\t\t\tsourceTree = \"<group>\";\n\t\t}};\n",
        quote(folder)
    ));
    out
}

/// Names inside `/* */` must not close the comment early.
fn comment(name: &str) -> String {
    name.replace("*/", "*_/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdPair;
    use pbxgraft_core::models::{FileKind, NewGroupSpec};

    fn planned(name: &str) -> PlannedFile {
        PlannedFile {
            name: name.to_string(),
            path: format!("Services/{}", name),
            kind: FileKind::from_path(name),
            ids: IdPair {
                build: "ADD200".to_string(),
                file: "ADDFILE200".to_string(),
            },
            group: "SVCGROUP".to_string(),
        }
    }

    #[test]
    fn test_build_file_line() {
        assert_eq!(
            build_file(&planned("Foo.swift")),
            "\t\tADD200 /* Foo.swift in Sources */ = {isa = PBXBuildFile; fileRef = ADDFILE200 /* Foo.swift */; };\n"
        );
    }

    #[test]
    fn test_file_reference_line() {
        assert_eq!(
            file_reference(&planned("Foo.swift")),
            "\t\tADDFILE200 /* Foo.swift */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.swift; path = Foo.swift; sourceTree = \"<group>\"; };\n"
        );
    }

    #[test]
    fn test_file_reference_quotes_path_with_space() {
        let line = file_reference(&planned("My View.swift"));
        assert!(line.contains("path = \"My View.swift\";"));
    }

    #[test]
    fn test_group_body() {
        let group = PlannedGroup {
            spec: NewGroupSpec {
                id: "SVCSSHGROUP".to_string(),
                name: "SSH".to_string(),
                path: "Services/SSH".to_string(),
                parent: "SVCGROUP".to_string(),
            },
            children: vec![Child {
                id: "ADDFILE201".to_string(),
                name: "Agent.swift".to_string(),
            }],
        };
        assert_eq!(
            super::group(&group),
            "\t\tSVCSSHGROUP /* SSH */ = {\n\
             \t\t\tisa = PBXGroup;\n\
             \t\t\tchildren = (\n\
             \t\t\t\tADDFILE201 /* Agent.swift */,\n\
             \t\t\t);\n\
             \t\t\tpath = SSH;\n\
             \t\t\tsourceTree = \"<group>\";\n\
             \t\t};\n"
        );
    }

    #[test]
    fn test_group_name_written_when_it_differs_from_folder() {
        let group = PlannedGroup {
            spec: NewGroupSpec {
                id: "G".to_string(),
                name: "Azure DevOps".to_string(),
                path: "Services/AzureDevOps".to_string(),
                parent: "P".to_string(),
            },
            children: vec![],
        };
        let body = super::group(&group);
        assert!(body.contains("\t\t\tname = \"Azure DevOps\";\n"));
        assert!(body.contains("\t\t\tpath = AzureDevOps;\n"));
    }
}
