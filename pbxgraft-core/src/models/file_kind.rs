/// File type tag for a new file reference, derived from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Swift,
    ObjC,
    ObjCpp,
    C,
    Cpp,
    Header,
    Metal,
    Other,
}

impl FileKind {
    pub fn from_path(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        let Some((_, ext)) = name.rsplit_once('.') else {
            return Self::Other;
        };
        match ext {
            "swift" => Self::Swift,
            "m" => Self::ObjC,
            "mm" => Self::ObjCpp,
            "c" => Self::C,
            "cc" | "cpp" | "cxx" => Self::Cpp,
            "h" | "hpp" => Self::Header,
            "metal" => Self::Metal,
            _ => Self::Other,
        }
    }

    /// Value written to `lastKnownFileType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Swift => "sourcecode.swift",
            Self::ObjC => "sourcecode.c.objc",
            Self::ObjCpp => "sourcecode.cpp.objcpp",
            Self::C => "sourcecode.c.c",
            Self::Cpp => "sourcecode.cpp.cpp",
            Self::Header => "sourcecode.c.h",
            Self::Metal => "sourcecode.metal",
            Self::Other => "text",
        }
    }
}
