use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// The closed set of languages the pipeline recognizes by file extension.
///
/// Adding a language means adding a variant plus its extension mapping, and
/// optionally a structural extractor satisfying the extraction contract
/// (see [`super::python`] for the one fully-supported language).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    C,
    Go,
    Ruby,
    Rust,
}

impl Language {
    /// Look up a language by lowercase file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            "py" => Some(Language::Python),
            "js" => Some(Language::JavaScript),
            "ts" => Some(Language::TypeScript),
            "java" => Some(Language::Java),
            "cpp" => Some(Language::Cpp),
            "c" => Some(Language::C),
            "go" => Some(Language::Go),
            "rb" => Some(Language::Ruby),
            "rs" => Some(Language::Rust),
            _ => None,
        }
    }

    /// Derive the language from a path's extension. `None` means the file is
    /// unsupported and should be skipped by the walker.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Language> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        Language::from_extension(&ext)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Go => "go",
            Language::Ruby => "ruby",
            Language::Rust => "rust",
        }
    }

    /// Whether this language routes to the structural extractor. Every other
    /// recognized language goes through the generic file handler.
    #[must_use]
    pub fn has_structural_parser(self) -> bool {
        matches!(self, Language::Python)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
