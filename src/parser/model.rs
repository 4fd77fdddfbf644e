use serde::{Deserialize, Serialize};

use super::languages::Language;

/// Result of parsing a whole repository. Immutable once returned; files are
/// ordered by path so output is reproducible for a fixed directory snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRepository {
    pub root: String,
    pub files: Vec<ParsedFile>,
}

/// One parsed source file.
///
/// `error` and the structural fields are mutually exclusive: when `error` is
/// set only `path`/`language`/`content`/`chunks` are populated. Chunking is
/// independent of structural extraction and always succeeds on readable
/// content. For languages without a structural extractor the structural
/// vectors are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: String,
    pub language: Language,
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub chunks: Vec<Chunk>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<ClassInfo>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionInfo>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ImportInfo>,
}

/// A class declaration with its directly-declared methods.
/// Line numbers are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub bases: Vec<String>,
    pub methods: Vec<FunctionInfo>,
}

/// A function declaration. Owned by its enclosing [`ClassInfo`] when it is a
/// method, otherwise by the file as a module-level function.
/// Line numbers are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub parameters: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Plain,
    From,
}

/// An import statement entry. `module` is present only for `from`-imports;
/// each imported name in a single statement yields one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportInfo {
    pub kind: ImportKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A bounded, line-addressed substring of a file's content.
/// Line numbers are 0-based and inclusive; for a given file the chunks are
/// contiguous, non-overlapping, and cover every line exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_repository() -> ParsedRepository {
        ParsedRepository {
            root: "/tmp/repo".to_string(),
            files: vec![
                ParsedFile {
                    path: "/tmp/repo/a.py".to_string(),
                    language: Language::Python,
                    content: "import os\n\nclass A(Base):\n    def m(self, x):\n        return x\n".to_string(),
                    error: None,
                    chunks: vec![
                        Chunk {
                            content: "import os\n".to_string(),
                            start_line: 0,
                            end_line: 1,
                            language: Language::Python,
                        },
                        Chunk {
                            content: "class A(Base):\n    def m(self, x):\n        return x".to_string(),
                            start_line: 2,
                            end_line: 4,
                            language: Language::Python,
                        },
                    ],
                    classes: vec![ClassInfo {
                        name: "A".to_string(),
                        start_line: 3,
                        end_line: 5,
                        bases: vec!["Base".to_string()],
                        methods: vec![FunctionInfo {
                            name: "m".to_string(),
                            start_line: 4,
                            end_line: 5,
                            parameters: vec!["self".to_string(), "x".to_string()],
                        }],
                    }],
                    functions: vec![],
                    imports: vec![
                        ImportInfo {
                            kind: ImportKind::Plain,
                            module: None,
                            name: "os".to_string(),
                            alias: None,
                        },
                        ImportInfo {
                            kind: ImportKind::From,
                            module: Some("pathlib".to_string()),
                            name: "Path".to_string(),
                            alias: Some("P".to_string()),
                        },
                    ],
                },
                ParsedFile {
                    path: "/tmp/repo/broken.py".to_string(),
                    language: Language::Python,
                    content: "def f(:\n".to_string(),
                    error: Some("syntax error: invalid syntax at line 1".to_string()),
                    chunks: vec![Chunk {
                        content: "def f(:".to_string(),
                        start_line: 0,
                        end_line: 0,
                        language: Language::Python,
                    }],
                    classes: vec![],
                    functions: vec![],
                    imports: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let repo = sample_repository();
        let json = serde_json::to_string(&repo).unwrap();
        let parsed: ParsedRepository = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, repo);
    }

    #[test]
    fn test_round_trip_keeps_line_numbering_distinction() {
        // Chunk spans are 0-based, declaration spans are 1-based; both must
        // survive serialization untouched.
        let repo = sample_repository();
        let json = serde_json::to_string_pretty(&repo).unwrap();
        let parsed: ParsedRepository = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.files[0].chunks[0].start_line, 0);
        assert_eq!(parsed.files[0].classes[0].start_line, 3);
        assert_eq!(parsed.files[0].classes[0].methods[0].parameters, vec!["self", "x"]);
    }

    #[test]
    fn test_import_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ImportKind::From).unwrap();
        assert_eq!(json, "\"from\"");
        let json = serde_json::to_string(&ImportKind::Plain).unwrap();
        assert_eq!(json, "\"plain\"");
    }

    #[test]
    fn test_error_file_skips_empty_structural_fields() {
        let repo = sample_repository();
        let json = serde_json::to_string(&repo.files[1]).unwrap();
        assert!(json.contains("\"error\""));
        assert!(!json.contains("\"classes\""));
        assert!(!json.contains("\"functions\""));
    }
}
