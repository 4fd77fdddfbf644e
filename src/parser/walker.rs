use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, info, warn};

use super::ParseError;
use super::chunker::{self, DEFAULT_CHUNK_SIZE};
use super::generic;
use super::languages::Language;
use super::model::{ParsedFile, ParsedRepository};
use super::python;

/// Walks a repository tree and parses every recognized source file.
///
/// Per-file parsing is independent; failures are isolated onto each file's
/// `error` field so one malformed or unreadable file never prevents the
/// rest of the repository from being parsed.
pub struct RepoParser {
    chunk_size: usize,
}

impl Default for RepoParser {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl RepoParser {
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// Parse a repository rooted at `root`.
    ///
    /// Fails only when `root` does not exist. Files with unrecognized
    /// extensions are silently skipped; results are ordered by path so the
    /// output is reproducible for a fixed directory snapshot.
    pub fn parse_repository<P: AsRef<Path>>(&self, root: P) -> Result<ParsedRepository, ParseError> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(ParseError::PathNotFound(root.to_path_buf()));
        }

        info!("Parsing repository: {}", root.display());

        // Walk builder respects .gitignore by default
        let walker = WalkBuilder::new(root).hidden(false).build();
        let mut eligible: Vec<(PathBuf, Language)> = Vec::new();
        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            match Language::from_path(path) {
                Some(language) => eligible.push((path.to_path_buf(), language)),
                None => debug!("Skipping unsupported file: {}", path.display()),
            }
        }
        eligible.sort_by(|a, b| a.0.cmp(&b.0));

        let mut files = Vec::with_capacity(eligible.len());
        for (path, language) in &eligible {
            let language = *language;
            let path_str = normalize_path(path);
            let file = match fs::read_to_string(path) {
                Ok(content) => self.parse_source(path_str, language, content),
                Err(e) => {
                    warn!("Error reading file {}: {e}", path.display());
                    ParsedFile {
                        path: path_str,
                        language,
                        content: String::new(),
                        error: Some(ParseError::Io(e).to_string()),
                        chunks: Vec::new(),
                        classes: Vec::new(),
                        functions: Vec::new(),
                        imports: Vec::new(),
                    }
                }
            };
            files.push(file);
        }

        info!("Parsed {} files under {}", files.len(), root.display());

        Ok(ParsedRepository {
            root: normalize_path(root),
            files,
        })
    }

    /// Parse a single file.
    ///
    /// Unlike the repository walk, an unrecognized extension and an
    /// unreadable file are hard errors here; there is no traversal to
    /// continue.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedFile, ParseError> {
        let path = path.as_ref();
        let language = Language::from_path(path).ok_or_else(|| {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default();
            ParseError::UnsupportedExtension(ext.to_string())
        })?;
        let content = fs::read_to_string(path)?;
        Ok(self.parse_source(normalize_path(path), language, content))
    }

    /// Dispatch on language: the structural extractor for Python, the
    /// generic handler for everything else. A structural failure degrades
    /// the file to content + chunks with the error recorded as a value.
    fn parse_source(&self, path: String, language: Language, content: String) -> ParsedFile {
        if !language.has_structural_parser() {
            return generic::parse(path, language, content, self.chunk_size);
        }

        let chunks = chunker::chunk_content(&content, language, self.chunk_size);
        match python::extract_structure(&content) {
            Ok(structure) => ParsedFile {
                path,
                language,
                content,
                error: None,
                chunks,
                classes: structure.classes,
                functions: structure.functions,
                imports: structure.imports,
            },
            Err(e) => {
                warn!("Structural extraction failed for {path}: {e}");
                ParsedFile {
                    path,
                    language,
                    content,
                    error: Some(e.to_string()),
                    chunks,
                    classes: Vec::new(),
                    functions: Vec::new(),
                    imports: Vec::new(),
                }
            }
        }
    }
}

/// Store consistent forward-slash paths regardless of platform.
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
