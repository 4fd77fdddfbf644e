use super::chunker;
use super::languages::Language;
use super::model::ParsedFile;

/// Fallback handler for recognized languages without a structural extractor:
/// the file contributes raw content and chunks only.
pub fn parse(path: String, language: Language, content: String, chunk_size: usize) -> ParsedFile {
    let chunks = chunker::chunk_content(&content, language, chunk_size);
    ParsedFile {
        path,
        language,
        content,
        error: None,
        chunks,
        classes: Vec::new(),
        functions: Vec::new(),
        imports: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::chunker::DEFAULT_CHUNK_SIZE;

    #[test]
    fn test_generic_file_has_no_structural_fields() {
        let content = "package main\n\nfunc main() {}\n".to_string();
        let file = parse(
            "main.go".to_string(),
            Language::Go,
            content,
            DEFAULT_CHUNK_SIZE,
        );

        assert_eq!(file.language, Language::Go);
        assert!(file.error.is_none());
        assert_eq!(file.chunks.len(), 2);
        assert!(file.classes.is_empty());
        assert!(file.functions.is_empty());
        assert!(file.imports.is_empty());
    }
}
