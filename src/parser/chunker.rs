use super::languages::Language;
use super::model::Chunk;

/// Soft cap on accumulated chunk length in characters, counting the newline
/// separators between accumulated lines.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Splits raw text into line-addressed chunks covering the whole input.
///
/// Lines accumulate into the current chunk; the chunk is closed after a line
/// is appended when that line is blank, is the last line, or the accumulated
/// length exceeds `chunk_size`. The cap is soft: a single over-long line
/// still forms its own chunk. An empty input yields no chunks. Chunking
/// never inspects syntax and cannot fail.
pub fn chunk_content(content: &str, language: Language, chunk_size: usize) -> Vec<Chunk> {
    let lines: Vec<&str> = content.lines().collect();

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;
    let mut start = 0usize;

    for (i, line) in lines.iter().enumerate() {
        if !current.is_empty() {
            current_len += 1;
        }
        current.push(line);
        current_len += line.chars().count();

        let is_blank = line.trim().is_empty();
        let is_last = i + 1 == lines.len();

        if is_blank || is_last || current_len > chunk_size {
            chunks.push(Chunk {
                content: current.join("\n"),
                start_line: start,
                end_line: i,
                language,
            });
            current.clear();
            current_len = 0;
            start = i + 1;
        }
    }

    chunks
}
