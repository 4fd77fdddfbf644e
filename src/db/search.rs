use rusqlite::{Result, params};

use super::models::{ChunkHit, SymbolRelation};
use super::Db;

impl Db {
    /// Case-insensitive substring search over stored chunk contents.
    /// Results are ordered by path and chunk position for reproducibility.
    pub fn search_chunks(&self, query: &str, limit: usize) -> Result<Vec<ChunkHit>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT f.path, f.language, c.content, c.start_line, c.end_line, c.position
            FROM chunks c
            JOIN files f ON f.id = c.file_id
            WHERE c.content LIKE ?
            ORDER BY f.path, c.position
            LIMIT ?
            "#,
        )?;

        let pattern = format!("%{query}%");
        let rows = stmt.query_map(params![pattern, limit as i64], |row| {
            Ok(ChunkHit {
                file_path: row.get(0)?,
                language: row.get(1)?,
                content: row.get(2)?,
                start_line: row.get::<_, i64>(3)? as usize,
                end_line: row.get::<_, i64>(4)? as usize,
                position: row.get::<_, i64>(5)? as usize,
            })
        })?;

        let mut hits = Vec::new();
        for row in rows {
            hits.push(row?);
        }
        Ok(hits)
    }

    /// Structural relations touching the given symbol name, either side.
    pub fn find_relations(&self, name: &str) -> Result<Vec<SymbolRelation>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT r.relation_type, r.source_name, r.target_name, f.path
            FROM symbol_relations r
            JOIN files f ON f.id = r.file_id
            WHERE r.source_name = ? OR r.target_name = ?
            ORDER BY f.path, r.id
            "#,
        )?;

        let rows = stmt.query_map(params![name, name], |row| {
            Ok(SymbolRelation {
                relation_type: row.get(0)?,
                source_name: row.get(1)?,
                target_name: row.get(2)?,
                file_path: row.get(3)?,
            })
        })?;

        let mut relations = Vec::new();
        for row in rows {
            relations.push(row?);
        }
        Ok(relations)
    }
}
