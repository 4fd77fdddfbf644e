use rusqlite::{OptionalExtension, Result, params};

use super::models::StoredRepository;
use super::Db;
use crate::parser::{ParsedFile, ParsedRepository};

impl Db {
    /// Inserts or updates a parsed repository, replacing any previously
    /// stored contents for the same root. Returns the repository row id.
    pub fn insert_repository(&mut self, repo: &ParsedRepository) -> Result<i64> {
        let tx = self.conn.transaction()?;

        let repo_id: i64 = tx.query_row(
            r#"
            INSERT INTO repositories (root, parsed_at)
            VALUES (?, CURRENT_TIMESTAMP)
            ON CONFLICT(root) DO UPDATE SET
                parsed_at = CURRENT_TIMESTAMP
            RETURNING id
            "#,
            params![repo.root],
            |row| row.get(0),
        )?;

        // Clean up old contents if any (re-indexing); cascades to chunks,
        // symbols, relations, and imports.
        tx.execute(
            "DELETE FROM files WHERE repository_id = ?",
            params![repo_id],
        )?;

        for file in &repo.files {
            insert_file(&tx, repo_id, file)?;
        }

        tx.commit()?;
        Ok(repo_id)
    }

    /// Lists stored repositories with their file counts, newest first.
    pub fn list_repositories(&self) -> Result<Vec<StoredRepository>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT r.id, r.root, r.parsed_at, COUNT(f.id)
            FROM repositories r
            LEFT JOIN files f ON f.repository_id = r.id
            GROUP BY r.id
            ORDER BY r.parsed_at DESC, r.id DESC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredRepository {
                id: row.get(0)?,
                root: row.get(1)?,
                parsed_at: row.get(2)?,
                file_count: row.get::<_, i64>(3)? as usize,
            })
        })?;

        let mut repos = Vec::new();
        for row in rows {
            repos.push(row?);
        }
        Ok(repos)
    }

    /// Deletes a stored repository and all of its contents.
    pub fn delete_repository(&self, root: &str) -> Result<bool> {
        let repo_id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM repositories WHERE root = ?",
                params![root],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(repo_id) = repo_id {
            let rows = self
                .conn
                .execute("DELETE FROM repositories WHERE id = ?", params![repo_id])?;
            Ok(rows > 0)
        } else {
            Ok(false)
        }
    }
}

fn insert_file(tx: &rusqlite::Transaction<'_>, repo_id: i64, file: &ParsedFile) -> Result<()> {
    tx.execute(
        "INSERT INTO files (repository_id, path, language, error) VALUES (?, ?, ?, ?)",
        params![repo_id, file.path, file.language.name(), file.error],
    )?;
    let file_id = tx.last_insert_rowid();

    for (position, chunk) in file.chunks.iter().enumerate() {
        tx.execute(
            "INSERT INTO chunks (file_id, position, content, start_line, end_line) VALUES (?, ?, ?, ?, ?)",
            params![
                file_id,
                position as i64,
                chunk.content,
                chunk.start_line as i64,
                chunk.end_line as i64,
            ],
        )?;
    }

    for class in &file.classes {
        tx.execute(
            "INSERT INTO symbols (file_id, kind, name, parent, start_line, end_line) VALUES (?, 'class', ?, NULL, ?, ?)",
            params![
                file_id,
                class.name,
                class.start_line as i64,
                class.end_line as i64,
            ],
        )?;
        for base in &class.bases {
            tx.execute(
                "INSERT INTO symbol_relations (file_id, relation_type, source_name, target_name) VALUES (?, 'inherits', ?, ?)",
                params![file_id, class.name, base],
            )?;
        }
        for method in &class.methods {
            tx.execute(
                "INSERT INTO symbols (file_id, kind, name, parent, start_line, end_line) VALUES (?, 'method', ?, ?, ?, ?)",
                params![
                    file_id,
                    method.name,
                    class.name,
                    method.start_line as i64,
                    method.end_line as i64,
                ],
            )?;
            tx.execute(
                "INSERT INTO symbol_relations (file_id, relation_type, source_name, target_name) VALUES (?, 'method_of', ?, ?)",
                params![file_id, method.name, class.name],
            )?;
        }
    }

    for func in &file.functions {
        tx.execute(
            "INSERT INTO symbols (file_id, kind, name, parent, start_line, end_line) VALUES (?, 'function', ?, NULL, ?, ?)",
            params![
                file_id,
                func.name,
                func.start_line as i64,
                func.end_line as i64,
            ],
        )?;
    }

    for import in &file.imports {
        let kind = match import.kind {
            crate::parser::ImportKind::Plain => "plain",
            crate::parser::ImportKind::From => "from",
        };
        tx.execute(
            "INSERT INTO imports (file_id, kind, module, name, alias) VALUES (?, ?, ?, ?, ?)",
            params![file_id, kind, import.module, import.name, import.alias],
        )?;
    }

    Ok(())
}
