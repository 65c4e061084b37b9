use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;
use crate::taken::TakenStore;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS taken_courses (
            id         INTEGER PRIMARY KEY,
            code       TEXT UNIQUE NOT NULL,
            added_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

/// Taken-courses list kept in SQLite, ordered by insertion.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(connect(path)?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM taken_courses", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

impl TakenStore for SqliteStore {
    fn has(&self, code: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM taken_courses WHERE code = ?1",
                [code],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn insert(&mut self, code: &str) -> Result<()> {
        self.conn
            .execute("INSERT OR IGNORE INTO taken_courses (code) VALUES (?1)", [code])?;
        Ok(())
    }

    fn remove(&mut self, code: &str) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM taken_courses WHERE code = ?1", [code])?;
        Ok(n > 0)
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT code FROM taken_courses ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::codes::CourseCode;
    use crate::taken::merge_taken;

    fn store() -> SqliteStore {
        SqliteStore::from_connection(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn insert_is_idempotent() {
        let mut s = store();
        s.insert("MATH-101").unwrap();
        s.insert("MATH-101").unwrap();
        assert_eq!(s.count().unwrap(), 1);
        assert!(s.has("MATH-101").unwrap());
        assert!(!s.has("MATH-102").unwrap());
    }

    #[test]
    fn merge_and_list_in_order() {
        let mut s = store();
        let codes = vec![
            CourseCode::new("CHEM", "110"),
            CourseCode::new("MATH", "101"),
            CourseCode::new("CHEM", "110"),
        ];
        assert_eq!(merge_taken(&mut s, &codes).unwrap(), 2);
        assert_eq!(s.list().unwrap(), vec!["CHEM-110", "MATH-101"]);
        assert!(s.remove("CHEM-110").unwrap());
        assert_eq!(s.list().unwrap(), vec!["MATH-101"]);
    }
}
