use super::schema::{ImageListResponse, ImageRecord};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

/// SQLite-backed table of stored images.
#[derive(Clone)]
pub struct ImageIndex {
    conn: Arc<Mutex<Connection>>,
}

impl ImageIndex {
    /// Open (or create) the database at `db_path`. `:memory:` opens a
    /// private in-memory database.
    pub fn open(db_path: &str) -> Result<Self> {
        if db_path == ":memory:" {
            return Self::in_memory();
        }
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open {db_path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             PRAGMA temp_store   = MEMORY;",
        )?;

        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        // AUTOINCREMENT keeps ids monotonic across deletes.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS images (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                filename  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_images_filename ON images(filename);",
        )
        .context("Failed to init image schema")?;
        Ok(())
    }

    /// Insert a new record for `filename` and return it.
    pub fn insert(&self, filename: &str) -> Result<ImageRecord> {
        let conn = self.conn.lock();
        conn.execute("INSERT INTO images (filename) VALUES (?1)", params![filename])
            .context("Failed to insert image record")?;
        Ok(ImageRecord {
            id: conn.last_insert_rowid(),
            filename: filename.to_string(),
        })
    }

    /// Get a record by id.
    pub fn get(&self, id: i64) -> Result<Option<ImageRecord>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, filename FROM images WHERE id = ?1",
            params![id],
            Self::row_to_record,
        )
        .optional()
        .context("Failed to load image record")
    }

    /// List records in insertion order. `limit = None` returns everything
    /// from `offset` on.
    pub fn list(&self, offset: usize, limit: Option<usize>) -> Result<ImageListResponse> {
        let conn = self.conn.lock();

        let total: usize = conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;

        // SQLite treats a negative LIMIT as "no limit".
        let sql_limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
        let sql_offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let mut stmt =
            conn.prepare("SELECT id, filename FROM images ORDER BY id LIMIT ?1 OFFSET ?2")?;
        let images = stmt
            .query_map(params![sql_limit, sql_offset], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list image records")?;

        Ok(ImageListResponse {
            images,
            total,
            offset,
            limit,
        })
    }

    /// Delete a record. Returns whether a row was removed.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let removed = conn
            .execute("DELETE FROM images WHERE id = ?1", params![id])
            .context("Failed to delete image record")?;
        Ok(removed > 0)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ImageRecord> {
        Ok(ImageRecord {
            id: row.get(0)?,
            filename: row.get(1)?,
        })
    }
}
