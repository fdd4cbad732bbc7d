use std::path::Path;

use rusqlite::Connection;

/// Opens the database file, creating parent directories as needed.
pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "could not create database directory");
            }
        }
    }
    let conn = Connection::open(path)?;
    initialize(&conn)?;
    Ok(conn)
}

pub fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    // In-memory databases reject WAL; that's fine.
    conn.execute_batch("PRAGMA journal_mode=WAL;").ok();

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author_first_name TEXT NOT NULL,
            author_last_name TEXT NOT NULL,
            content TEXT NOT NULL,
            created TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created);
        ",
    )
}
