use std::path::Path;

use log::debug;
use rusqlite::OptionalExtension;

use super::KeyValueStorage;
use crate::error::StorageError;
use crate::prefs::default_config_dir;

pub const DATABASE_FILE_NAME: &str = "blog_data.db";

pub fn init_db(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS local_storage (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;
    Ok(())
}

/// SQLite file standing in for the browser's `localStorage` outside a browser.
#[derive(Debug)]
pub struct BlogDataConnection {
    connection: rusqlite::Connection,
}

impl BlogDataConnection {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let connection = rusqlite::Connection::open(path)?;
        init_db(&connection)?;
        debug!("Opened blog data at {}", path.display());
        Ok(Self { connection })
    }

    pub fn open_default() -> Result<Self, StorageError> {
        let dir = default_config_dir()
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        Self::open(&dir.join(DATABASE_FILE_NAME))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let connection = rusqlite::Connection::open_in_memory()?;
        init_db(&connection)?;
        Ok(Self { connection })
    }
}

impl KeyValueStorage for BlogDataConnection {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .connection
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                (key,),
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.connection.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.connection
            .execute("DELETE FROM local_storage WHERE key = ?1", (key,))?;
        Ok(())
    }
}
