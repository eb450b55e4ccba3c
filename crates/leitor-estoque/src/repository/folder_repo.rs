//! Folder Repository
//!
//! Owns the folder collection. Every mutation rewrites the whole
//! collection under [`STORAGE_KEY`] (write-through, no batching); a
//! failed write is logged and the session continues on the in-memory
//! state. Load-on-init treats missing or corrupt data as empty state.

use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{Folder, Item, StoredState, STORAGE_KEY};

pub struct FolderRepository {
    folders: Mutex<Vec<Folder>>,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl FolderRepository {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>) -> Self {
        Self {
            folders: Mutex::new(Vec::new()),
            conn,
        }
    }

    /// Read the persisted collection. Absent or malformed data leaves
    /// the repository empty; this is never a hard failure.
    pub async fn load(&self) {
        let raw: Option<String> = {
            let guard = self.conn.lock().await;
            let Some(conn) = guard.as_ref() else {
                log::warn!("load: database not initialized, starting empty");
                return;
            };
            match conn
                .query_row(
                    "SELECT value FROM app_state WHERE key = ?1",
                    params![STORAGE_KEY],
                    |row| row.get(0),
                )
                .optional()
            {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("load: failed reading stored state: {}", e);
                    None
                }
            }
        };

        let Some(raw) = raw else { return };
        match serde_json::from_str::<StoredState>(&raw) {
            Ok(stored) => {
                *self.folders.lock().await = stored.folders;
            }
            Err(e) => {
                log::warn!("load: corrupt stored state ignored: {}", e);
            }
        }
    }

    /// Serialize the whole collection under the fixed key. Failures are
    /// logged, never surfaced; the in-memory state stays authoritative
    /// for the rest of the session.
    async fn persist(&self, folders: &[Folder]) {
        let stored = StoredState {
            folders: folders.to_vec(),
        };
        let json = match serde_json::to_string(&stored) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("persist: serialization failed: {}", e);
                return;
            }
        };

        let guard = self.conn.lock().await;
        let Some(conn) = guard.as_ref() else {
            log::warn!("persist: database not initialized");
            return;
        };
        if let Err(e) = conn.execute(
            "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
            params![STORAGE_KEY, json],
        ) {
            log::warn!("persist: write failed: {}", e);
        }
    }

    /// Create a folder. `None` when the trimmed name is empty.
    pub async fn create_folder(&self, name: &str) -> Option<Folder> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }

        let folder = Folder::new(trimmed.to_string());
        let mut folders = self.folders.lock().await;
        folders.push(folder.clone());
        self.persist(&folders).await;
        Some(folder)
    }

    pub async fn get_folder(&self, id: &str) -> Option<Folder> {
        self.folders
            .lock()
            .await
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }

    /// All folders in stable insertion order.
    pub async fn list_folders(&self) -> Vec<Folder> {
        self.folders.lock().await.clone()
    }

    /// Upsert-by-code, the only item mutation path. Trims the code and
    /// no-ops on empty code or unknown folder. A missing item starts at
    /// quantity 0 before `update` runs; the result is clamped to >= 1.
    /// Returns the written item so callers can signal observers.
    pub async fn upsert_item<F>(&self, folder_id: &str, code: &str, update: F) -> Option<Item>
    where
        F: FnOnce(u32) -> i64 + Send,
    {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut folders = self.folders.lock().await;
        let folder = folders.iter_mut().find(|f| f.id == folder_id)?;

        if folder.find_item(trimmed).is_none() {
            folder.items.push(Item {
                code: trimmed.to_string(),
                quantity: 0,
            });
        }
        let item = folder.find_item_mut(trimmed)?;
        let new_quantity = update(item.quantity).clamp(1, u32::MAX as i64) as u32;
        item.quantity = new_quantity;
        let written = item.clone();

        self.persist(&folders).await;
        Some(written)
    }
}
