//! Folder and Item entities
//!
//! A Folder is one inventory counting session: a named, ordered list of
//! (code, quantity) items. Codes are unique within a folder and the only
//! mutation path is upsert-by-code, so the repository can keep that
//! invariant in one place.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed key the whole folder collection is persisted under.
pub const STORAGE_KEY: &str = "leitorEstoqueData_v4";

/// A counted barcode within a folder. Quantity is always >= 1 once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub code: String,
    pub quantity: u32,
}

/// A named grouping of scanned inventory items
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    pub items: Vec<Item>,
}

impl Folder {
    /// Create an empty folder with a fresh session-unique id.
    /// The caller is responsible for rejecting empty names.
    pub fn new(name: String) -> Self {
        Self {
            id: new_folder_id(),
            name,
            created_at: Utc::now().to_rfc3339(),
            items: Vec::new(),
        }
    }

    pub fn find_item(&self, code: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.code == code)
    }

    pub fn find_item_mut(&mut self, code: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.code == code)
    }
}

/// The single persisted record: the entire folder collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredState {
    pub folders: Vec<Folder>,
}

/// Timestamp plus random suffix; collision odds are negligible even
/// across process sessions.
fn new_folder_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("fld_{}_{}", Utc::now().timestamp_millis(), &suffix[..12])
}

/// Short local-time rendering of a stored RFC 3339 timestamp, for
/// folder-list display. Unparsable input renders as an empty string.
pub fn format_date_short(iso: &str) -> String {
    DateTime::parse_from_rfc3339(iso)
        .map(|d| d.with_timezone(&Local).format("%d/%m/%y %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_ids_are_unique() {
        let a = Folder::new("a".to_string());
        let b = Folder::new("a".to_string());
        assert!(a.id.starts_with("fld_"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_stored_state_round_trip() {
        let mut folder = Folder::new("Loja".to_string());
        folder.items.push(Item {
            code: "789".to_string(),
            quantity: 3,
        });
        let json = serde_json::to_string(&StoredState {
            folders: vec![folder],
        })
        .unwrap();
        assert!(json.contains("\"createdAt\""));
        let parsed: StoredState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.folders.len(), 1);
        assert_eq!(parsed.folders[0].items[0].quantity, 3);
    }

    #[test]
    fn test_format_date_short_bad_input() {
        assert_eq!(format_date_short("not a date"), "");
    }
}
