//! Structured backup document
//!
//! Provenance-annotated point-in-time export of one folder, in the
//! exact wire shape the remote backup store expects
//! (`origem`/`destino`/`responsavel`/`data`/`itens`).

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::folder::Folder;

/// One exported item, with the wire field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupItem {
    pub codigo: String,
    pub quantidade: u32,
}

/// Optional provenance fields collected at export time.
/// Fields left empty stay empty strings on the wire.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    pub origem: String,
    pub destino: String,
    pub responsavel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupDocument {
    pub origem: String,
    pub destino: String,
    pub responsavel: String,
    /// Local timestamp formatted `dd/mm/yyyy - HH:MM`
    pub data: String,
    pub itens: Vec<BackupItem>,
}

impl BackupDocument {
    pub fn from_folder(folder: &Folder, provenance: Provenance, now: DateTime<Local>) -> Self {
        Self {
            origem: provenance.origem,
            destino: provenance.destino,
            responsavel: provenance.responsavel,
            data: now.format("%d/%m/%Y - %H:%M").to_string(),
            itens: folder
                .items
                .iter()
                .map(|item| BackupItem {
                    codigo: item.code.clone(),
                    quantidade: item.quantity,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::folder::Item;
    use chrono::TimeZone;

    fn folder_with_items() -> Folder {
        let mut folder = Folder::new("Deposito".to_string());
        folder.items.push(Item {
            code: "A".to_string(),
            quantity: 2,
        });
        folder.items.push(Item {
            code: "B".to_string(),
            quantity: 1,
        });
        folder
    }

    #[test]
    fn test_wire_field_names() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let doc = BackupDocument::from_folder(
            &folder_with_items(),
            Provenance {
                origem: "Loja".to_string(),
                ..Provenance::default()
            },
            now,
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["origem"], "Loja");
        assert_eq!(json["destino"], "");
        assert_eq!(json["responsavel"], "");
        assert_eq!(json["data"], "09/03/2024 - 14:05");
        assert_eq!(json["itens"][0]["codigo"], "A");
        assert_eq!(json["itens"][0]["quantidade"], 2);
        assert_eq!(json["itens"][1]["codigo"], "B");
    }

    #[test]
    fn test_item_order_preserved() {
        let now = Local::now();
        let doc = BackupDocument::from_folder(&folder_with_items(), Provenance::default(), now);
        let codes: Vec<&str> = doc.itens.iter().map(|i| i.codigo.as_str()).collect();
        assert_eq!(codes, vec!["A", "B"]);
    }
}
