//! Export Layer
//!
//! Read-only exports of a folder's ledger: the flat CSV table and the
//! structured backup document (local JSON artifact + best-effort remote
//! push).

mod backup;
mod csv;

pub use backup::{push_to_remote, write_backup_json};
pub use csv::{render_csv, sanitize_folder_name, write_csv};
