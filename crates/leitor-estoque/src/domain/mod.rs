//! Domain Layer
//!
//! Contains all domain entities and the scan workflow rules.
//! This layer has NO external dependencies (except serde/chrono for
//! serialization and timestamps) and knows nothing about the UI.

mod error;
mod folder;
pub mod backup;
pub mod reconcile;
pub mod scan;

pub use backup::{BackupDocument, BackupItem, Provenance};
pub use error::{DomainError, DomainResult};
pub use folder::{format_date_short, Folder, Item, StoredState, STORAGE_KEY};
pub use reconcile::{LedgerUpdate, QuantityReconciler, ScanOutcome};
pub use scan::{ScanDebouncer, SCAN_DEBOUNCE_MS};
