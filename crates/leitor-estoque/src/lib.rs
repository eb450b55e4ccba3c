//! Leitor de Estoque
//!
//! Client-side inventory counting: folders of (barcode, quantity)
//! items, a debounced scan-to-quantity reconciliation workflow, and
//! CSV / remote-backup exports.
//!
//! Layered architecture:
//! - domain: entities and the scan workflow state machines
//! - repository: write-through persistence of the folder ledger
//! - scanner: the decoding capability seam
//! - export: tabular and structured backup exports
//! - app: the controller and its UI event dispatch

pub mod app;
pub mod domain;
pub mod export;
pub mod repository;
pub mod scanner;

pub use app::{AppConfig, AppController, AppEvent, BackupConfig, EventSink, Screen};
pub use domain::{
    format_date_short, BackupDocument, BackupItem, DomainError, DomainResult, Folder, Item,
    Provenance,
};
pub use repository::{init_db, DbState, FolderRepository};
pub use scanner::{BarcodeDecoder, DecodeFrame, ScanError, VideoConstraints, VideoDevice};
