//! Repository Layer
//!
//! Durable storage for the folder ledger. The whole collection is one
//! serialized record under a fixed key, written through on every
//! mutation; the in-memory copy keeps serving if a write fails.

mod db;
mod folder_repo;


pub use db::{init_db, DbState};
pub use folder_repo::FolderRepository;
