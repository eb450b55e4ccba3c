//! Application Layer
//!
//! The controller owns all session state (no ambient globals) and
//! bridges abstract UI events to the domain workflow, signalling
//! observers through the [`EventSink`] seam.

mod config;
mod controller;
mod events;

pub use config::{AppConfig, BackupConfig};
pub use controller::AppController;
pub use events::{AppEvent, EventSink, Screen, TOAST_DISMISS_MS};
