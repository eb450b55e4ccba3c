//! Application events
//!
//! Everything the UI needs to react to flows through these events; the
//! workflow never touches a widget directly.

/// How long the UI should keep a transient toast visible.
pub const TOAST_DISMISS_MS: u64 = 2200;

/// The three screens of the counting workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Folders,
    FolderDetail,
    Scanner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A folder's items changed; lists showing it should refresh.
    LedgerChanged { folder_id: String },
    /// Transient auto-dismissing notice.
    Toast { message: String },
    /// Open the quantity popup for `code` with a cleared input.
    ShowQuantityPopup { code: String },
    HideQuantityPopup,
    /// Persistent status line in the scanning view.
    ScannerStatus { message: String },
    ScreenChanged { screen: Screen },
}

/// Observer seam for UI collaborators.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: AppEvent);
}
