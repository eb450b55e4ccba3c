//! Application Controller
//!
//! Glues the capability stream, the scan workflow and the ledger
//! together. All mutation happens in response to discrete events; the
//! only background activity is the decode frame drain task and the
//! detached backup upload, both gated so they can never act on a stale
//! session.

use chrono::{Local, Utc};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use crate::domain::{
    BackupDocument, DomainResult, Folder, LedgerUpdate, Provenance, QuantityReconciler,
    ScanDebouncer,
};
use crate::export;
use crate::repository::FolderRepository;
use crate::scanner::{
    pick_preferred_device, BarcodeDecoder, DecodeFrame, ScanError, VideoConstraints,
};

use super::config::AppConfig;
use super::events::{AppEvent, EventSink, Screen};

/// Ephemeral per-session state; never persisted.
struct SessionState {
    current_folder_id: Option<String>,
    screen: Screen,
    debouncer: ScanDebouncer,
    reconciler: QuantityReconciler,
    /// Mirror of the quantity popup's input field.
    quantity_input: String,
}

#[derive(Clone)]
pub struct AppController {
    repo: Arc<FolderRepository>,
    decoder: Arc<dyn BarcodeDecoder>,
    events: Arc<dyn EventSink>,
    http: reqwest::Client,
    config: Arc<AppConfig>,
    session: Arc<Mutex<SessionState>>,
    scanning: Arc<AtomicBool>,
    /// Bumped on every start/stop; frames carrying an older value are dropped.
    generation: Arc<AtomicU64>,
}

impl AppController {
    pub fn new(
        repo: Arc<FolderRepository>,
        decoder: Arc<dyn BarcodeDecoder>,
        events: Arc<dyn EventSink>,
        config: AppConfig,
    ) -> Self {
        Self {
            repo,
            decoder,
            events,
            http: reqwest::Client::new(),
            config: Arc::new(config),
            session: Arc::new(Mutex::new(SessionState {
                current_folder_id: None,
                screen: Screen::Folders,
                debouncer: ScanDebouncer::new(),
                reconciler: QuantityReconciler::new(),
                quantity_input: String::new(),
            })),
            scanning: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    // ------------------------------------------------------------------
    // Folders & navigation
    // ------------------------------------------------------------------

    /// `None` when the trimmed name is empty (silent user-input noise).
    pub async fn create_folder(&self, name: &str) -> Option<Folder> {
        let folder = self.repo.create_folder(name).await?;
        self.events.emit(AppEvent::LedgerChanged {
            folder_id: folder.id.clone(),
        });
        Some(folder)
    }

    pub async fn list_folders(&self) -> Vec<Folder> {
        self.repo.list_folders().await
    }

    /// Select a folder and move to its detail screen.
    pub async fn open_folder(&self, id: &str) -> bool {
        if self.repo.get_folder(id).await.is_none() {
            return false;
        }
        self.session.lock().await.current_folder_id = Some(id.to_string());
        self.set_screen(Screen::FolderDetail).await;
        true
    }

    pub async fn current_folder(&self) -> Option<Folder> {
        let id = self.session.lock().await.current_folder_id.clone()?;
        self.repo.get_folder(&id).await
    }

    /// Navigation drives the capability lifecycle: entering the scanner
    /// screen starts a session, leaving it tears the session down.
    pub async fn set_screen(&self, screen: Screen) {
        self.session.lock().await.screen = screen;
        self.events.emit(AppEvent::ScreenChanged { screen });
        if screen == Screen::Scanner {
            self.start_scanning().await;
        } else {
            self.stop_scanning().await;
        }
    }

    pub async fn screen(&self) -> Screen {
        self.session.lock().await.screen
    }

    // ------------------------------------------------------------------
    // Scanning session
    // ------------------------------------------------------------------

    /// Idempotent session start: a second call while active is a no-op.
    pub async fn start_scanning(&self) {
        if self.scanning.swap(true, Ordering::SeqCst) {
            return;
        }

        let folder_selected = {
            let session = self.session.lock().await;
            match &session.current_folder_id {
                Some(id) => self.repo.get_folder(id).await.is_some(),
                None => false,
            }
        };
        if !folder_selected {
            self.scanning.store(false, Ordering::SeqCst);
            self.events.emit(AppEvent::ScannerStatus {
                message: "Selecione uma pasta antes de ler.".to_string(),
            });
            return;
        }

        {
            let mut session = self.session.lock().await;
            session.debouncer.rearm();
            session.reconciler.reset();
            session.quantity_input.clear();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let devices = match self.decoder.list_video_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                self.fail_start(e);
                return;
            }
        };
        let constraints = VideoConstraints {
            device_id: pick_preferred_device(&devices).map(|d| d.device_id.clone()),
            ..VideoConstraints::default()
        };

        let (tx, mut rx) = mpsc::unbounded_channel();
        if let Err(e) = self.decoder.start(constraints, tx).await {
            self.fail_start(e);
            return;
        }

        let controller = self.clone();
        tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                controller.handle_decode(generation, frame).await;
            }
        });
    }

    fn fail_start(&self, e: ScanError) {
        self.scanning.store(false, Ordering::SeqCst);
        let message = match e {
            ScanError::Unavailable(message) => message,
            ScanError::Failed(detail) => {
                log::error!("scanner start failed: {}", detail);
                "Erro ao iniciar a câmera ou leitor.".to_string()
            }
        };
        self.events.emit(AppEvent::ScannerStatus { message });
    }

    /// Synchronous teardown, safe to call when nothing is active.
    /// Bumping the generation guarantees in-flight frames are dropped.
    pub async fn stop_scanning(&self) {
        self.scanning.store(false, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.decoder.reset();
        {
            let mut session = self.session.lock().await;
            session.reconciler.reset();
            session.quantity_input.clear();
        }
        self.events.emit(AppEvent::HideQuantityPopup);
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::SeqCst)
    }

    /// One decode callback invocation from the capability.
    pub async fn handle_decode(&self, generation: u64, frame: DecodeFrame) {
        let now_ms = Utc::now().timestamp_millis().max(0) as u64;
        self.handle_decode_at(generation, frame, now_ms).await;
    }

    async fn handle_decode_at(&self, generation: u64, frame: DecodeFrame, now_ms: u64) {
        if !self.scanning.load(Ordering::SeqCst)
            || generation != self.generation.load(Ordering::SeqCst)
        {
            return;
        }
        let Some(text) = frame.text else { return };
        let code = text.trim();
        if code.is_empty() {
            return;
        }

        let (folder_id, outcome) = {
            let mut guard = self.session.lock().await;
            let session = &mut *guard;
            if !session.debouncer.accept(code, now_ms) {
                return;
            }
            let Some(folder_id) = session.current_folder_id.clone() else {
                return;
            };
            let outcome = session.reconciler.on_scan(code, &session.quantity_input);
            session.quantity_input.clear();
            (folder_id, outcome)
        };

        for update in outcome.updates {
            self.apply_update(&folder_id, update).await;
        }
        self.events.emit(AppEvent::ShowQuantityPopup {
            code: outcome.popup_code,
        });
    }

    async fn apply_update(&self, folder_id: &str, update: LedgerUpdate) {
        let written = match update {
            LedgerUpdate::Increment { code } => {
                self.repo
                    .upsert_item(folder_id, &code, |current| current as i64 + 1)
                    .await
            }
            LedgerUpdate::Override { code, quantity } => {
                self.repo
                    .upsert_item(folder_id, &code, move |_| quantity as i64)
                    .await
            }
        };
        if written.is_some() {
            self.events.emit(AppEvent::LedgerChanged {
                folder_id: folder_id.to_string(),
            });
        }
    }

    // ------------------------------------------------------------------
    // Quantity popup
    // ------------------------------------------------------------------

    /// UI mirrors every keystroke of the popup input here.
    pub async fn set_quantity_input(&self, value: &str) {
        self.session.lock().await.quantity_input = value.to_string();
    }

    /// Confirm the popup; a valid typed value overwrites the pending
    /// code's quantity, anything else leaves the implicit +1.
    pub async fn confirm_quantity(&self) {
        let (folder_id, update) = {
            let mut guard = self.session.lock().await;
            let session = &mut *guard;
            let update = session.reconciler.confirm(&session.quantity_input);
            session.quantity_input.clear();
            (session.current_folder_id.clone(), update)
        };
        self.events.emit(AppEvent::HideQuantityPopup);
        if let (Some(folder_id), Some(update)) = (folder_id, update) {
            self.apply_update(&folder_id, update).await;
        }
    }

    /// Dismiss the popup without overriding.
    pub async fn skip_quantity(&self) {
        {
            let mut session = self.session.lock().await;
            session.reconciler.skip();
            session.quantity_input.clear();
        }
        self.events.emit(AppEvent::HideQuantityPopup);
    }

    /// Manual quantity edit from the folder detail list; clamps like
    /// every other write.
    pub async fn set_item_quantity(&self, folder_id: &str, code: &str, value: i64) {
        if self
            .repo
            .upsert_item(folder_id, code, move |_| value)
            .await
            .is_some()
        {
            self.events.emit(AppEvent::LedgerChanged {
                folder_id: folder_id.to_string(),
            });
        }
    }

    // ------------------------------------------------------------------
    // Exports
    // ------------------------------------------------------------------

    /// CSV artifact for the current folder; `Ok(None)` plus a notice
    /// when there is nothing to export.
    pub async fn export_csv(&self) -> DomainResult<Option<PathBuf>> {
        let Some(folder) = self.current_folder().await else {
            return Ok(None);
        };
        match export::write_csv(&folder, &self.config.export_dir)? {
            None => {
                self.toast("Nenhum item para exportar.");
                Ok(None)
            }
            Some(path) => {
                self.toast("CSV exportado.");
                Ok(Some(path))
            }
        }
    }

    /// Structured backup: local JSON artifact first (always wins), then
    /// a detached single-attempt push to the remote store. Settlement of
    /// the push only produces a toast, never affects the artifact.
    pub async fn export_backup(&self, provenance: Provenance) -> DomainResult<Option<PathBuf>> {
        let Some(folder) = self.current_folder().await else {
            return Ok(None);
        };
        let doc = BackupDocument::from_folder(&folder, provenance, Local::now());
        let Some(path) = export::write_backup_json(&folder, &doc, &self.config.export_dir)? else {
            self.toast("Nenhum item para exportar.");
            return Ok(None);
        };

        let client = self.http.clone();
        let url = self.config.backup.mobile_backup_url();
        let events = Arc::clone(&self.events);
        tokio::spawn(async move {
            match export::push_to_remote(&client, &url, &doc).await {
                Ok(_) => events.emit(AppEvent::Toast {
                    message: "Backup enviado para a API com sucesso.".to_string(),
                }),
                Err(e) => {
                    log::error!("erro ao enviar backup para a API ({}): {}", url, e);
                    events.emit(AppEvent::Toast {
                        message: "Backup salvo (arquivo). Erro ao enviar para API.".to_string(),
                    });
                }
            }
        });

        Ok(Some(path))
    }

    fn toast(&self, message: &str) {
        self.events.emit(AppEvent::Toast {
            message: message.to_string(),
        });
    }
}
