//! Scanner Capability Seam
//!
//! The barcode image decoder is an external collaborator; this module
//! only defines the contract the app consumes: device enumeration,
//! continuous decoding into a frame channel, and a reset that is safe
//! with no active session. Rear-facing devices are preferred when the
//! label gives them away.

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use tokio::sync::mpsc;

/// Label pattern identifying a rear/environment camera.
fn rear_label_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)back|trás|rear|environment").expect("valid pattern"))
}

#[derive(Debug, Clone)]
pub enum ScanError {
    /// Capability missing entirely (no camera access, decoder not loaded).
    Unavailable(String),
    /// Capability present but the session failed to start.
    Failed(String),
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::Unavailable(msg) => write!(f, "Scanner unavailable: {}", msg),
            ScanError::Failed(msg) => write!(f, "Scanner failed: {}", msg),
        }
    }
}

impl std::error::Error for ScanError {}

/// A candidate video source with its human-readable label.
#[derive(Debug, Clone)]
pub struct VideoDevice {
    pub device_id: String,
    pub label: String,
}

/// Barcode symbologies the decoder should look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeFormat {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Code128,
    Code39,
}

/// Video constraints handed to the decoding capability.
#[derive(Debug, Clone)]
pub struct VideoConstraints {
    /// Exact device when enumeration found a preferred one.
    pub device_id: Option<String>,
    pub facing_mode: String,
    pub ideal_width: u32,
    pub min_width: u32,
    pub ideal_height: u32,
    pub min_height: u32,
    pub formats: Vec<BarcodeFormat>,
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            device_id: None,
            facing_mode: "environment".to_string(),
            ideal_width: 1280,
            min_width: 640,
            ideal_height: 720,
            min_height: 480,
            formats: vec![
                BarcodeFormat::Ean13,
                BarcodeFormat::Ean8,
                BarcodeFormat::UpcA,
                BarcodeFormat::UpcE,
                BarcodeFormat::Code128,
                BarcodeFormat::Code39,
            ],
        }
    }
}

/// One decode callback invocation. `None` text means the frame carried
/// no result (or a decode error); those frames are ignored upstream.
#[derive(Debug, Clone)]
pub struct DecodeFrame {
    pub text: Option<String>,
}

/// Continuous barcode decoding capability.
#[async_trait]
pub trait BarcodeDecoder: Send + Sync {
    async fn list_video_devices(&self) -> Result<Vec<VideoDevice>, ScanError>;

    /// Start a decoding session; frames flow into `frames` until reset.
    async fn start(
        &self,
        constraints: VideoConstraints,
        frames: mpsc::UnboundedSender<DecodeFrame>,
    ) -> Result<(), ScanError>;

    /// Tear the session down and release the device binding.
    /// Must be safe to call when no session is active.
    fn reset(&self);
}

/// Prefer a rear-facing device by label, falling back to the first one.
pub fn pick_preferred_device(devices: &[VideoDevice]) -> Option<&VideoDevice> {
    devices
        .iter()
        .find(|d| rear_label_pattern().is_match(&d.label))
        .or_else(|| devices.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, label: &str) -> VideoDevice {
        VideoDevice {
            device_id: id.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_prefers_rear_labels() {
        let devices = vec![
            device("0", "Front Camera"),
            device("1", "Câmera Traseira (trás)"),
        ];
        assert_eq!(pick_preferred_device(&devices).unwrap().device_id, "1");

        let devices = vec![device("0", "webcam"), device("1", "BACK ultra wide")];
        assert_eq!(pick_preferred_device(&devices).unwrap().device_id, "1");
    }

    #[test]
    fn test_falls_back_to_first_device() {
        let devices = vec![device("a", "Integrated Camera"), device("b", "USB cam")];
        assert_eq!(pick_preferred_device(&devices).unwrap().device_id, "a");
        assert!(pick_preferred_device(&[]).is_none());
    }
}
