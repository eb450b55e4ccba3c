//! Structured backup export
//!
//! The local JSON artifact always succeeds or fails on its own; the
//! remote push is a single best-effort attempt whose outcome only feeds
//! a later notification.

use std::path::{Path, PathBuf};

use crate::domain::{BackupDocument, DomainError, DomainResult, Folder};
use crate::export::csv::sanitize_folder_name;

/// Write `backup_{slug}.json` into `dir`. `Ok(None)` when the document
/// carries no items.
pub fn write_backup_json(
    folder: &Folder,
    doc: &BackupDocument,
    dir: &Path,
) -> DomainResult<Option<PathBuf>> {
    if doc.itens.is_empty() {
        return Ok(None);
    }

    let path = dir.join(format!("backup_{}.json", sanitize_folder_name(&folder.name)));
    let json = serde_json::to_string_pretty(doc)
        .map_err(|e| DomainError::Internal(format!("Failed serializing backup: {}", e)))?;
    std::fs::write(&path, json)
        .map_err(|e| DomainError::Internal(format!("Failed writing {}: {}", path.display(), e)))?;
    Ok(Some(path))
}

/// Single-attempt JSON POST of the backup document. A 2xx status with a
/// parsable or empty JSON body is success; anything else is the error
/// the caller logs and reports as remote-sync failure.
pub async fn push_to_remote(
    client: &reqwest::Client,
    url: &str,
    doc: &BackupDocument,
) -> DomainResult<serde_json::Value> {
    let response = client
        .post(url)
        .json(doc)
        .send()
        .await
        .map_err(|e| DomainError::Internal(format!("Request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DomainError::Internal(format!("HTTP {}", status.as_u16())));
    }

    // an empty or non-JSON 2xx body still counts as success
    Ok(response
        .json::<serde_json::Value>()
        .await
        .unwrap_or_else(|_| serde_json::json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, Provenance};
    use tempfile::tempdir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response on an ephemeral port.
    async fn spawn_http_stub(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                    if request_complete(&buf) {
                        break;
                    }
                }
                let _ = stream.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{}", addr)
    }

    fn request_complete(buf: &[u8]) -> bool {
        let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&buf[..pos]);
        let body_len = head
            .lines()
            .filter_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .next()
            .unwrap_or(0);
        buf.len() >= pos + 4 + body_len
    }

    fn one_item_document() -> BackupDocument {
        let mut folder = Folder::new("Loja".to_string());
        folder.items.push(Item {
            code: "A".to_string(),
            quantity: 2,
        });
        BackupDocument::from_folder(&folder, Provenance::default(), chrono::Local::now())
    }

    #[tokio::test]
    async fn test_push_succeeds_on_2xx_with_json_body() {
        let url = spawn_http_stub(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 11\r\nconnection: close\r\n\r\n{\"ok\":true}",
        )
        .await;
        let client = reqwest::Client::new();

        let body = push_to_remote(&client, &url, &one_item_document())
            .await
            .unwrap();
        assert_eq!(body, serde_json::json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_push_succeeds_on_2xx_with_empty_body() {
        let url = spawn_http_stub(
            "HTTP/1.1 204 No Content\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;
        let client = reqwest::Client::new();

        let body = push_to_remote(&client, &url, &one_item_document())
            .await
            .unwrap();
        assert_eq!(body, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_push_fails_on_error_status() {
        let url = spawn_http_stub(
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;
        let client = reqwest::Client::new();

        let err = push_to_remote(&client, &url, &one_item_document())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 500"), "got {}", err);
    }

    #[tokio::test]
    async fn test_push_fails_when_unreachable() {
        let client = reqwest::Client::new();
        // discard port, nothing listens there
        let result = push_to_remote(&client, "http://127.0.0.1:9", &one_item_document()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_document_creates_no_file() {
        let dir = tempdir().unwrap();
        let folder = Folder::new("vazia".to_string());
        let doc = BackupDocument::from_folder(&folder, Provenance::default(), chrono::Local::now());
        assert!(write_backup_json(&folder, &doc, dir.path()).unwrap().is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_artifact_written_with_wire_fields() {
        let dir = tempdir().unwrap();
        let mut folder = Folder::new("Loja".to_string());
        folder.items.push(Item {
            code: "A".to_string(),
            quantity: 2,
        });
        let doc = BackupDocument::from_folder(&folder, Provenance::default(), chrono::Local::now());

        let path = write_backup_json(&folder, &doc, dir.path()).unwrap().unwrap();
        assert!(path.ends_with("backup_loja.json"));

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed["itens"][0]["codigo"], "A");
        assert_eq!(parsed["itens"][0]["quantidade"], 2);
    }
}
