//! Application configuration

use std::path::PathBuf;

/// Remote backup store coordinates.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    pub api_base: String,
    /// Organization key the backups are stored under.
    pub org_key: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            api_base: "https://enfoque-papelaria.onrender.com".to_string(),
            org_key: "enfoque".to_string(),
        }
    }
}

impl BackupConfig {
    /// Endpoint the mobile counter pushes its backups to.
    pub fn mobile_backup_url(&self) -> String {
        format!(
            "{}/api/backup/from-mobile/{}",
            self.api_base.trim_end_matches('/'),
            self.org_key
        )
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backup: BackupConfig,
    /// Where export artifacts (CSV / backup JSON) land.
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backup: BackupConfig::default(),
            export_dir: std::env::temp_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_backup_url_trims_trailing_slashes() {
        let config = BackupConfig {
            api_base: "https://example.com///".to_string(),
            org_key: "acme".to_string(),
        };
        assert_eq!(
            config.mobile_backup_url(),
            "https://example.com/api/backup/from-mobile/acme"
        );
    }
}
