use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub board: BoardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Which persistence backend serves the update store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Database,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_updates_file")]
    pub updates_file: String,
    #[serde(default = "default_backup_file")]
    pub backup_file: String,
    /// When true, a malformed updates file is logged and reset to empty
    /// instead of failing startup. Off by default: corruption is surfaced.
    #[serde(default)]
    pub recover_corrupt: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            updates_file: default_updates_file(),
            backup_file: default_backup_file(),
            recover_corrupt: false,
        }
    }
}

fn default_updates_file() -> String { "data/updates.json".to_string() }
fn default_backup_file() -> String { "data/updates_backup.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Display names allowed to post. A deployment-time constant: edited in
    /// config, never mutated at runtime.
    #[serde(default = "default_authorized_posters")]
    pub authorized_posters: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self { app_name: default_app_name(), authorized_posters: default_authorized_posters() }
    }
}

fn default_app_name() -> String { "LoopIn".to_string() }

fn default_authorized_posters() -> Vec<String> {
    vec![
        "Kamran Arbaz".to_string(),
        "Drishya CM".to_string(),
        "Abigail Das".to_string(),
    ]
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        self.board.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    /// Fill file paths from env vars when the TOML left them blank.
    pub fn normalize_from_env(&mut self) {
        if let Ok(backend) = std::env::var("STORAGE_BACKEND") {
            match backend.to_ascii_lowercase().as_str() {
                "file" => self.backend = StorageBackend::File,
                "database" => self.backend = StorageBackend::Database,
                _ => {}
            }
        }
        if self.updates_file.trim().is_empty() {
            if let Ok(p) = std::env::var("UPDATES_FILE") {
                self.updates_file = p;
            }
        }
        if self.backup_file.trim().is_empty() {
            if let Ok(p) = std::env::var("BACKUP_FILE") {
                self.backup_file = p;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::File && self.updates_file.trim().is_empty() {
            return Err(anyhow!("storage.updates_file is empty; provide it in config.toml or UPDATES_FILE"));
        }
        Ok(())
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(anyhow!("board.app_name must not be empty"));
        }
        if self.authorized_posters.iter().any(|n| n.trim().is_empty()) {
            return Err(anyhow!("board.authorized_posters must not contain blank names"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().expect("defaults validate");
        assert_eq!(cfg.storage.backend, StorageBackend::File);
        assert_eq!(cfg.board.authorized_posters.len(), 3);
        assert_eq!(cfg.board.app_name, "LoopIn");
    }

    #[test]
    fn parses_full_toml() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [storage]
            backend = "database"
            updates_file = "var/updates.json"
            backup_file = "var/updates_backup.json"
            recover_corrupt = true

            [board]
            app_name = "LoopIn"
            authorized_posters = ["Kamran Arbaz"]
        "#;
        let mut cfg: AppConfig = toml::from_str(toml).expect("parse");
        cfg.normalize_and_validate().expect("validate");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.storage.backend, StorageBackend::Database);
        assert!(cfg.storage.recover_corrupt);
        assert_eq!(cfg.board.authorized_posters, vec!["Kamran Arbaz".to_string()]);
    }

    #[test]
    fn rejects_blank_poster_names() {
        let mut cfg = AppConfig::default();
        cfg.board.authorized_posters.push("  ".into());
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_port_zero() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }
}
