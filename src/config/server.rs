use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::payload::{CompressionPolicy, DEFAULT_COMPRESSION_THRESHOLD};

const MIB: usize = 1024 * 1024;

pub const CONFIG_FILE_NAME: &str = "exambuddy.toml";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Uploads larger than this are zlib-compressed before encoding.
    pub compression_threshold_bytes: usize,
    /// Request body limit for multipart uploads.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("exambuddy.db")
    }

    #[must_use]
    pub fn compression_policy(&self) -> CompressionPolicy {
        CompressionPolicy::new(self.compression_threshold_bytes)
    }

    #[must_use]
    pub fn password_path(&self) -> PathBuf {
        self.data_dir.join(".admin_password")
    }

    /// Overlays values from a parsed config file.
    pub fn apply(&mut self, file: &FileConfig) {
        if let Some(host) = &file.host {
            self.host.clone_from(host);
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(mb) = file.compression_threshold_mb {
            self.compression_threshold_bytes = mb.saturating_mul(MIB);
        }
        if let Some(mb) = file.max_upload_mb {
            self.max_upload_bytes = mb.saturating_mul(MIB);
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            compression_threshold_bytes: DEFAULT_COMPRESSION_THRESHOLD,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Optional `exambuddy.toml` in the data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub compression_threshold_mb: Option<usize>,
    pub max_upload_mb: Option<usize>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reads `<data_dir>/exambuddy.toml`, returning defaults when it is absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
        assert_eq!(config.compression_threshold_bytes, 5 * MIB);
        assert_eq!(config.db_path(), PathBuf::from("./data/exambuddy.db"));
    }

    #[test]
    fn test_file_overrides() {
        let file = FileConfig::parse(
            r#"
            host = "0.0.0.0"
            port = 9000
            compression_threshold_mb = 2
            "#,
        )
        .unwrap();

        let mut config = ServerConfig::default();
        config.apply(&file);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.compression_threshold_bytes, 2 * MIB);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            FileConfig::parse("colour = \"blue\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(FileConfig::load(dir.path()).unwrap(), FileConfig::default());

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "port = 7000\n").unwrap();
        assert_eq!(FileConfig::load(dir.path()).unwrap().port, Some(7000));
    }
}
