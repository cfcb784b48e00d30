use anyhow::{anyhow, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct PhotogramConfig {
    pub api_port: u16,
    pub paths: PhotogramPaths,
    pub auth: AuthConfig,
    pub file: FileConfig,
}

impl PhotogramConfig {
    pub fn from_env() -> Result<Self> {
        let paths = PhotogramPaths::discover()?;
        let api_port = env::var("PHOTOGRAM_API_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(3000);
        let auth = AuthConfig::from_env();
        let file = FileConfig::from_env();
        Ok(Self {
            api_port,
            paths,
            auth,
            file,
        })
    }

    pub fn new(api_port: u16, paths: PhotogramPaths, auth: AuthConfig, file: FileConfig) -> Self {
        Self {
            api_port,
            paths,
            auth,
            file,
        }
    }
}

/// HMAC signing secret for session tokens. Injected into the token service
/// at construction rather than read as ambient state.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token_secret: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let token_secret = env::var("PHOTOGRAM_TOKEN_SECRET")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or_else(|| "photogram-dev-secret".into());
        Self { token_secret }
    }
}

#[derive(Debug, Clone)]
pub struct FileConfig {
    pub max_upload_bytes: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl FileConfig {
    pub fn from_env() -> Self {
        let max_upload_bytes = env::var("PHOTOGRAM_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        Self { max_upload_bytes }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PhotogramPaths {
    pub base: PathBuf,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub uploads_dir: PathBuf,
}

impl PhotogramPaths {
    pub fn discover() -> Result<Self> {
        let exe_path = std::env::current_exe()
            .map_err(|err| anyhow!("failed to resolve current executable: {err}"))?;
        let base = exe_path
            .parent()
            .ok_or_else(|| anyhow!("executable path missing parent"))?
            .to_path_buf();
        Self::from_base_dir(base)
    }

    pub fn from_base_dir<P: AsRef<Path>>(base: P) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        let data_dir = base.join("data");
        let db_path = data_dir.join("photogram.db");
        let uploads_dir = base.join("uploads");

        Ok(Self {
            base,
            data_dir,
            db_path,
            uploads_dir,
        })
    }
}
