//! Layered configuration for Trellis.
//!
//! Values resolve in order: built-in defaults → `trellis.toml` → environment
//! → command-line flags. The resource client and the proxy each have their
//! own backend URL so they can point at different hosts.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! url = "http://localhost:8000/api"
//!
//! [proxy]
//! backend_url = "http://backend.internal:8000/api"
//! port = 3000
//!
//! [session]
//! file = "/home/me/.local/share/trellis/session"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_PROXY_PORT: u16 = 3000;

pub const ENV_API_URL: &str = "TRELLIS_API_URL";
pub const ENV_PROXY_BACKEND_URL: &str = "TRELLIS_PROXY_BACKEND_URL";
pub const ENV_PORT: &str = "TRELLIS_PORT";
pub const ENV_SESSION_FILE: &str = "TRELLIS_SESSION_FILE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxySection {
    pub backend_url: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSection {
    pub file: Option<PathBuf>,
}

/// The complete trellis.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrellisToml {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub proxy: ProxySection,
    #[serde(default)]
    pub session: SessionSection,
}

impl TrellisToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse trellis.toml")
    }

    /// A file with every default spelled out, as written by `trellis config init`.
    pub fn with_defaults() -> Self {
        Self {
            api: ApiSection {
                url: Some(DEFAULT_API_URL.to_string()),
            },
            proxy: ProxySection {
                backend_url: Some(DEFAULT_API_URL.to_string()),
                port: Some(DEFAULT_PROXY_PORT),
            },
            session: SessionSection::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize trellis.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Load from `path`, or return defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Flags given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub proxy_backend_url: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub proxy_backend_url: String,
    pub proxy_port: u16,
    pub session_file: PathBuf,
}

impl Config {
    /// Resolve configuration from the file at `config_path` (or the default
    /// location), the process environment and `overrides`.
    pub fn load(config_path: Option<&Path>, overrides: CliOverrides) -> Result<Self> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };
        let file = TrellisToml::load_or_default(&path)?;
        Self::resolve(file, |key| std::env::var(key).ok(), overrides)
    }

    /// Pure resolution step, separated from the process environment for tests.
    pub fn resolve<F>(file: TrellisToml, env: F, overrides: CliOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = overrides
            .api_url
            .or_else(|| env(ENV_API_URL))
            .or(file.api.url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let proxy_backend_url = overrides
            .proxy_backend_url
            .or_else(|| env(ENV_PROXY_BACKEND_URL))
            .or(file.proxy.backend_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let env_port = match env(ENV_PORT) {
            Some(raw) => Some(
                raw.parse::<u16>()
                    .with_context(|| format!("{} is not a valid port: {}", ENV_PORT, raw))?,
            ),
            None => None,
        };
        let proxy_port = overrides
            .port
            .or(env_port)
            .or(file.proxy.port)
            .unwrap_or(DEFAULT_PROXY_PORT);

        let session_file = env(ENV_SESSION_FILE)
            .map(PathBuf::from)
            .or(file.session.file)
            .unwrap_or_else(default_session_path);

        Ok(Self {
            api_url,
            proxy_backend_url,
            proxy_port,
            session_file,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trellis")
        .join("trellis.toml")
}

pub fn default_session_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trellis")
        .join("session")
}
