//! Session cookie persistence between CLI invocations.
//!
//! The backend authenticates with a cookie. A browser keeps it for us; a CLI
//! process does not, so the `Cookie` header is written to a small file after
//! login and read back when the next command builds its [`ApiClient`].

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::api::ApiClient;

#[derive(Debug, Clone)]
pub struct CookieFile {
    path: PathBuf,
}

impl CookieFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved `Cookie` header, or `None` when nothing was saved.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        let trimmed = content.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    /// Persist whatever cookies the client currently holds for the API origin.
    pub fn save_from(&self, client: &ApiClient) -> Result<()> {
        match client.cookie_header() {
            Some(header) => {
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create session directory: {}", parent.display())
                    })?;
                }
                write_private(&self.path, &header).with_context(|| {
                    format!("Failed to write session file: {}", self.path.display())
                })?;
                tracing::debug!(path = %self.path.display(), "saved session cookie");
                Ok(())
            }
            None => self.clear(),
        }
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove session file: {}", self.path.display())
            })?;
        }
        Ok(())
    }

    /// Build a client for `base_url` seeded with the saved cookie.
    pub fn client(&self, base_url: &str) -> Result<ApiClient> {
        let saved = self.load()?;
        ApiClient::with_cookies(base_url, saved.as_deref())
    }
}

/// Write `contents` readable and writable by the owner only. A file that
/// already exists with wider permissions is narrowed too.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}
