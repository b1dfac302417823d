use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Writes output files below a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Staged write: the target only appears once fully written.
        let staging = full_path.with_extension("xml.part");
        let staged = match tokio::fs::write(&staging, data).await {
            Ok(()) => tokio::fs::rename(&staging, &full_path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = staged {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                tracing::debug!("Could not remove {}: {}", staging.display(), cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }
}
