//! Per-request scratch storage for decoded images.
//!
//! Every request gets its own directory under the scratch root; the image is
//! written there under a uuid name. Dropping the [`ScratchImage`] removes the
//! directory, so early returns clean up as well.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    /// Create the scratch root if it does not exist yet.
    pub async fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` to a fresh scratch file with the given extension.
    pub async fn persist(&self, bytes: &[u8], extension: &str) -> io::Result<ScratchImage> {
        let root = self.root.clone();
        let dir = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new().prefix("request-").tempdir_in(root)
        })
        .await
        .map_err(io::Error::other)??;
        let path = dir
            .path()
            .join(format!("image-{}.{}", Uuid::new_v4(), extension));

        // On failure `dir` drops here and takes the partial file with it.
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Wrote scratch image");

        Ok(ScratchImage { dir, path })
    }
}

/// A decoded image on disk, owned by exactly one request.
#[derive(Debug)]
pub struct ScratchImage {
    dir: TempDir,
    path: PathBuf,
}

impl ScratchImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the image now, off the async workers. Failures are logged and
    /// otherwise ignored.
    pub async fn discard(self) {
        let dir = self.dir.path().to_path_buf();
        let removed = tokio::task::spawn_blocking(move || self.dir.close())
            .await
            .map_err(io::Error::other)
            .and_then(|result| result);

        if let Err(e) = removed {
            tracing::warn!(path = %dir.display(), "Failed to remove scratch directory: {}", e);
        }
    }
}
