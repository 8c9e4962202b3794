use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::utils::fs::find_files;

/// A file discovered by a [`FileLister`].
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// The name without the file path.
    pub file_name: String,
    /// The full path including the file name.
    pub file_path: PathBuf,
    /// Size in bytes at listing time.
    pub len: u64,
}

/// Capability seam for recursive directory listing.
///
/// The loader only ever talks to this trait; tests substitute an
/// implementation returning a canned listing.
#[async_trait]
pub trait FileLister: Send + Sync {
    /// List all files under `dir`, recursing into subdirectories.
    ///
    /// A missing or unreadable `dir` is an error. `filter` limits the
    /// results to paths the predicate accepts.
    async fn list(
        &self,
        dir: &Path,
        filter: Option<&(dyn for<'a> Fn(&'a Path) -> bool + Sync)>,
    ) -> io::Result<Vec<FileEntry>>;
}

/// Default lister backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecursiveFileLister;

#[async_trait]
impl FileLister for RecursiveFileLister {
    async fn list(
        &self,
        dir: &Path,
        filter: Option<&(dyn for<'a> Fn(&'a Path) -> bool + Sync)>,
    ) -> io::Result<Vec<FileEntry>> {
        let root = dir.to_path_buf();
        let paths = tokio::task::spawn_blocking(move || find_files(&root, &|_: &Path| true))
            .await
            .map_err(io::Error::other)??;

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            if let Some(accept) = filter {
                if !accept(&path) {
                    continue;
                }
            }
            let metadata = tokio::fs::metadata(&path).await?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            entries.push(FileEntry {
                file_name,
                file_path: path,
                len: metadata.len(),
            });
        }
        Ok(entries)
    }
}
