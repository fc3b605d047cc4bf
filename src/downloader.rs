//! Streaming download of single assets

use crate::{AssetSource, Result};
use futures::StreamExt;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{error, info};

/// Write buffer size for asset bodies
const CHUNK_SIZE: usize = 8192;

/// What happened to one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded,
    /// A file already occupied the destination
    Skipped,
    Failed,
}

/// Downloader for assets
pub struct Downloader;

impl Downloader {
    /// Download `url` to `dest` unless something already exists there.
    ///
    /// Existing files are never touched.
    pub async fn fetch_missing<S>(source: &S, url: &str, dest: &Path) -> Result<DownloadOutcome>
    where
        S: AssetSource + ?Sized,
    {
        if tokio::fs::try_exists(dest).await? {
            info!("Skipping (already exists): {}", dest.display());
            return Ok(DownloadOutcome::Skipped);
        }

        Ok(if Self::download(source, url, dest).await? {
            DownloadOutcome::Downloaded
        } else {
            DownloadOutcome::Failed
        })
    }

    /// Stream `url` into `dest`, creating parent directories as needed.
    ///
    /// The body goes to a short hidden temp file beside `dest` and is moved
    /// into place once complete, so the temp name fits wherever `dest` fits.
    ///
    /// Returns `Ok(false)` when the remote side fails; the failure is logged
    /// and nothing is left at `dest`. Local filesystem errors are returned.
    pub async fn download<S>(source: &S, url: &str, dest: &Path) -> Result<bool>
    where
        S: AssetSource + ?Sized,
    {
        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        tokio::fs::create_dir_all(parent).await?;

        let mut stream = match source.fetch_stream(url).await {
            Ok(stream) => stream,
            Err(e) if e.is_remote() => {
                error!("Error downloading {url}: {e}");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        // Dropping `partial` removes the file
        let (file, partial) = tempfile::Builder::new()
            .prefix(".")
            .suffix(".part")
            .tempfile_in(parent)?
            .into_parts();
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, tokio::fs::File::from_std(file));

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) if e.is_remote() => {
                    error!("Error downloading {url}: {e}");
                    return Ok(false);
                }
                Err(e) => return Err(e),
            };

            writer.write_all(&chunk).await?;
        }

        writer.flush().await?;
        drop(writer);
        partial.persist_noclobber(dest).map_err(|e| e.error)?;

        info!("Downloaded: {}", dest.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::FakeSource;
    use tempfile::TempDir;

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_download_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("x").join("y").join("a.png");
        let source = FakeSource::new().with_asset("https://raw/a.png", b"png-bytes");

        let ok = Downloader::download(&source, "https://raw/a.png", &dest)
            .await
            .unwrap();

        assert!(ok);
        assert_eq!(std::fs::read(&dest).unwrap(), b"png-bytes");
        assert_eq!(file_names(dest.parent().unwrap()), ["a.png"]);
    }

    #[tokio::test]
    async fn test_download_name_at_length_limit() {
        let temp_dir = TempDir::new().unwrap();
        let name = format!("{}.png", "a".repeat(249));
        let dest = temp_dir.path().join(&name);
        let source = FakeSource::new().with_asset("https://raw/long.png", b"long");

        let ok = Downloader::download(&source, "https://raw/long.png", &dest)
            .await
            .unwrap();

        assert!(ok);
        assert_eq!(std::fs::read(&dest).unwrap(), b"long");
        assert_eq!(file_names(temp_dir.path()), [name]);
    }

    #[tokio::test]
    async fn test_download_http_error_returns_false() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("missing.png");
        let source = FakeSource::new();

        let ok = Downloader::download(&source, "https://raw/missing.png", &dest)
            .await
            .unwrap();

        assert!(!ok);
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_interrupted_stream_leaves_nothing_behind() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("cut.png");
        let source = FakeSource::new().with_interrupted_asset("https://raw/cut.png", b"half");

        let ok = Downloader::download(&source, "https://raw/cut.png", &dest)
            .await
            .unwrap();

        assert!(!ok);
        assert!(!dest.exists());
        assert!(file_names(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_missing_skips_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("old.png");
        std::fs::write(&dest, b"original").unwrap();
        let source = FakeSource::new().with_asset("https://raw/old.png", b"replacement");

        let outcome = Downloader::fetch_missing(&source, "https://raw/old.png", &dest)
            .await
            .unwrap();

        assert_eq!(outcome, DownloadOutcome::Skipped);
        assert_eq!(std::fs::read(&dest).unwrap(), b"original");
        assert!(source.asset_requests().is_empty());
    }
}
