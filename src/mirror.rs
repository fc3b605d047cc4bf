//! Tree mirror - reproduce a remote directory tree on local disk

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::{AssetSource, DirectoryEntry, DownloadOutcome, Downloader, EntryKind, MirrorSettings, Result};

/// How a listing entry is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Directory,
    /// File with the image extension
    Asset,
    Ignored,
}

/// Counts for one mirror run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Files without the image extension and unknown entry kinds
    pub ignored: usize,
    /// Directories listed, root included
    pub directories: usize,
    /// Directories not listed because they are deeper than `max_depth`
    pub pruned: usize,
}

impl MirrorReport {
    /// Assets that reached the existence check
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }

    fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded => self.downloaded += 1,
            DownloadOutcome::Skipped => self.skipped += 1,
            DownloadOutcome::Failed => self.failed += 1,
        }
    }
}

/// A directory waiting to be listed
#[derive(Debug)]
struct PendingDir {
    /// Path fragment below the listing root; empty for the root
    remote: String,
    local: PathBuf,
    depth: usize,
}

/// Entries of one listing, split by classification
#[derive(Debug, Default)]
struct Listing {
    assets: Vec<DirectoryEntry>,
    subdirs: Vec<DirectoryEntry>,
    ignored: usize,
}

/// Recursive mirror of a remote image tree
pub struct TreeMirror<S> {
    source: S,
    settings: MirrorSettings,
}

impl<S: AssetSource> TreeMirror<S> {
    pub const fn new(source: S, settings: MirrorSettings) -> Self {
        Self { source, settings }
    }

    pub const fn settings(&self) -> &MirrorSettings {
        &self.settings
    }

    /// Local root of the mirror
    pub fn download_dir(&self) -> &Path {
        &self.settings.download_dir
    }

    /// Classify one listing entry
    #[must_use]
    pub fn classify(&self, entry: &DirectoryEntry) -> Classification {
        if entry.is_dir() {
            Classification::Directory
        } else if entry.kind == EntryKind::File && entry.name.ends_with(&self.settings.extension) {
            Classification::Asset
        } else {
            Classification::Ignored
        }
    }

    /// Listing endpoint for a path fragment
    #[must_use]
    pub fn listing_url(&self, remote: &str) -> String {
        if remote.is_empty() {
            self.settings.listing_url.clone()
        } else {
            format!("{}/{}", self.settings.listing_url, remote)
        }
    }

    /// Raw content URL for a path fragment
    #[must_use]
    pub fn raw_url(&self, remote: &str) -> String {
        format!("{}/{}", self.settings.raw_base_url, remote)
    }

    /// Path fragment of an entry below the listing root
    #[must_use]
    pub fn relative_path<'a>(&self, entry: &'a DirectoryEntry) -> &'a str {
        entry
            .path
            .strip_prefix(self.settings.path_prefix.as_str())
            .unwrap_or(&entry.path)
    }

    /// Mirror the whole tree into the download directory
    pub async fn run(&self) -> Result<MirrorReport> {
        let root = self.download_dir();
        tokio::fs::create_dir_all(root).await?;

        info!("Starting CS2 stickers download...");
        info!("Downloading to: {}", display_absolute(root));

        let total = if self.settings.count_first {
            let total = self.count_assets().await;
            info!("Found {} files to process", total);
            Some(total)
        } else {
            None
        };

        let mut report = MirrorReport::default();
        let mut stack = vec![PendingDir {
            remote: String::new(),
            local: root.to_path_buf(),
            depth: 0,
        }];

        while let Some(dir) = stack.pop() {
            if dir.remote.is_empty() {
                info!("Exploring: root directory");
            } else {
                info!("Exploring: {}", dir.remote);
            }

            let listing = self.list(&dir.remote).await;
            report.directories += 1;
            report.ignored += listing.ignored;

            for entry in &listing.assets {
                let url = self.raw_url(self.relative_path(entry));
                let dest = dir.local.join(&entry.name);

                let outcome = Downloader::fetch_missing(&self.source, &url, &dest).await?;
                report.record(outcome);

                if outcome != DownloadOutcome::Skipped {
                    tokio::time::sleep(self.settings.delay()).await;
                }

                if let Some(total) = total {
                    info!("[{}/{}] {}", report.processed(), total, dest.display());
                }
            }

            let pruned = self.push_subdirs(&mut stack, &dir, listing.subdirs);
            if pruned > 0 {
                warn!(
                    "Not descending into {} subdirectories of {:?}: depth limit {} reached",
                    pruned, dir.remote, self.settings.max_depth
                );
                report.pruned += pruned;
            }
        }

        info!(
            "Mirror complete: {} downloaded, {} skipped, {} failed",
            report.downloaded, report.skipped, report.failed
        );
        info!("All stickers saved to: {}", display_absolute(root));

        Ok(report)
    }

    /// Number of assets in the remote tree.
    ///
    /// Lists every directory without downloading anything, so a run with
    /// `count_first` issues each listing request twice.
    pub async fn count_assets(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![PendingDir {
            remote: String::new(),
            local: PathBuf::new(),
            depth: 0,
        }];

        while let Some(dir) = stack.pop() {
            let listing = self.list(&dir.remote).await;
            total += listing.assets.len();
            self.push_subdirs(&mut stack, &dir, listing.subdirs);
        }

        total
    }

    /// Fetch and classify one listing; a failed fetch counts as empty
    async fn list(&self, remote: &str) -> Listing {
        let entries = match self.source.list_directory(&self.listing_url(remote)).await {
            Ok(entries) => entries,
            Err(e) => {
                let shown = if remote.is_empty() { "root directory" } else { remote };
                error!("Error fetching directory {}: {}", shown, e);
                return Listing::default();
            }
        };
        debug!(path = remote, entries = entries.len(), "listed");

        let mut listing = Listing::default();
        for entry in entries {
            match self.classify(&entry) {
                Classification::Directory => listing.subdirs.push(entry),
                Classification::Asset => listing.assets.push(entry),
                Classification::Ignored => listing.ignored += 1,
            }
        }

        listing
    }

    /// Queue subdirectories so they pop in listing order.
    ///
    /// Returns how many were dropped by the depth guard.
    fn push_subdirs(
        &self,
        stack: &mut Vec<PendingDir>,
        parent: &PendingDir,
        subdirs: Vec<DirectoryEntry>,
    ) -> usize {
        if subdirs.is_empty() {
            return 0;
        }

        let depth = parent.depth + 1;
        if depth > self.settings.max_depth {
            return subdirs.len();
        }

        for entry in subdirs.into_iter().rev() {
            stack.push(PendingDir {
                remote: self.relative_path(&entry).to_string(),
                local: parent.local.join(&entry.name),
                depth,
            });
        }

        0
    }
}

fn display_absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
