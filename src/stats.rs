use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

/// Summary of what is already on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub total_files: usize,
    pub total_size: u64,
}

impl DownloadStats {
    /// Count files ending in `extension` under `root`.
    ///
    /// A missing root yields zeros.
    pub fn collect<P: AsRef<Path>>(root: P, extension: &str) -> Self {
        let mut stats = Self::default();

        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }

            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(extension));
            if !matches {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    stats.total_files += 1;
                    stats.total_size += metadata.len();
                }
                Err(e) => warn!("Failed to read metadata for {:?}: {}", entry.path(), e),
            }
        }

        stats
    }

    /// Total size in MiB, rounded to two decimals
    #[must_use]
    pub fn total_size_mb(&self) -> f64 {
        (self.total_size as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
    }
}

impl std::fmt::Display for DownloadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} files, {} MB", self.total_files, self.total_size_mb())
    }
}
