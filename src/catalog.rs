//! Catalog organizer - download catalog assets into category folders

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tracing::{error, info};

use crate::{AssetRecord, AssetSource, CatalogSettings, DownloadOutcome, Downloader, Result};

/// Destination folder of a catalog record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// `tournaments/<event>`
    Tournament(String),
    /// `collections/<crate>`
    Collection(String),
    /// `types/<type>`
    Type(String),
    Unknown,
}

impl Category {
    /// Derive the category of a record.
    ///
    /// Tournament event wins over crate, crate over type. Empty values count
    /// as absent.
    #[must_use]
    pub fn for_record(record: &AssetRecord) -> Self {
        if let Some(event) = non_empty(record.tournament_event.as_deref()) {
            return Self::Tournament(event.replace(' ', "_"));
        }

        if let Some(name) = non_empty(record.crate_names().next()) {
            return Self::Collection(name.replace(' ', "_").replace('|', ""));
        }

        if let Some(kind) = non_empty(record.kind.as_deref()) {
            return Self::Type(kind.to_lowercase());
        }

        Self::Unknown
    }

    /// Folder below the download root.
    ///
    /// Only plain components of the value are kept, so the result never
    /// leaves its top-level folder.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        match self {
            Self::Tournament(name) => below("tournaments", name),
            Self::Collection(name) => below("collections", name),
            Self::Type(name) => below("types", name),
            Self::Unknown => PathBuf::from("unknown"),
        }
    }
}

fn below(folder: &str, name: &str) -> PathBuf {
    let mut path = PathBuf::from(folder);
    for component in Path::new(name).components() {
        if let Component::Normal(part) = component {
            path.push(part);
        }
    }
    path
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tournament(name) => write!(f, "tournaments/{name}"),
            Self::Collection(name) => write!(f, "collections/{name}"),
            Self::Type(name) => write!(f, "types/{name}"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// File name for a record: display name minus `prefix`, path separators
/// replaced, `extension` appended.
#[must_use]
pub fn file_name_for(record: &AssetRecord, prefix: &str, extension: &str) -> String {
    let name = record.name.strip_prefix(prefix).unwrap_or(&record.name);
    let name: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();

    format!("{name}{extension}")
}

/// Group downloadable records by category.
///
/// Categories keep the order of their first record, records keep catalog
/// order. Records without an asset URL are dropped.
#[must_use]
pub fn group_by_category(records: &[AssetRecord]) -> Vec<(Category, Vec<&AssetRecord>)> {
    let mut groups: Vec<(Category, Vec<&AssetRecord>)> = Vec::new();
    let mut index: HashMap<Category, usize> = HashMap::new();

    for record in records.iter().filter(|r| r.image_url.is_some()) {
        let category = Category::for_record(record);
        let slot = *index.entry(category.clone()).or_insert_with(|| {
            groups.push((category, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }

    groups
}

/// Counts for one organizer run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrganizeReport {
    pub categories: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl OrganizeReport {
    #[must_use]
    pub const fn total(&self) -> usize {
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

/// Catalog organizer
pub struct CatalogOrganizer<S> {
    source: S,
    settings: CatalogSettings,
}

impl<S: AssetSource> CatalogOrganizer<S> {
    pub const fn new(source: S, settings: CatalogSettings) -> Self {
        Self { source, settings }
    }

    pub const fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Fetch the catalog and organize it; a failed fetch organizes nothing
    pub async fn run(&self) -> Result<OrganizeReport> {
        let root = &self.settings.download_dir;
        tokio::fs::create_dir_all(root).await?;

        info!("Fetching sticker data from API...");
        let records = match self.source.fetch_catalog(&self.settings.catalog_url).await {
            Ok(records) => records,
            Err(e) => {
                error!("Error fetching catalog: {}", e);
                Vec::new()
            }
        };
        info!("Found {} stickers in catalog", records.len());

        let report = self.organize(&records).await?;

        info!("Successfully downloaded {} stickers!", report.downloaded);
        info!(
            "Files saved to: {}",
            std::path::absolute(root).unwrap_or_else(|_| root.clone()).display()
        );

        Ok(report)
    }

    /// Download already fetched records into their category folders
    pub async fn organize(&self, records: &[AssetRecord]) -> Result<OrganizeReport> {
        let groups = group_by_category(records);
        let mut report = OrganizeReport {
            categories: groups.len(),
            ..Default::default()
        };

        for (category, members) in groups {
            let dir = self.settings.download_dir.join(category.relative_path());
            tokio::fs::create_dir_all(&dir).await?;

            info!(category = %category, "Downloading {} stickers to {}", members.len(), category);

            for record in members {
                let Some(url) = record.image_url.as_deref() else {
                    continue;
                };
                let file_name =
                    file_name_for(record, &self.settings.name_prefix, &self.settings.extension);

                let outcome = Downloader::fetch_missing(&self.source, url, &dir.join(&file_name)).await?;
                report.record(outcome);

                if outcome == DownloadOutcome::Downloaded {
                    tokio::time::sleep(self.settings.delay()).await;
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_priority() {
        let tournament = AssetRecord::new("Sticker | A")
            .with_tournament("2014 EMS One Katowice")
            .with_crate("Capsule")
            .with_type("Event");
        let collection = AssetRecord::new("Sticker | B")
            .with_crate("Sticker Capsule | Series 2")
            .with_type("Event");
        let typed = AssetRecord::new("Sticker | C").with_type("Holo Foil");
        let unknown = AssetRecord::new("Sticker | D");

        assert_eq!(
            Category::for_record(&tournament),
            Category::Tournament("2014_EMS_One_Katowice".to_string())
        );
        assert_eq!(
            Category::for_record(&collection),
            Category::Collection("Sticker_Capsule__Series_2".to_string())
        );
        assert_eq!(
            Category::for_record(&typed),
            Category::Type("holo foil".to_string())
        );
        assert_eq!(Category::for_record(&unknown), Category::Unknown);
    }

    #[test]
    fn test_empty_values_fall_through() {
        let record = AssetRecord::new("Sticker | E")
            .with_tournament("")
            .with_type("Team");

        assert_eq!(Category::for_record(&record), Category::Type("team".to_string()));
    }

    #[test]
    fn test_empty_crate_name_and_type_fall_through() {
        let record = AssetRecord::new("Sticker | F")
            .with_crate("")
            .with_type("Team");
        assert_eq!(Category::for_record(&record), Category::Type("team".to_string()));

        let record = AssetRecord::new("Sticker | G").with_crate("").with_type("");
        assert_eq!(Category::for_record(&record), Category::Unknown);
    }

    #[test]
    fn test_category_path_stays_inside_folder() {
        assert_eq!(
            Category::Tournament("/etc/cron.d".to_string()).relative_path(),
            Path::new("tournaments").join("etc").join("cron.d")
        );
        assert_eq!(
            Category::Collection("../../escape".to_string()).relative_path(),
            Path::new("collections").join("escape")
        );
        assert_eq!(
            Category::Type("./holo".to_string()).relative_path(),
            Path::new("types").join("holo")
        );
        assert_eq!(
            Category::Tournament("/".to_string()).relative_path(),
            PathBuf::from("tournaments")
        );
    }

    #[test]
    fn test_category_paths() {
        assert_eq!(
            Category::Collection("Capsule_One".to_string()).relative_path(),
            Path::new("collections").join("Capsule_One")
        );
        assert_eq!(Category::Unknown.relative_path(), PathBuf::from("unknown"));
        assert_eq!(
            Category::Tournament("Cologne_2015".to_string()).to_string(),
            "tournaments/Cologne_2015"
        );
    }

    #[test]
    fn test_file_name_for() {
        let record = AssetRecord::new("Sticker | Foo/Bar");
        assert_eq!(file_name_for(&record, "Sticker | ", ".png"), "Foo_Bar.png");

        let record = AssetRecord::new("Sticker | a\\b | Holo");
        assert_eq!(file_name_for(&record, "Sticker | ", ".png"), "a_b | Holo.png");

        // Prefix only counts at the start
        let record = AssetRecord::new("Patch | Sticker | X");
        assert_eq!(
            file_name_for(&record, "Sticker | ", ".png"),
            "Patch | Sticker | X.png"
        );
    }

    #[test]
    fn test_group_by_category_order_and_filtering() {
        let records = vec![
            AssetRecord::new("a").with_image("u/a").with_type("Team"),
            AssetRecord::new("b").with_image("u/b").with_tournament("Major"),
            AssetRecord::new("c").with_type("Team"),
            AssetRecord::new("d").with_image("u/d").with_type("team"),
        ];

        let groups = group_by_category(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Category::Type("team".to_string()));
        assert_eq!(
            groups[0].1.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            ["a", "d"]
        );
        assert_eq!(groups[1].0, Category::Tournament("Major".to_string()));
    }
}
