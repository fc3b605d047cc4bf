use serde::{Deserialize, Deserializer};

/// Kind of a remote listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules and anything else the listing API reports
    #[serde(other)]
    Other,
}

/// One record of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    /// Slash-separated path relative to the repository root
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl DirectoryEntry {
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Crate reference inside a catalog record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrateRef {
    #[serde(default)]
    pub name: String,
}

/// One record of the sticker catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssetRecord {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "image", alias = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(alias = "tournamentEvent", default, deserialize_with = "nullable_name")]
    pub tournament_event: Option<String>,
    #[serde(rename = "crates", default, deserialize_with = "nullable_list")]
    pub crates: Vec<CrateRef>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl AssetRecord {
    /// Crate names in catalog order
    pub fn crate_names(&self) -> impl Iterator<Item = &str> {
        self.crates.iter().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
impl DirectoryEntry {
    pub(crate) fn new(name: impl Into<String>, path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }
}

#[cfg(test)]
impl AssetRecord {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub(crate) fn with_tournament(mut self, event: impl Into<String>) -> Self {
        self.tournament_event = Some(event.into());
        self
    }

    pub(crate) fn with_crate(mut self, name: impl Into<String>) -> Self {
        self.crates.push(CrateRef { name: name.into() });
        self
    }

    pub(crate) fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// The catalog reports tournament events either as a plain string or as an
/// object carrying a `name`.
fn nullable_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NameOrObject {
        Name(String),
        Object { name: Option<String> },
    }

    Ok(
        match Option::<NameOrObject>::deserialize(deserializer)? {
            Some(NameOrObject::Name(name)) => Some(name),
            Some(NameOrObject::Object { name }) => name,
            None => None,
        },
    )
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<CrateRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<CrateRef>>::deserialize(deserializer)?.unwrap_or_default())
}
