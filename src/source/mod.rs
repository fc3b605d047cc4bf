mod http;
mod types;

pub use http::HttpSource;
pub use types::{AssetRecord, CrateRef, DirectoryEntry, EntryKind};

use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

/// Body of an asset response, chunk by chunk
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Remote side of both pipelines
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch and decode one directory listing
    async fn list_directory(&self, url: &str) -> Result<Vec<DirectoryEntry>>;

    /// Fetch and decode the asset catalog
    async fn fetch_catalog(&self, url: &str) -> Result<Vec<AssetRecord>>;

    /// Open a streaming GET for one asset.
    ///
    /// A non-2xx status must be reported here, before any chunk is yielded.
    async fn fetch_stream(&self, url: &str) -> Result<ByteStream>;
}

#[async_trait]
impl<T: AssetSource + ?Sized> AssetSource for &T {
    async fn list_directory(&self, url: &str) -> Result<Vec<DirectoryEntry>> {
        (**self).list_directory(url).await
    }

    async fn fetch_catalog(&self, url: &str) -> Result<Vec<AssetRecord>> {
        (**self).fetch_catalog(url).await
    }

    async fn fetch_stream(&self, url: &str) -> Result<ByteStream> {
        (**self).fetch_stream(url).await
    }
}
