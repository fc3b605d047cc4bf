use super::{AssetRecord, AssetSource, ByteStream, DirectoryEntry};
use crate::{Error, Result};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// reqwest-backed [`AssetSource`].
///
/// Each pipeline builds its own instance, so the session and its headers are
/// scoped to one run.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Create a new HTTP source sending the given user agent.
    ///
    /// No timeout is configured; the client's defaults apply.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self { client })
    }

    /// Execute GET request and parse JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Parse(format!("{url}: {e}")))
    }

    /// Turn a non-2xx response into [`Error::Api`]
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();

            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl AssetSource for HttpSource {
    async fn list_directory(&self, url: &str) -> Result<Vec<DirectoryEntry>> {
        self.get_json(url).await
    }

    async fn fetch_catalog(&self, url: &str) -> Result<Vec<AssetRecord>> {
        self.get_json(url).await
    }

    async fn fetch_stream(&self, url: &str) -> Result<ByteStream> {
        debug!(url, "GET (stream)");
        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response).await?;

        Ok(response.bytes_stream().map_err(Error::Network).boxed())
    }
}
