//! Client for the external volume-lookup API.

use std::time::Duration;

use async_trait::async_trait;
use libris_kernel::settings::{clamp_page_size, CatalogSettings};
use thiserror::Error;

use super::models::{Book, CatalogPage, Volume, VolumesResponse};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid catalog configuration: {0}")]
    Config(String),
}

/// Source of book volumes.
#[async_trait]
pub trait VolumeSource: Send + Sync {
    /// Search volumes matching `query`, starting at the zero-based `start_index`.
    async fn search(
        &self,
        query: &str,
        start_index: u64,
        max_results: u32,
    ) -> Result<CatalogPage, CatalogError>;

    /// Look up one volume; `Ok(None)` when the catalog does not know it.
    async fn volume(&self, id: &str) -> Result<Option<Book>, CatalogError>;
}

/// [`VolumeSource`] backed by the Google Books API.
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CatalogError::Config(format!(
                "base_url '{}' is not an http(s) URL",
                settings.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("libris/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: settings.api_key.clone(),
        })
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        }
    }

    /// Build the search request without sending it.
    pub fn search_request(
        &self,
        query: &str,
        start_index: u64,
        max_results: u32,
    ) -> reqwest::RequestBuilder {
        let max_results = clamp_page_size(max_results);
        let request = self
            .client
            .get(format!("{}/volumes", self.base_url))
            .query(&[
                ("q", query.to_string()),
                ("startIndex", start_index.to_string()),
                ("maxResults", max_results.to_string()),
            ]);
        self.with_key(request)
    }

    /// Build the single-volume request without sending it.
    pub fn volume_request(&self, id: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(format!("{}/volumes/{}", self.base_url, id));
        self.with_key(request)
    }
}

#[async_trait]
impl VolumeSource for GoogleBooksClient {
    async fn search(
        &self,
        query: &str,
        start_index: u64,
        max_results: u32,
    ) -> Result<CatalogPage, CatalogError> {
        let response = self
            .search_request(query, start_index, max_results)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: response.url().path().to_string(),
            });
        }

        let body: VolumesResponse = response.json().await?;
        let page = CatalogPage::from(body);
        tracing::debug!(
            query,
            start_index,
            total_items = page.total_items,
            returned = page.books.len(),
            "catalog search completed"
        );
        Ok(page)
    }

    async fn volume(&self, id: &str) -> Result<Option<Book>, CatalogError> {
        let response = self.volume_request(id).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: response.url().path().to_string(),
            });
        }

        let volume: Volume = response.json().await?;
        Ok(Some(volume.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: Option<&str>) -> CatalogSettings {
        CatalogSettings {
            base_url: "https://books.example.com/v1/".to_string(),
            api_key: api_key.map(str::to_string),
            ..CatalogSettings::default()
        }
    }

    fn query_pairs(request: &reqwest::Request) -> Vec<(String, String)> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn search_request_carries_offset() {
        let client = GoogleBooksClient::new(&settings(None)).unwrap();
        let request = client.search_request("Test Book", 20, 20).build().unwrap();

        assert_eq!(request.url().path(), "/v1/volumes");
        assert!(request.url().as_str().contains("startIndex=20"));
        assert_eq!(
            query_pairs(&request),
            vec![
                ("q".to_string(), "Test Book".to_string()),
                ("startIndex".to_string(), "20".to_string()),
                ("maxResults".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn search_request_caps_page_size() {
        let client = GoogleBooksClient::new(&settings(None)).unwrap();
        let request = client.search_request("rust", 0, 500).build().unwrap();
        assert!(query_pairs(&request).contains(&("maxResults".to_string(), "40".to_string())));
    }

    #[test]
    fn api_key_is_appended() {
        let client = GoogleBooksClient::new(&settings(Some("secret"))).unwrap();
        let request = client.volume_request("abc123").build().unwrap();
        assert_eq!(request.url().path(), "/v1/volumes/abc123");
        assert_eq!(
            query_pairs(&request),
            vec![("key".to_string(), "secret".to_string())]
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        let settings = CatalogSettings {
            base_url: "ftp://books.example.com".to_string(),
            ..CatalogSettings::default()
        };
        assert!(matches!(
            GoogleBooksClient::new(&settings),
            Err(CatalogError::Config(_))
        ));
    }
}
