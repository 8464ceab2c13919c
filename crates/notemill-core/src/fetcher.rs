//! HTTP access to the Notion workspace API.

use crate::{Block, Error, Page, Result};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

/// API version pinned for the workspace endpoints.
const NOTION_VERSION: &str = "2022-02-22";

/// Default public API base.
const DEFAULT_API_URL: &str = "https://api.notion.com";

/// HTTP client for the Notion workspace API.
///
/// Wraps a configured `reqwest::Client` with bearer auth and the pinned
/// `Notion-Version` header. The base URL is overridable so tests can point
/// at a mock server.
pub struct NotionFetcher {
    client: Client,
    base_url: String,
    page_size: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Page>,
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChildrenResponse {
    results: Vec<Block>,
}

impl NotionFetcher {
    /// Creates a new fetcher authenticated with the given integration token.
    pub fn new(token: &str) -> Result<Self> {
        Self::with_timeout(token, Duration::from_secs(30))
    }

    /// Creates a new fetcher with a custom request timeout (primarily for tests).
    pub fn with_timeout(token: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| Error::Config("integration token is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_VERSION));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("notemill/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            client,
            base_url: DEFAULT_API_URL.to_string(),
            page_size: 100,
        })
    }

    /// Override the API base URL. Used by tests against a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the search page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Lists every page and database record in the workspace, in arrival
    /// order, following the search cursor until `has_more` goes false.
    pub async fn search_pages(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": self.page_size });
            if let Some(start_cursor) = &cursor {
                body["start_cursor"] = json!(start_cursor);
            }

            let response = self
                .client
                .post(format!("{}/v1/search", self.base_url))
                .json(&body)
                .send()
                .await?
                .error_for_status()?;

            let batch: SearchResponse = response.json().await?;
            debug!("search returned {} records", batch.results.len());
            pages.extend(batch.results);

            if !batch.has_more {
                break;
            }
            cursor = batch.next_cursor;
            if cursor.is_none() {
                // Looping again without a cursor would refetch page one.
                warn!("search reported more results but no cursor; listing may be truncated");
                break;
            }
        }

        info!("workspace search found {} records", pages.len());
        Ok(pages)
    }

    /// Fetches a page record and extracts its title.
    ///
    /// The title lives under a `Title` or `title` property; a page without
    /// one is a malformed record and the caller skips the page.
    pub async fn page_title(&self, page_id: &str) -> Result<String> {
        let page: serde_json::Value = self
            .client
            .get(format!("{}/v1/pages/{page_id}", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let properties = page
            .get("properties")
            .ok_or_else(|| Error::MalformedRecord(format!("page {page_id} has no properties")))?;

        let title_prop = properties
            .get("Title")
            .or_else(|| properties.get("title"))
            .ok_or_else(|| {
                Error::MalformedRecord(format!("page {page_id} has no title property"))
            })?;

        title_prop
            .pointer("/title/0/text/content")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::MalformedRecord(format!("page {page_id} has an empty title")))
    }

    /// Fetches the ordered child blocks of a page or block.
    pub async fn block_children(&self, parent_id: &str) -> Result<Vec<Block>> {
        let response: ChildrenResponse = self
            .client
            .get(format!("{}/v1/blocks/{parent_id}/children", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.results)
    }
}
