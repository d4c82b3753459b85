//! Catalog client for the upstream REST API.
//!
//! Translates search queries and id lookups into request URLs, funnels
//! every HTTP round-trip through the request scheduler, classifies the
//! response status, and decodes the JSON envelope into typed results.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use shared::config::CatalogConfig;
use shared::Category;

use crate::error::CatalogError;
use crate::query::{build_url, SearchQuery};
use crate::retry::RetryPolicy;
use crate::scheduler::{RateLimit, RequestScheduler};
use crate::types::{
    AnimeItem, CatalogItem, Envelope, Genre, MangaItem, PageInfo, SearchPage,
};

const USER_AGENT: &str = concat!("aniview/", env!("CARGO_PKG_VERSION"));

/// Rate-limited, retrying client for the catalog API.
///
/// Each instance owns its scheduler and retry policy, so tests and
/// embedders construct isolated clients instead of sharing a global one.
pub struct CatalogClient {
    http: Client,
    base_url: Url,
    scheduler: RequestScheduler,
    retry: RetryPolicy,
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    ///
    /// Must be called inside a Tokio runtime (the scheduler spawns its
    /// drain task).
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;

        // A trailing slash keeps Url::join from replacing the version
        // segment of the base path.
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| CatalogError::transport(format!("invalid base URL {base:?}: {e}")))?;

        let scheduler = RequestScheduler::new(RateLimit::new(
            config.rate_limit.max_requests,
            Duration::from_millis(config.rate_limit.window_ms),
        ));
        let retry = RetryPolicy::new(
            config.retry.max_retries,
            Duration::from_millis(config.retry.base_delay_ms),
        );

        Ok(Self {
            http,
            base_url,
            scheduler,
            retry,
        })
    }

    /// Search `category` with the given filters.
    pub async fn search(
        &self,
        category: Category,
        query: &SearchQuery,
    ) -> Result<SearchPage, CatalogError> {
        let url = build_url(&self.base_url, category.as_str(), &query.to_pairs())?;
        debug!(category = %category, url = %url, "Searching catalog");

        match category {
            Category::Anime => {
                let envelope: Envelope<Vec<AnimeItem>> =
                    self.retry.run(|| self.get_json(url.clone())).await?;
                Ok(SearchPage {
                    pagination: PageInfo::from_envelope(envelope.pagination),
                    items: envelope.data.into_iter().map(CatalogItem::Anime).collect(),
                })
            }
            Category::Manga => {
                let envelope: Envelope<Vec<MangaItem>> =
                    self.retry.run(|| self.get_json(url.clone())).await?;
                Ok(SearchPage {
                    pagination: PageInfo::from_envelope(envelope.pagination),
                    items: envelope.data.into_iter().map(CatalogItem::Manga).collect(),
                })
            }
        }
    }

    /// Fetch one item by its upstream id.
    pub async fn get_by_id(
        &self,
        category: Category,
        id: u32,
    ) -> Result<CatalogItem, CatalogError> {
        let url = build_url(&self.base_url, &format!("{}/{}", category.as_str(), id), &[])?;
        debug!(category = %category, id, url = %url, "Fetching item details");

        let result = match category {
            Category::Anime => self
                .retry
                .run(|| self.get_json::<Envelope<AnimeItem>>(url.clone()))
                .await
                .map(|envelope| CatalogItem::Anime(envelope.data)),
            Category::Manga => self
                .retry
                .run(|| self.get_json::<Envelope<MangaItem>>(url.clone()))
                .await
                .map(|envelope| CatalogItem::Manga(envelope.data)),
        };

        // A status-bearing failure on an id lookup means the id does not
        // resolve upstream.
        result.map_err(|e| match e {
            CatalogError::Transport {
                status: Some(status),
                ..
            } => CatalogError::NotFound { status },
            other => other,
        })
    }

    /// List the genres available for `category`.
    pub async fn list_genres(&self, category: Category) -> Result<Vec<Genre>, CatalogError> {
        let url = build_url(&self.base_url, &format!("genres/{}", category.as_str()), &[])?;
        debug!(category = %category, url = %url, "Fetching genres");

        let envelope: Envelope<Vec<Genre>> =
            self.retry.run(|| self.get_json(url.clone())).await?;
        Ok(envelope.data)
    }

    /// One scheduler-mediated GET: send, classify the status, decode.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let http = self.http.clone();
        let request_url = url.clone();
        let response = self
            .scheduler
            .submit(move || async move { http.get(request_url).send().await })
            .await??;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(url = %url, "Upstream throttled the request");
            return Err(CatalogError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "Request failed");
            return Err(CatalogError::Transport {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| CatalogError::Decode {
            message: e.to_string(),
        })
    }
}
