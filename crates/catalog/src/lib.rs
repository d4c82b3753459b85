//! Catalog client library for the Aniview browser.
//!
//! This crate provides the networked core of the catalog browser:
//! - A rate-limited request scheduler serializing all outbound API calls
//! - A typed client for the upstream anime/manga REST API
//! - An exponential-backoff retry policy for throttled requests

pub mod client;
pub mod error;
pub mod query;
pub mod retry;
pub mod scheduler;
pub mod types;

pub use client::CatalogClient;
pub use error::{CatalogError, SchedulerClosed};
pub use query::{SearchQuery, SortDirection};
pub use retry::RetryPolicy;
pub use scheduler::{RateLimit, RequestScheduler};
pub use types::{AnimeItem, CatalogItem, Genre, MangaItem, PageInfo, SearchPage};
