//! Search query construction.
//!
//! A [`SearchQuery`] is immutable per request: the presentation layer
//! builds a fresh one on every filter change. Only set fields appear in
//! the query string, and list-valued fields are repeated as multiple
//! same-named parameters, matching the upstream API.

use reqwest::Url;

use crate::error::CatalogError;

/// Sort direction for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Search parameters for one catalog request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    /// Free-text search (`q`)
    pub text: Option<String>,
    /// 1-based result page
    pub page: Option<u32>,
    /// Results per page (`limit`)
    pub limit: Option<u32>,
    /// Media type filter (`type`): tv, movie, ova, novel, ...
    pub item_type: Option<String>,
    /// Airing/publishing status filter
    pub status: Option<String>,
    /// Genre id filters, repeated in the query string
    pub genres: Vec<u32>,
    /// Audience rating filter
    pub rating: Option<String>,
    /// Sort field (`order_by`)
    pub order_by: Option<String>,
    /// Sort direction
    pub sort: Option<SortDirection>,
}

impl SearchQuery {
    /// Query-string pairs for the set fields, in upstream parameter order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(text) = &self.text {
            pairs.push(("q", text.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(item_type) = &self.item_type {
            pairs.push(("type", item_type.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        for genre in &self.genres {
            pairs.push(("genres", genre.to_string()));
        }
        if let Some(rating) = &self.rating {
            pairs.push(("rating", rating.clone()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("order_by", order_by.clone()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs
    }
}

/// Build a fully-qualified request URL from a base URL (with trailing
/// slash), an endpoint path, and query pairs.
pub(crate) fn build_url(
    base: &Url,
    path: &str,
    pairs: &[(&'static str, String)],
) -> Result<Url, CatalogError> {
    let mut url = base
        .join(path)
        .map_err(|e| CatalogError::transport(format!("invalid request URL {path:?}: {e}")))?;

    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in pairs {
            query.append_pair(key, value);
        }
    }

    Ok(url)
}
