//! Upstream API v4 response types.
//!
//! These mirror the JSON the catalog API returns and pass through the
//! client unchanged. Fields the upstream may null are `Option`.

use serde::{Deserialize, Serialize};
use shared::Category;

/// Response envelope: a payload plus optional pagination metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    pub current_page: u32,
    #[serde(default)]
    pub items: Option<PaginationItems>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

/// Pagination summary handed to the presentation layer.
///
/// A missing upstream `pagination` block degrades to page 1 of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
}

impl PageInfo {
    pub(crate) fn from_envelope(pagination: Option<Pagination>) -> Self {
        match pagination {
            Some(p) => Self {
                current_page: p.current_page,
                total_pages: p.last_visible_page,
                has_next_page: p.has_next_page,
            },
            None => Self {
                current_page: 1,
                total_pages: 1,
                has_next_page: false,
            },
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub items: Vec<CatalogItem>,
    pub pagination: PageInfo,
}

/// Genre descriptor from the genres endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub mal_id: u32,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub count: u32,
}

/// Linked entity (genre, studio, author, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalEntity {
    pub mal_id: u32,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub name: String,
    pub url: String,
}

/// Image URLs in both encodings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Images {
    pub jpg: ImageSet,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// Anime entry as returned by search and detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeItem {
    pub mal_id: u32,
    pub url: String,
    pub images: Images,

    // Titles
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,

    // Type and status
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub source: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,
    #[serde(default)]
    pub airing: bool,
    pub duration: Option<String>,
    pub rating: Option<String>,

    // Scores and rankings
    pub score: Option<f64>,
    pub scored_by: Option<u32>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub members: Option<u32>,
    pub favorites: Option<u32>,

    // Synopsis
    pub synopsis: Option<String>,
    pub background: Option<String>,

    // Season
    pub season: Option<String>,
    pub year: Option<u32>,

    // Classifications
    #[serde(default)]
    pub genres: Vec<MalEntity>,
    #[serde(default)]
    pub studios: Vec<MalEntity>,
}

/// Manga entry as returned by search and detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MangaItem {
    pub mal_id: u32,
    pub url: String,
    pub images: Images,

    // Titles
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,

    // Type and status
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub chapters: Option<u32>,
    pub volumes: Option<u32>,
    pub status: Option<String>,
    #[serde(default)]
    pub publishing: bool,

    // Scores and rankings
    pub score: Option<f64>,
    pub scored_by: Option<u32>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub members: Option<u32>,
    pub favorites: Option<u32>,

    // Synopsis
    pub synopsis: Option<String>,
    pub background: Option<String>,

    // Classifications
    #[serde(default)]
    pub authors: Vec<MalEntity>,
    #[serde(default)]
    pub genres: Vec<MalEntity>,
}

/// A single catalog entry, anime or manga.
#[derive(Debug, Clone)]
pub enum CatalogItem {
    Anime(AnimeItem),
    Manga(MangaItem),
}

impl CatalogItem {
    pub fn category(&self) -> Category {
        match self {
            CatalogItem::Anime(_) => Category::Anime,
            CatalogItem::Manga(_) => Category::Manga,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            CatalogItem::Anime(item) => item.mal_id,
            CatalogItem::Manga(item) => item.mal_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CatalogItem::Anime(item) => &item.title,
            CatalogItem::Manga(item) => &item.title,
        }
    }

    /// Default poster image, when the upstream provides one.
    pub fn image_url(&self) -> Option<&str> {
        let images = match self {
            CatalogItem::Anime(item) => &item.images,
            CatalogItem::Manga(item) => &item.images,
        };
        images.jpg.image_url.as_deref()
    }
}
