//! Data models shared across the workspace.

use serde::{Deserialize, Serialize};

/// Content category served by the upstream API.
///
/// Doubles as the endpoint path segment (`/anime`, `/manga`) and as part
/// of the wishlist uniqueness key `(id, category)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Anime,
    Manga,
}

impl Category {
    /// The path segment used by the upstream API for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Anime => "anime",
            Category::Manga => "manga",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anime" => Ok(Category::Anime),
            "manga" => Ok(Category::Manga),
            _ => Err(anyhow::anyhow!("Invalid category: {}", s)),
        }
    }
}
