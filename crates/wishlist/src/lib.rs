//! Persistent wishlist store for the Aniview browser.
//!
//! Liked catalog items are kept as a single JSON-serialized array in one
//! file, independent of network state. Expected cardinality is small
//! (tens to low hundreds of entries), so every mutation reads, modifies,
//! and rewrites the whole blob.

pub mod store;

pub use store::{StorageError, WishlistEntry, WishlistStore};
