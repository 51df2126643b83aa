//! Upstream data access.
//!
//! - `scryfall`: search API client and page-by-page extraction

pub mod scryfall;

pub use scryfall::{Extraction, PageSource, ScryfallClient, SearchPage, extract_cards};
