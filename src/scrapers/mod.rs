//! News sources the song can be written about.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | New York Times | [`nyt`] | Top Stories API | Requires API key; page body scraped by marker |
//!
//! # Common Patterns
//!
//! A source module exports:
//! - `index_articles()`: Lists the latest articles, or `None` when the source
//!   refuses the request
//! - `fetch_full_text(article)`: Best-effort article body, falling back to the
//!   listing abstract

pub mod nyt;
