//! Search module.
//!
//! Listing helpers shared by the catalog and order views.

mod pagination;

pub use pagination::{Page, Pagination, DEFAULT_PER_PAGE};

/// Case-insensitive substring match; an empty needle matches everything.
pub fn matches_text(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
