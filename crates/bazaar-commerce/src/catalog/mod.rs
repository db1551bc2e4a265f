//! Product catalog module.
//!
//! Contains types for categories, products and their media.

mod category;
mod media;
mod product;

pub use category::Category;
pub use media::{is_youtube_url, ProductDocument, VideoMedia};
pub use product::{validate_placement, Product, ProductDraft, ProductPatch, MAX_RATING};
