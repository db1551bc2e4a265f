//! Product types.

use crate::catalog::{Category, ProductDocument, VideoMedia};
use crate::current_timestamp;
use crate::error::CommerceError;
use crate::ids::{CategoryId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Highest allowed product rating.
pub const MAX_RATING: f32 = 5.0;

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Current list price.
    pub price: Money,
    /// Full description.
    pub description: String,
    /// Main image URL.
    pub image_url: Option<String>,
    /// Top-level category.
    pub category_id: CategoryId,
    /// Optional subcategory of `category_id`.
    pub subcategory_id: Option<CategoryId>,
    /// Shown on the landing page.
    pub featured: bool,
    /// Average rating, 0 to 5.
    pub rating: f32,
    /// Number of reviews.
    pub reviews: u32,
    /// Ordered feature bullet points.
    pub features: Vec<String>,
    /// Attached documents.
    pub documents: Vec<ProductDocument>,
    /// Product video.
    pub video: VideoMedia,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

/// Admin input for a new product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub description: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub subcategory_id: Option<CategoryId>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub features: Vec<String>,
    /// External video link; ignored when a video file is uploaded.
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Partial update of a product. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    /// `Some(None)` clears the subcategory.
    pub subcategory_id: Option<Option<CategoryId>>,
    pub featured: Option<bool>,
    pub rating: Option<f32>,
    pub reviews: Option<u32>,
    /// Replaces the whole feature list.
    pub features: Option<Vec<String>>,
    /// `Some("")` removes an external video link.
    pub video_url: Option<String>,
}

impl Product {
    /// Create a product from validated admin input.
    pub fn new(draft: ProductDraft) -> Result<Self, CommerceError> {
        let name = validate_name(&draft.name)?;
        validate_price(&draft.price)?;
        validate_rating(draft.rating)?;

        let video = match draft.video_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => VideoMedia::external(url)?,
            _ => VideoMedia::None,
        };

        let now = current_timestamp();
        Ok(Self {
            id: ProductId::generate(),
            name,
            price: draft.price,
            description: draft.description,
            image_url: None,
            category_id: draft.category_id,
            subcategory_id: draft.subcategory_id,
            featured: draft.featured,
            rating: draft.rating,
            reviews: draft.reviews,
            features: clean_features(draft.features),
            documents: Vec::new(),
            video,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Nothing changes if any field is invalid.
    pub fn apply(&mut self, patch: ProductPatch) -> Result<(), CommerceError> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        if let Some(price) = &patch.price {
            validate_price(price)?;
        }
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
        }
        let video = match patch.video_url.as_deref().map(str::trim) {
            Some("") if self.video.is_external() => Some(VideoMedia::None),
            Some("") => None,
            Some(url) => Some(VideoMedia::external(url)?),
            None => None,
        };

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(subcategory_id) = patch.subcategory_id {
            self.subcategory_id = subcategory_id;
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(reviews) = patch.reviews {
            self.reviews = reviews;
        }
        if let Some(features) = patch.features {
            self.features = clean_features(features);
        }
        if let Some(video) = video {
            self.video = video;
        }
        self.touch();
        Ok(())
    }

    /// Set the main image.
    pub fn set_image(&mut self, url: impl Into<String>) {
        self.image_url = Some(url.into());
        self.touch();
    }

    /// Attach a document.
    pub fn attach_document(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.documents.push(ProductDocument {
            name: name.into(),
            url: url.into(),
        });
        self.touch();
    }

    /// Replace the video with an uploaded file.
    pub fn set_uploaded_video(&mut self, url: impl Into<String>) {
        self.video = VideoMedia::Uploaded(url.into());
        self.touch();
    }

    /// Check if this product is filed under a category or subcategory.
    pub fn is_in_category(&self, id: &CategoryId) -> bool {
        &self.category_id == id || self.subcategory_id.as_ref() == Some(id)
    }

    fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }
}

/// Check that `subcategory` (if any) hangs under `category`, and that
/// `category` is top-level.
pub fn validate_placement(
    category: &Category,
    subcategory: Option<&Category>,
) -> Result<(), CommerceError> {
    if category.is_subcategory {
        return Err(CommerceError::validation(
            "category_id",
            format!("{} is a subcategory; use subcategory_id", category.id),
        ));
    }
    if let Some(sub) = subcategory {
        if !category.is_parent_of(sub) {
            return Err(CommerceError::validation(
                "subcategory_id",
                format!("{} does not belong to category {}", sub.id, category.id),
            ));
        }
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String, CommerceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CommerceError::validation("name", "must not be empty"));
    }
    Ok(name.to_string())
}

fn validate_price(price: &Money) -> Result<(), CommerceError> {
    if price.is_negative() {
        return Err(CommerceError::validation("price", "must not be negative"));
    }
    Ok(())
}

fn validate_rating(rating: f32) -> Result<(), CommerceError> {
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(CommerceError::validation(
            "rating",
            format!("must be between 0 and {}", MAX_RATING),
        ));
    }
    Ok(())
}

/// Trim features and drop the blank ones.
fn clean_features(features: Vec<String>) -> Vec<String> {
    features
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Solar Panel".to_string(),
            price: Money::new(1_500_000, Currency::INR),
            description: "330W mono".to_string(),
            category_id: CategoryId::new("cat-1"),
            subcategory_id: None,
            featured: true,
            rating: 4.5,
            reviews: 12,
            features: vec!["Efficient".to_string(), "  ".to_string(), "".to_string()],
            video_url: None,
        }
    }

    #[test]
    fn test_new_product_drops_blank_features() {
        let product = Product::new(draft()).unwrap();
        assert_eq!(product.features, vec!["Efficient".to_string()]);
        assert!(product.video.is_none());
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut d = draft();
        d.price = Money::new(-1, Currency::INR);
        let err = Product::new(d).unwrap_err();
        assert!(matches!(err, CommerceError::Validation { ref field, .. } if field == "price"));
    }

    #[test]
    fn test_rating_bounds() {
        let mut d = draft();
        d.rating = 5.5;
        assert!(Product::new(d.clone()).is_err());
        d.rating = -0.1;
        assert!(Product::new(d.clone()).is_err());
        d.rating = 5.0;
        assert!(Product::new(d).is_ok());
    }

    #[test]
    fn test_patch_replaces_features_wholesale() {
        let mut product = Product::new(draft()).unwrap();
        product
            .apply(ProductPatch {
                features: Some(vec!["New".to_string(), "".to_string()]),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(product.features, vec!["New".to_string()]);
    }

    #[test]
    fn test_invalid_patch_changes_nothing() {
        let mut product = Product::new(draft()).unwrap();
        let before = product.clone();
        let result = product.apply(ProductPatch {
            name: Some("Renamed".to_string()),
            rating: Some(9.0),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(product, before);
    }

    #[test]
    fn test_video_is_exclusive() {
        let mut d = draft();
        d.video_url = Some("https://youtu.be/abc".to_string());
        let mut product = Product::new(d).unwrap();
        assert!(product.video.is_external());

        product.set_uploaded_video("/uploads/demo.mp4");
        assert_eq!(product.video, VideoMedia::Uploaded("/uploads/demo.mp4".to_string()));

        product
            .apply(ProductPatch {
                video_url: Some("https://www.youtube.com/watch?v=1".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(product.video.is_external());

        product
            .apply(ProductPatch {
                video_url: Some(String::new()),
                ..Default::default()
            })
            .unwrap();
        assert!(product.video.is_none());
    }

    #[test]
    fn test_placement_rules() {
        let root = Category::new_root("Energy").unwrap();
        let other = Category::new_root("Lighting").unwrap();
        let sub = Category::new_child(&root, "Solar").unwrap();

        assert!(validate_placement(&root, None).is_ok());
        assert!(validate_placement(&root, Some(&sub)).is_ok());
        assert!(validate_placement(&other, Some(&sub)).is_err());
        assert!(validate_placement(&sub, None).is_err());
    }

    #[test]
    fn test_is_in_category() {
        let mut product = Product::new(draft()).unwrap();
        product.subcategory_id = Some(CategoryId::new("sub-1"));
        assert!(product.is_in_category(&CategoryId::new("cat-1")));
        assert!(product.is_in_category(&CategoryId::new("sub-1")));
        assert!(!product.is_in_category(&CategoryId::new("cat-2")));
    }
}
