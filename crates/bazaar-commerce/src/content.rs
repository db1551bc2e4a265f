//! Marketing content shown around the storefront: solutions, testimonials
//! and client logos.

use crate::current_timestamp;
use crate::error::CommerceError;
use crate::ids::{ClientId, SolutionId, TestimonialId};
use serde::{Deserialize, Serialize};

/// A showcased solution (name plus a hero image).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Solution {
    pub id: SolutionId,
    pub name: String,
    pub image_url: String,
    pub created_at: i64,
}

impl Solution {
    pub fn new(name: &str, image_url: impl Into<String>) -> Result<Self, CommerceError> {
        let image_url = image_url.into();
        if image_url.trim().is_empty() {
            return Err(CommerceError::validation("image", "is required"));
        }
        Ok(Self {
            id: SolutionId::generate(),
            name: required_text("name", name)?,
            image_url,
            created_at: current_timestamp(),
        })
    }
}

/// A customer review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub name: String,
    pub review: String,
    /// Star rating, 0 to 5.
    pub rating: f32,
    pub created_at: i64,
}

impl Testimonial {
    pub fn new(name: &str, review: &str, rating: f32) -> Result<Self, CommerceError> {
        if !(0.0..=5.0).contains(&rating) {
            return Err(CommerceError::validation("rating", "must be between 0 and 5"));
        }
        Ok(Self {
            id: TestimonialId::generate(),
            name: required_text("name", name)?,
            review: required_text("review", review)?,
            rating,
            created_at: current_timestamp(),
        })
    }
}

/// A client shown in the logo strip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub logo_url: Option<String>,
    pub created_at: i64,
}

impl Client {
    pub fn new(name: &str, logo_url: Option<String>) -> Result<Self, CommerceError> {
        Ok(Self {
            id: ClientId::generate(),
            name: required_text("name", name)?,
            logo_url: logo_url.filter(|url| !url.trim().is_empty()),
            created_at: current_timestamp(),
        })
    }
}

fn required_text(field: &str, value: &str) -> Result<String, CommerceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CommerceError::validation(field, "is required"));
    }
    Ok(value.to_string())
}
