use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lowest rating a review may carry.
pub const MIN_RATING: i32 = 1;
/// Highest rating a review may carry.
pub const MAX_RATING: i32 = 5;
/// Minimum number of characters in a review comment.
pub const MIN_COMMENT_LEN: usize = 10;

/// A customer review attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: i32,
    pub product_id: i32,
    pub user_id: String,
    /// Reviewer name captured when the review was written.
    pub user_name: String,
    /// Reviewer avatar captured when the review was written.
    pub user_image: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

/// Payload required to insert a new review.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub product_id: i32,
    pub user_id: String,
    pub user_name: String,
    pub user_image: Option<String>,
    pub rating: i32,
    pub comment: String,
}

/// A review joined with the title and icon of the reviewed product.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithProduct {
    #[serde(flatten)]
    pub review: Review,
    pub product_title: String,
    pub product_icon: String,
}
