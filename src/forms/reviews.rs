use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::review::{MAX_RATING, MIN_COMMENT_LEN, MIN_RATING, NewReview};
use crate::forms::sanitize_multiline_text;

const COMMENT_MAX_LEN: u64 = 2000;

pub type ReviewFormResult<T> = Result<T, ReviewFormError>;

#[derive(Debug, Error)]
pub enum ReviewFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("please choose a rating between {MIN_RATING} and {MAX_RATING}")]
    InvalidRating,
    #[error("the comment must be at least {MIN_COMMENT_LEN} characters long")]
    CommentTooShort,
}

/// Payload of the review form on the product page.
#[derive(Debug, Deserialize, Validate)]
pub struct AddReviewForm {
    /// Star rating. Zero means no star was selected.
    #[serde(default)]
    pub rating: i32,
    #[validate(length(max = COMMENT_MAX_LEN))]
    pub comment: String,
}

impl AddReviewForm {
    /// Validate the payload and attach the author taken from the session.
    pub fn into_new_review(
        self,
        product_id: i32,
        user: &AuthenticatedUser,
    ) -> ReviewFormResult<NewReview> {
        self.validate()?;

        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ReviewFormError::InvalidRating);
        }

        let comment = sanitize_multiline_text(&self.comment);
        if comment.chars().count() < MIN_COMMENT_LEN {
            return Err(ReviewFormError::CommentTooShort);
        }

        let user_name = if user.name.trim().is_empty() {
            "Anonymous".to_string()
        } else {
            user.name.trim().to_string()
        };

        Ok(NewReview {
            product_id,
            user_id: user.sub.clone(),
            user_name,
            user_image: None,
            rating: self.rating,
            comment,
        })
    }
}
