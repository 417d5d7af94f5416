use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::review::{NewReview as DomainNewReview, Review as DomainReview};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::reviews)]
#[diesel(belongs_to(super::product::Product, foreign_key = product_id))]
pub struct Review {
    pub id: i32,
    pub product_id: i32,
    pub user_id: String,
    pub user_name: String,
    pub user_image: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview<'a> {
    pub product_id: i32,
    pub user_id: &'a str,
    pub user_name: &'a str,
    pub user_image: Option<&'a str>,
    pub rating: i32,
    pub comment: &'a str,
}

impl From<Review> for DomainReview {
    fn from(value: Review) -> Self {
        Self {
            id: value.id,
            product_id: value.product_id,
            user_id: value.user_id,
            user_name: value.user_name,
            user_image: value.user_image,
            rating: value.rating,
            comment: value.comment,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewReview> for NewReview<'a> {
    fn from(value: &'a DomainNewReview) -> Self {
        Self {
            product_id: value.product_id,
            user_id: value.user_id.as_str(),
            user_name: value.user_name.as_str(),
            user_image: value.user_image.as_deref(),
            rating: value.rating,
            comment: value.comment.as_str(),
        }
    }
}
