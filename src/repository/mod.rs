use std::collections::HashMap;

use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::pagination::Pagination;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::{
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    purchase::{NewPurchase, Purchase, PurchaseDetails, PurchaseListQuery, PurchaseStatus},
    review::{NewReview, Review, ReviewWithProduct},
    user::{NewUser, User, UserListQuery},
};

pub mod product;
pub mod purchase;
pub mod review;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Escape character used in `LIKE` patterns.
pub(crate) const LIKE_ESCAPE: char = '\\';

/// `LIKE` pattern matching `term` anywhere. `%`, `_` and the escape
/// character in the term match literally. SQLite folds case for ASCII
/// letters only.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.trim().chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// `OFFSET` and `LIMIT` of a page. Pages past the end saturate instead of
/// overflowing.
pub(crate) fn page_bounds(pagination: &Pagination) -> (i64, i64) {
    let offset = (pagination.page.max(1) - 1).saturating_mul(pagination.per_page);
    (
        i64::try_from(offset).unwrap_or(i64::MAX),
        i64::try_from(pagination.per_page).unwrap_or(i64::MAX),
    )
}

/// Read-only operations over catalog products.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Distinct categories of active products, sorted by name.
    fn list_categories(&self) -> RepositoryResult<Vec<String>>;
}

/// Write operations over catalog products.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over product reviews.
pub trait ReviewReader {
    /// Reviews of a product, newest first.
    fn list_reviews_by_product(&self, product_id: i32) -> RepositoryResult<Vec<Review>>;
    /// Reviews written by a user, newest first.
    fn list_reviews_by_user(&self, user_id: &str) -> RepositoryResult<Vec<ReviewWithProduct>>;
    fn get_review_by_user(&self, user_id: &str, product_id: i32)
    -> RepositoryResult<Option<Review>>;
    /// Every rating given to a product.
    fn list_ratings(&self, product_id: i32) -> RepositoryResult<Vec<i32>>;
}

/// Write operations over product reviews.
pub trait ReviewWriter {
    fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
}

/// Read-only operations over users.
pub trait UserReader {
    fn get_user_by_id(&self, id: &str) -> RepositoryResult<Option<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Write operations over users.
pub trait UserWriter {
    /// Insert the user or refresh name, email and image of an existing one.
    fn upsert_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

/// Read-only operations over purchases.
pub trait PurchaseReader {
    fn list_purchases(
        &self,
        query: PurchaseListQuery,
    ) -> RepositoryResult<(usize, Vec<PurchaseDetails>)>;
    /// Sum of amounts matching the query filters. Pagination is ignored.
    fn sum_purchase_amounts(&self, query: PurchaseListQuery) -> RepositoryResult<i64>;
    fn has_completed_purchase(&self, user_id: &str, product_id: i32) -> RepositoryResult<bool>;
    fn count_purchases_by_product(&self, product_ids: &[i32])
    -> RepositoryResult<HashMap<i32, usize>>;
    fn count_purchases_by_user(
        &self,
        user_ids: &[String],
    ) -> RepositoryResult<HashMap<String, usize>>;
}

/// Write operations over purchases.
pub trait PurchaseWriter {
    fn create_purchase(&self, new_purchase: &NewPurchase) -> RepositoryResult<Purchase>;
    /// Set the status of every purchase of a checkout session. Returns the
    /// number of updated rows.
    fn update_purchase_status(
        &self,
        external_session_id: &str,
        status: PurchaseStatus,
    ) -> RepositoryResult<usize>;
}
