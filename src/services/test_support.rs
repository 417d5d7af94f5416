use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::{
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    purchase::{
        NewPurchase, Purchase, PurchaseDetails, PurchaseListQuery, PurchaseStatus,
    },
    review::{NewReview, Review, ReviewWithProduct},
    user::{NewUser, User, UserListQuery},
};
use crate::repository::mock::{
    MockProductReader, MockProductWriter, MockPurchaseReader, MockPurchaseWriter,
    MockReviewReader, MockReviewWriter, MockUserReader, MockUserWriter,
};
use crate::repository::{
    ProductReader, ProductWriter, PurchaseReader, PurchaseWriter, ReviewReader, ReviewWriter,
    UserReader, UserWriter,
};

pub(crate) fn datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 8, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

pub(crate) fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "user-1".to_string(),
        email: "buyer@example.com".to_string(),
        hub_id: 1,
        name: "Tester".to_string(),
        roles: roles.iter().map(|role| (*role).to_string()).collect(),
        exp: 0,
    }
}

pub(crate) fn sample_product(id: i32, title: &str, price: i64) -> Product {
    Product {
        id,
        title: title.to_string(),
        description: format!("{title} description"),
        price,
        category: "Design".to_string(),
        tags: vec!["ai".to_string()],
        icon: "🎨".to_string(),
        creator: "Studio".to_string(),
        rating: 0.0,
        review_count: 0,
        is_active: true,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

pub(crate) fn sample_user(id: &str) -> User {
    User {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        name: format!("User {id}"),
        image: None,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

pub(crate) fn sample_purchase(id: i32, product_id: i32, status: PurchaseStatus) -> Purchase {
    Purchase {
        id,
        user_id: "user-1".to_string(),
        product_id: Some(product_id),
        product_title: format!("Product {product_id}"),
        external_session_id: "cs_test_1".to_string(),
        amount: 1000,
        status,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

pub(crate) fn sample_review(id: i32, product_id: i32, rating: i32) -> Review {
    Review {
        id,
        product_id,
        user_id: "user-1".to_string(),
        user_name: "Tester".to_string(),
        user_image: None,
        rating,
        comment: "Really helpful tool".to_string(),
        created_at: datetime(),
    }
}

/// Repository assembled from per-trait mocks.
#[derive(Default)]
pub(crate) struct FakeRepo {
    pub product_reader: MockProductReader,
    pub product_writer: MockProductWriter,
    pub review_reader: MockReviewReader,
    pub review_writer: MockReviewWriter,
    pub user_reader: MockUserReader,
    pub user_writer: MockUserWriter,
    pub purchase_reader: MockPurchaseReader,
    pub purchase_writer: MockPurchaseWriter,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductReader for FakeRepo {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
        self.product_reader.get_product_by_id(id)
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        self.product_reader.list_products(query)
    }

    fn list_categories(&self) -> RepositoryResult<Vec<String>> {
        self.product_reader.list_categories()
    }
}

impl ProductWriter for FakeRepo {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
        self.product_writer.create_product(new_product)
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product> {
        self.product_writer.update_product(product_id, updates)
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        self.product_writer.delete_product(product_id)
    }
}

impl ReviewReader for FakeRepo {
    fn list_reviews_by_product(&self, product_id: i32) -> RepositoryResult<Vec<Review>> {
        self.review_reader.list_reviews_by_product(product_id)
    }

    fn list_reviews_by_user(&self, user_id: &str) -> RepositoryResult<Vec<ReviewWithProduct>> {
        self.review_reader.list_reviews_by_user(user_id)
    }

    fn get_review_by_user(
        &self,
        user_id: &str,
        product_id: i32,
    ) -> RepositoryResult<Option<Review>> {
        self.review_reader.get_review_by_user(user_id, product_id)
    }

    fn list_ratings(&self, product_id: i32) -> RepositoryResult<Vec<i32>> {
        self.review_reader.list_ratings(product_id)
    }
}

impl ReviewWriter for FakeRepo {
    fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review> {
        self.review_writer.create_review(new_review)
    }
}

impl UserReader for FakeRepo {
    fn get_user_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        self.user_reader.get_user_by_id(id)
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        self.user_reader.list_users(query)
    }
}

impl UserWriter for FakeRepo {
    fn upsert_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        self.user_writer.upsert_user(new_user)
    }
}

impl PurchaseReader for FakeRepo {
    fn list_purchases(
        &self,
        query: PurchaseListQuery,
    ) -> RepositoryResult<(usize, Vec<PurchaseDetails>)> {
        self.purchase_reader.list_purchases(query)
    }

    fn sum_purchase_amounts(&self, query: PurchaseListQuery) -> RepositoryResult<i64> {
        self.purchase_reader.sum_purchase_amounts(query)
    }

    fn has_completed_purchase(&self, user_id: &str, product_id: i32) -> RepositoryResult<bool> {
        self.purchase_reader
            .has_completed_purchase(user_id, product_id)
    }

    fn count_purchases_by_product(
        &self,
        product_ids: &[i32],
    ) -> RepositoryResult<HashMap<i32, usize>> {
        self.purchase_reader.count_purchases_by_product(product_ids)
    }

    fn count_purchases_by_user(
        &self,
        user_ids: &[String],
    ) -> RepositoryResult<HashMap<String, usize>> {
        self.purchase_reader.count_purchases_by_user(user_ids)
    }
}

impl PurchaseWriter for FakeRepo {
    fn create_purchase(&self, new_purchase: &NewPurchase) -> RepositoryResult<Purchase> {
        self.purchase_writer.create_purchase(new_purchase)
    }

    fn update_purchase_status(
        &self,
        external_session_id: &str,
        status: PurchaseStatus,
    ) -> RepositoryResult<usize> {
        self.purchase_writer
            .update_purchase_status(external_session_id, status)
    }
}
