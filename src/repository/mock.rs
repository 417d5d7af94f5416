use std::collections::HashMap;

use mockall::mock;

use super::{
    ProductReader, ProductWriter, PurchaseReader, PurchaseWriter, ReviewReader, ReviewWriter,
    UserReader, UserWriter,
};
use crate::domain::{
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    purchase::{NewPurchase, Purchase, PurchaseDetails, PurchaseListQuery, PurchaseStatus},
    review::{NewReview, Review, ReviewWithProduct},
    user::{NewUser, User, UserListQuery},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
        fn list_categories(&self) -> RepositoryResult<Vec<String>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ReviewReader {}

    impl ReviewReader for ReviewReader {
        fn list_reviews_by_product(&self, product_id: i32) -> RepositoryResult<Vec<Review>>;
        fn list_reviews_by_user(&self, user_id: &str) -> RepositoryResult<Vec<ReviewWithProduct>>;
        fn get_review_by_user(&self, user_id: &str, product_id: i32) -> RepositoryResult<Option<Review>>;
        fn list_ratings(&self, product_id: i32) -> RepositoryResult<Vec<i32>>;
    }
}

mock! {
    pub ReviewWriter {}

    impl ReviewWriter for ReviewWriter {
        fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
    }
}

mock! {
    pub UserReader {}

    impl UserReader for UserReader {
        fn get_user_by_id(&self, id: &str) -> RepositoryResult<Option<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }
}

mock! {
    pub UserWriter {}

    impl UserWriter for UserWriter {
        fn upsert_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }
}

mock! {
    pub PurchaseReader {}

    impl PurchaseReader for PurchaseReader {
        fn list_purchases(&self, query: PurchaseListQuery) -> RepositoryResult<(usize, Vec<PurchaseDetails>)>;
        fn sum_purchase_amounts(&self, query: PurchaseListQuery) -> RepositoryResult<i64>;
        fn has_completed_purchase(&self, user_id: &str, product_id: i32) -> RepositoryResult<bool>;
        fn count_purchases_by_product(&self, product_ids: &[i32]) -> RepositoryResult<HashMap<i32, usize>>;
        fn count_purchases_by_user(&self, user_ids: &[String]) -> RepositoryResult<HashMap<String, usize>>;
    }
}

mock! {
    pub PurchaseWriter {}

    impl PurchaseWriter for PurchaseWriter {
        fn create_purchase(&self, new_purchase: &NewPurchase) -> RepositoryResult<Purchase>;
        fn update_purchase_status(&self, external_session_id: &str, status: PurchaseStatus) -> RepositoryResult<usize>;
    }
}
