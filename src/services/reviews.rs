use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::product::{Product, ProductRating, UpdateProduct};
use crate::domain::review::Review;
use crate::domain::user::NewUser;
use crate::forms::reviews::AddReviewForm;
use crate::repository::{
    ProductReader, ProductWriter, PurchaseReader, ReviewReader, ReviewWriter, UserWriter,
};
use crate::services::{ServiceError, ServiceResult};

/// Reviews of a product, newest first.
pub fn get_reviews_by_product_id<R>(repo: &R, product_id: i32) -> ServiceResult<Vec<Review>>
where
    R: ReviewReader + ?Sized,
{
    Ok(repo.list_reviews_by_product(product_id)?)
}

/// Only buyers with a completed purchase may review.
pub fn can_user_review<R>(repo: &R, user_id: &str, product_id: i32) -> ServiceResult<bool>
where
    R: PurchaseReader + ?Sized,
{
    Ok(repo.has_completed_purchase(user_id, product_id)?)
}

pub fn has_user_reviewed<R>(repo: &R, user_id: &str, product_id: i32) -> ServiceResult<bool>
where
    R: ReviewReader + ?Sized,
{
    Ok(repo.get_review_by_user(user_id, product_id)?.is_some())
}

/// Post a review for a purchased product and refresh the product rating.
///
/// The rating refresh is best effort: a failure there is logged and the
/// stored review is still returned.
pub fn add_review<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: AddReviewForm,
) -> ServiceResult<Review>
where
    R: ProductReader
        + ProductWriter
        + ReviewReader
        + ReviewWriter
        + PurchaseReader
        + UserWriter
        + ?Sized,
{
    let new_review = form
        .into_new_review(product_id, user)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.get_product_by_id(product_id)?
        .filter(|product| product.is_active)
        .ok_or(ServiceError::NotFound)?;

    if !can_user_review(repo, &user.sub, product_id)? {
        return Err(ServiceError::Form(
            "Only buyers of this product can review it.".to_string(),
        ));
    }

    if has_user_reviewed(repo, &user.sub, product_id)? {
        return Err(ServiceError::Conflict);
    }

    repo.upsert_user(&NewUser::from(user))?;

    let review = repo.create_review(&new_review)?;

    if let Err(err) = update_product_rating(repo, product_id) {
        log::warn!("Failed to refresh rating of product {product_id}: {err}");
    }

    Ok(review)
}

/// Recompute average rating and review count. Returns `None` when the
/// product has no reviews and was left untouched.
pub fn update_product_rating<R>(repo: &R, product_id: i32) -> ServiceResult<Option<Product>>
where
    R: ReviewReader + ProductWriter + ?Sized,
{
    let ratings = repo.list_ratings(product_id)?;

    let Some(rating) = ProductRating::from_ratings(&ratings) else {
        return Ok(None);
    };

    let product = repo.update_product(product_id, &UpdateProduct::new().rating(rating))?;
    Ok(Some(product))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushkind_common::repository::errors::RepositoryError;

    use crate::services::test_support::{
        FakeRepo, sample_product, sample_review, sample_user, user_with_roles,
    };

    fn form(rating: i32, comment: &str) -> AddReviewForm {
        AddReviewForm {
            rating,
            comment: comment.to_string(),
        }
    }

    fn buyer_repo() -> FakeRepo {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|id| Ok(Some(sample_product(id, "Logo maker", 1200))));
        repo.purchase_reader
            .expect_has_completed_purchase()
            .returning(|_, _| Ok(true));
        repo
    }

    #[test]
    fn add_review_stores_review_and_refreshes_rating() {
        let mut repo = buyer_repo();
        repo.review_reader
            .expect_get_review_by_user()
            .returning(|_, _| Ok(None));
        repo.user_writer
            .expect_upsert_user()
            .times(1)
            .withf(|user| user.id == "user-1" && user.email == "buyer@example.com")
            .returning(|user| Ok(sample_user(&user.id)));
        repo.review_writer
            .expect_create_review()
            .times(1)
            .withf(|review| review.rating == 4 && review.comment == "Great results every time")
            .returning(|review| Ok(sample_review(10, review.product_id, review.rating)));
        repo.review_reader
            .expect_list_ratings()
            .returning(|_| Ok(vec![4, 5, 5]));
        repo.product_writer
            .expect_update_product()
            .times(1)
            .withf(|product_id, updates| {
                let rating = updates.rating.expect("rating update");
                *product_id == 7 && rating.rating == 4.7 && rating.review_count == 3
            })
            .returning(|id, _| Ok(sample_product(id, "Logo maker", 1200)));

        let user = user_with_roles(&[]);
        let review = add_review(&repo, &user, 7, form(4, "  Great results every time ")).unwrap();

        assert_eq!(review.id, 10);
    }

    #[test]
    fn add_review_requires_completed_purchase() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|id| Ok(Some(sample_product(id, "Logo maker", 1200))));
        repo.purchase_reader
            .expect_has_completed_purchase()
            .returning(|_, _| Ok(false));
        repo.review_writer.expect_create_review().never();

        let user = user_with_roles(&[]);
        let result = add_review(&repo, &user, 7, form(5, "Looks very promising"));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn add_review_rejects_second_review() {
        let mut repo = buyer_repo();
        repo.review_reader
            .expect_get_review_by_user()
            .returning(|_, product_id| Ok(Some(sample_review(1, product_id, 3))));
        repo.review_writer.expect_create_review().never();

        let user = user_with_roles(&[]);
        let result = add_review(&repo, &user, 7, form(5, "Changed my mind, great"));

        assert!(matches!(result, Err(ServiceError::Conflict)));
    }

    #[test]
    fn add_review_validates_before_touching_repository() {
        let repo = FakeRepo::new();
        let user = user_with_roles(&[]);

        let result = add_review(&repo, &user, 7, form(6, "Out of range rating"));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn rating_failure_does_not_fail_review() {
        let mut repo = buyer_repo();
        repo.review_reader
            .expect_get_review_by_user()
            .returning(|_, _| Ok(None));
        repo.user_writer
            .expect_upsert_user()
            .returning(|user| Ok(sample_user(&user.id)));
        repo.review_writer
            .expect_create_review()
            .returning(|review| Ok(sample_review(11, review.product_id, review.rating)));
        repo.review_reader
            .expect_list_ratings()
            .returning(|_| Err(RepositoryError::NotFound));

        let user = user_with_roles(&[]);
        let result = add_review(&repo, &user, 7, form(5, "Saved me many hours"));

        assert!(result.is_ok());
    }

    #[test]
    fn update_rating_without_reviews_is_noop() {
        let mut repo = FakeRepo::new();
        repo.review_reader
            .expect_list_ratings()
            .returning(|_| Ok(vec![]));
        repo.product_writer.expect_update_product().never();

        assert!(update_product_rating(&repo, 3).unwrap().is_none());
    }
}
