use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::review::{NewReview as DomainNewReview, Review as DomainReview, ReviewWithProduct},
    models::review::{NewReview as DbNewReview, Review as DbReview},
    repository::{DieselRepository, ReviewReader, ReviewWriter},
    schema::reviews,
};

impl ReviewReader for DieselRepository {
    fn list_reviews_by_product(&self, product_id: i32) -> RepositoryResult<Vec<DomainReview>> {
        let mut conn = self.conn()?;

        let rows = reviews::table
            .filter(reviews::product_id.eq(product_id))
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .load::<DbReview>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn list_reviews_by_user(&self, user_id: &str) -> RepositoryResult<Vec<ReviewWithProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let rows = reviews::table
            .inner_join(products::table)
            .filter(reviews::user_id.eq(user_id))
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .select((DbReview::as_select(), products::title, products::icon))
            .load::<(DbReview, String, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(review, product_title, product_icon)| ReviewWithProduct {
                review: review.into(),
                product_title,
                product_icon,
            })
            .collect())
    }

    fn get_review_by_user(
        &self,
        user_id: &str,
        product_id: i32,
    ) -> RepositoryResult<Option<DomainReview>> {
        let mut conn = self.conn()?;

        let review = reviews::table
            .filter(reviews::user_id.eq(user_id))
            .filter(reviews::product_id.eq(product_id))
            .first::<DbReview>(&mut conn)
            .optional()?;

        Ok(review.map(Into::into))
    }

    fn list_ratings(&self, product_id: i32) -> RepositoryResult<Vec<i32>> {
        let mut conn = self.conn()?;

        let ratings = reviews::table
            .filter(reviews::product_id.eq(product_id))
            .select(reviews::rating)
            .load::<i32>(&mut conn)?;

        Ok(ratings)
    }
}

impl ReviewWriter for DieselRepository {
    fn create_review(&self, new_review: &DomainNewReview) -> RepositoryResult<DomainReview> {
        let mut conn = self.conn()?;
        let db_new = DbNewReview::from(new_review);

        let created = diesel::insert_into(reviews::table)
            .values(&db_new)
            .get_result::<DbReview>(&mut conn)?;

        Ok(created.into())
    }
}
