use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::purchase::{
        NewPurchase as DomainNewPurchase, ProductSummary, Purchase as DomainPurchase,
        PurchaseDetails, PurchaseListQuery, PurchaseStatus,
    },
    models::purchase::{NewPurchase as DbNewPurchase, Purchase as DbPurchase},
    repository::{DieselRepository, PurchaseReader, PurchaseWriter, page_bounds},
    schema::purchases,
};

impl PurchaseReader for DieselRepository {
    fn list_purchases(
        &self,
        query: PurchaseListQuery,
    ) -> RepositoryResult<(usize, Vec<PurchaseDetails>)> {
        use crate::schema::{products, users};

        let mut conn = self.conn()?;

        let total = filtered_purchases(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_purchases(&query)
            .order((purchases::created_at.desc(), purchases::id.desc()));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination);
            items = items.offset(offset).limit(limit);
        }

        let db_purchases = items.load::<DbPurchase>(&mut conn)?;
        if db_purchases.is_empty() {
            return Ok((total, Vec::new()));
        }

        let product_ids: Vec<i32> = db_purchases
            .iter()
            .filter_map(|purchase| purchase.product_id)
            .collect();
        let user_ids: Vec<&str> = db_purchases
            .iter()
            .map(|purchase| purchase.user_id.as_str())
            .collect();

        let product_rows = products::table
            .filter(products::id.eq_any(&product_ids))
            .select((
                products::id,
                products::title,
                products::icon,
                products::price,
                products::category,
            ))
            .load::<(i32, String, String, i64, String)>(&mut conn)?;

        let products_by_id: HashMap<i32, ProductSummary> = product_rows
            .into_iter()
            .map(|(id, title, icon, price, category)| {
                (
                    id,
                    ProductSummary {
                        id,
                        title,
                        icon,
                        price,
                        category,
                    },
                )
            })
            .collect();

        let user_rows = users::table
            .filter(users::id.eq_any(&user_ids))
            .select((users::id, users::name, users::email))
            .load::<(String, String, String)>(&mut conn)?;

        let users_by_id: HashMap<String, (String, String)> = user_rows
            .into_iter()
            .map(|(id, name, email)| (id, (name, email)))
            .collect();

        let details = db_purchases
            .into_iter()
            .map(|purchase| {
                let product = purchase
                    .product_id
                    .and_then(|id| products_by_id.get(&id).cloned());
                let user = users_by_id.get(&purchase.user_id).cloned();
                PurchaseDetails {
                    purchase: purchase.into(),
                    product,
                    user_name: user.as_ref().map(|(name, _)| name.clone()),
                    user_email: user.map(|(_, email)| email),
                }
            })
            .collect();

        Ok((total, details))
    }

    fn sum_purchase_amounts(&self, query: PurchaseListQuery) -> RepositoryResult<i64> {
        let mut conn = self.conn()?;

        let amounts = filtered_purchases(&query)
            .select(purchases::amount)
            .load::<i64>(&mut conn)?;

        Ok(amounts.into_iter().sum())
    }

    fn has_completed_purchase(&self, user_id: &str, product_id: i32) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;

        let found = purchases::table
            .filter(purchases::user_id.eq(user_id))
            .filter(purchases::product_id.eq(product_id))
            .filter(purchases::status.eq(PurchaseStatus::Completed.as_str()))
            .select(purchases::id)
            .first::<i32>(&mut conn)
            .optional()?;

        Ok(found.is_some())
    }

    fn count_purchases_by_product(
        &self,
        product_ids: &[i32],
    ) -> RepositoryResult<HashMap<i32, usize>> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.conn()?;

        let rows = purchases::table
            .filter(purchases::product_id.eq_any(product_ids))
            .select(purchases::product_id)
            .load::<Option<i32>>(&mut conn)?;

        let mut counts: HashMap<i32, usize> = HashMap::new();
        for product_id in rows.into_iter().flatten() {
            *counts.entry(product_id).or_default() += 1;
        }

        Ok(counts)
    }

    fn count_purchases_by_user(
        &self,
        user_ids: &[String],
    ) -> RepositoryResult<HashMap<String, usize>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.conn()?;

        let rows = purchases::table
            .filter(purchases::user_id.eq_any(user_ids))
            .select(purchases::user_id)
            .load::<String>(&mut conn)?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for user_id in rows {
            *counts.entry(user_id).or_default() += 1;
        }

        Ok(counts)
    }
}

impl PurchaseWriter for DieselRepository {
    fn create_purchase(&self, new_purchase: &DomainNewPurchase) -> RepositoryResult<DomainPurchase> {
        let mut conn = self.conn()?;
        let db_new = DbNewPurchase::from(new_purchase);

        let created = diesel::insert_into(purchases::table)
            .values(&db_new)
            .get_result::<DbPurchase>(&mut conn)?;

        Ok(created.into())
    }

    fn update_purchase_status(
        &self,
        external_session_id: &str,
        status: PurchaseStatus,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let target =
            purchases::table.filter(purchases::external_session_id.eq(external_session_id));

        let updated = diesel::update(target)
            .set((
                purchases::status.eq(status.as_str()),
                purchases::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(updated)
    }
}

fn filtered_purchases(query: &PurchaseListQuery) -> purchases::BoxedQuery<'static, Sqlite> {
    let mut items = purchases::table.into_boxed::<Sqlite>();

    if let Some(user_id) = query.user_id.as_ref() {
        items = items.filter(purchases::user_id.eq(user_id.clone()));
    }

    if let Some(status) = query.status {
        items = items.filter(purchases::status.eq(status.as_str()));
    }

    if let Some(session_id) = query.external_session_id.as_ref() {
        items = items.filter(purchases::external_session_id.eq(session_id.clone()));
    }

    if let Some(since) = query.created_since {
        items = items.filter(purchases::created_at.ge(since));
    }

    items
}
