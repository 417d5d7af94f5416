use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::purchase::{NewPurchase as DomainNewPurchase, Purchase as DomainPurchase};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::purchases)]
pub struct Purchase {
    pub id: i32,
    pub user_id: String,
    pub product_id: Option<i32>,
    pub product_title: String,
    pub external_session_id: String,
    pub amount: i64,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::purchases)]
pub struct NewPurchase<'a> {
    pub user_id: &'a str,
    pub product_id: Option<i32>,
    pub product_title: &'a str,
    pub external_session_id: &'a str,
    pub amount: i64,
    pub status: &'a str,
}

impl From<Purchase> for DomainPurchase {
    fn from(value: Purchase) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            product_id: value.product_id,
            product_title: value.product_title,
            external_session_id: value.external_session_id,
            amount: value.amount,
            status: value.status.as_str().into(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewPurchase> for NewPurchase<'a> {
    fn from(value: &'a DomainNewPurchase) -> Self {
        Self {
            user_id: value.user_id.as_str(),
            product_id: Some(value.product_id),
            product_title: value.product_title.as_str(),
            external_session_id: value.external_session_id.as_str(),
            amount: value.amount,
            status: value.status.into(),
        }
    }
}
