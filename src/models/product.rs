use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub icon: String,
    pub creator: String,
    pub rating: f64,
    pub review_count: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub price: i64,
    pub category: &'a str,
    pub icon: &'a str,
    pub creator: &'a str,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct {
    pub is_active: Option<bool>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl Product {
    pub fn into_domain(self, tags: Vec<String>) -> DomainProduct {
        DomainProduct {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            category: self.category,
            tags,
            icon: self.icon,
            creator: self.creator,
            rating: self.rating,
            review_count: self.review_count,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        value.into_domain(Vec::new())
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            title: value.title.as_str(),
            description: value.description.as_str(),
            price: value.price,
            category: value.category.as_str(),
            icon: value.icon.as_str(),
            creator: value.creator.as_str(),
            is_active: value.is_active,
        }
    }
}

impl From<&DomainUpdateProduct> for UpdateProduct {
    fn from(value: &DomainUpdateProduct) -> Self {
        Self {
            is_active: value.is_active,
            rating: value.rating.map(|rating| rating.rating),
            review_count: value.rating.map(|rating| rating.review_count),
            updated_at: value.updated_at,
        }
    }
}
