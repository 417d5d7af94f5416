use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::product::Product;

/// Session key under which the cart is stored.
pub const CART_SESSION_KEY: &str = "cart";

/// Most lines a cart may hold. Keeps the cookie session well below its size
/// limit.
pub const MAX_CART_ITEMS: usize = 10;

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("«{title}» is already in your cart")]
    AlreadyInCart { title: String },
    #[error("your cart is full, check out or remove something first")]
    Full,
    #[error("product is not in the cart")]
    NotInCart,
}

/// Line of the shopping cart. Only the product reference is kept; titles and
/// prices are read from the catalog whenever the cart is shown or paid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: i32,
    pub quantity: u32,
}

/// Shopping cart kept in the cookie session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, product_id: i32) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    /// Add a product with quantity one. Adding a product twice is rejected.
    pub fn add(&mut self, product: &Product) -> Result<(), CartError> {
        if self.contains(product.id) {
            return Err(CartError::AlreadyInCart {
                title: product.title.clone(),
            });
        }
        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CartError::Full);
        }

        self.items.push(CartItem {
            product_id: product.id,
            quantity: 1,
        });
        Ok(())
    }

    pub fn remove(&mut self, product_id: i32) -> Result<CartItem, CartError> {
        let position = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)
            .ok_or(CartError::NotInCart)?;
        Ok(self.items.remove(position))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn product_ids(&self) -> Vec<i32> {
        self.items.iter().map(|item| item.product_id).collect()
    }
}
