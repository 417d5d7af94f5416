use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;

use crate::domain::cart::{Cart, CartError, CartItem};
use crate::domain::product::Product;
use crate::repository::{ProductReader, PurchaseReader};
use crate::services::{ServiceError, ServiceResult};

/// Cart line joined with the current catalog entry.
#[derive(Debug, Serialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    pub subtotal: i64,
}

/// Cart as shown by templates.
#[derive(Debug, Default, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartLine>,
    pub count: usize,
    pub total: i64,
    /// Lines dropped because the product is gone or hidden.
    pub removed: usize,
}

/// Resolve cart lines against the catalog. Lines whose product no longer
/// exists or is hidden are dropped from `cart`.
pub fn load_cart_summary<R>(repo: &R, cart: &mut Cart) -> ServiceResult<CartSummary>
where
    R: ProductReader + ?Sized,
{
    let mut summary = CartSummary::default();
    let mut kept = Vec::with_capacity(cart.items.len());

    for item in &cart.items {
        match repo
            .get_product_by_id(item.product_id)?
            .filter(|product| product.is_active)
        {
            Some(product) => {
                let subtotal = product.price * i64::from(item.quantity);
                summary.total += subtotal;
                summary.items.push(CartLine {
                    product,
                    quantity: item.quantity,
                    subtotal,
                });
                kept.push(*item);
            }
            None => summary.removed += 1,
        }
    }

    cart.items = kept;
    summary.count = summary.items.len();
    Ok(summary)
}

/// Put an active product into the cart. Returns the product title for the
/// confirmation message.
pub fn add_to_cart<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    cart: &mut Cart,
    product_id: i32,
) -> ServiceResult<String>
where
    R: ProductReader + PurchaseReader + ?Sized,
{
    let product = repo
        .get_product_by_id(product_id)?
        .filter(|product| product.is_active)
        .ok_or(ServiceError::NotFound)?;

    let owned = match user {
        Some(user) => repo.has_completed_purchase(&user.sub, product.id)?,
        None => false,
    };
    if owned {
        return Err(ServiceError::Form(format!(
            "You already own «{}».",
            product.title
        )));
    }

    cart.add(&product)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(product.title)
}

pub fn remove_from_cart(cart: &mut Cart, product_id: i32) -> ServiceResult<CartItem> {
    cart.remove(product_id).map_err(|err| match err {
        CartError::NotInCart => ServiceError::NotFound,
        other => ServiceError::Form(other.to_string()),
    })
}
