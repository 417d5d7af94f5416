use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Upper bound on distinct lines in one checkout.
const MAX_ITEMS: u64 = 50;

pub type CheckoutFormResult<T> = Result<T, CheckoutFormError>;

#[derive(Debug, Error)]
pub enum CheckoutFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("the cart is empty")]
    EmptyCart,
    #[error("product {0} is listed more than once")]
    DuplicateItem(i32),
}

/// Cart line as sent by the client. Prices are never accepted from the
/// client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CheckoutItem {
    #[validate(range(min = 1))]
    pub id: i32,
    #[validate(range(min = 1, max = 99))]
    pub quantity: u32,
}

/// JSON body of `POST /api/create-checkout-session`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[validate(length(max = MAX_ITEMS), nested)]
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    #[validate(url)]
    pub success_url: Option<String>,
    #[validate(url)]
    pub cancel_url: Option<String>,
}

impl CheckoutRequest {
    /// Validated list of ordered items.
    pub fn into_items(self) -> CheckoutFormResult<Vec<CheckoutItem>> {
        if self.items.is_empty() {
            return Err(CheckoutFormError::EmptyCart);
        }

        self.validate()?;

        let mut seen = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if seen.contains(&item.id) {
                return Err(CheckoutFormError::DuplicateItem(item.id));
            }
            seen.push(item.id);
        }

        Ok(self.items)
    }
}
