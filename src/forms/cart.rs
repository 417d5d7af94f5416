use serde::Deserialize;
use validator::Validate;

/// Product reference posted by the add/remove cart buttons.
#[derive(Debug, Deserialize, Validate)]
pub struct CartItemForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
}
