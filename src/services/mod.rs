pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod purchases;
pub mod reviews;
pub mod seller;
pub mod users;

/// Number of the last page for `total` items, never below 1.
pub(crate) fn last_page(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

#[cfg(test)]
pub(crate) mod test_support;
