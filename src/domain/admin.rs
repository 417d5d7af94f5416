use serde::Serialize;

use crate::domain::product::Product;
use crate::domain::purchase::PurchaseDetails;
use crate::domain::user::User;

/// Figures shown on the back-office dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_products: usize,
    /// Sum of completed purchases.
    pub total_revenue: i64,
    /// Sum of completed purchases since the first day of the current month.
    pub monthly_revenue: i64,
    pub recent_purchases: Vec<PurchaseDetails>,
}

/// User row with the number of purchases they made.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithStats {
    #[serde(flatten)]
    pub user: User,
    pub purchase_count: usize,
}

/// Product row with the number of purchases referencing it.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithStats {
    #[serde(flatten)]
    pub product: Product,
    pub purchase_count: usize,
}
