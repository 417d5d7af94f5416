use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Lifecycle of a purchase recorded for a checkout session.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    /// The checkout session was created but not paid yet.
    #[default]
    Pending,
    /// The payment processor reported the session as paid.
    Completed,
    /// The shopper cancelled or the payment failed.
    Failed,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Failed => "failed",
        }
    }
}

impl From<&str> for PurchaseStatus {
    fn from(value: &str) -> Self {
        match value {
            "completed" => PurchaseStatus::Completed,
            "failed" => PurchaseStatus::Failed,
            _ => PurchaseStatus::Pending,
        }
    }
}

impl From<PurchaseStatus> for &'static str {
    fn from(value: PurchaseStatus) -> Self {
        value.as_str()
    }
}

/// One product bought by one user within a checkout session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Purchase {
    pub id: i32,
    pub user_id: String,
    /// `None` once the product has been deleted.
    pub product_id: Option<i32>,
    /// Product title captured at checkout time.
    pub product_title: String,
    /// Identifier of the payment processor's checkout session.
    pub external_session_id: String,
    /// Amount charged in the smallest currency unit.
    pub amount: i64,
    pub status: PurchaseStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to record a purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    pub user_id: String,
    pub product_id: i32,
    pub product_title: String,
    pub external_session_id: String,
    pub amount: i64,
    pub status: PurchaseStatus,
}

impl NewPurchase {
    /// Build a pending purchase for a checkout session.
    pub fn pending(
        user_id: impl Into<String>,
        product_id: i32,
        product_title: impl Into<String>,
        external_session_id: impl Into<String>,
        amount: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            product_id,
            product_title: product_title.into(),
            external_session_id: external_session_id.into(),
            amount,
            status: PurchaseStatus::Pending,
        }
    }
}

/// Short product description joined onto purchase listings.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProductSummary {
    pub id: i32,
    pub title: String,
    pub icon: String,
    pub price: i64,
    pub category: String,
}

/// Purchase row joined with the product and buyer it references.
#[derive(Debug, Serialize, Clone)]
pub struct PurchaseDetails {
    #[serde(flatten)]
    pub purchase: Purchase,
    /// `None` when the product no longer exists.
    pub product: Option<ProductSummary>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

/// Query definition used to list purchases.
#[derive(Debug, Clone, Default)]
pub struct PurchaseListQuery {
    pub user_id: Option<String>,
    pub status: Option<PurchaseStatus>,
    pub external_session_id: Option<String>,
    /// Only purchases created at or after this instant.
    pub created_since: Option<NaiveDateTime>,
    pub pagination: Option<Pagination>,
}

impl PurchaseListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn status(mut self, status: PurchaseStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.external_session_id = Some(session_id.into());
        self
    }

    pub fn created_since(mut self, since: NaiveDateTime) -> Self {
        self.created_since = Some(since);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
