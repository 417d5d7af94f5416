use crate::domain::purchase::{
    NewPurchase, Purchase, PurchaseDetails, PurchaseListQuery, PurchaseStatus,
};
use crate::repository::{PurchaseReader, PurchaseWriter};
use crate::services::ServiceResult;

pub fn create_purchase<R>(repo: &R, new_purchase: &NewPurchase) -> ServiceResult<Purchase>
where
    R: PurchaseWriter + ?Sized,
{
    Ok(repo.create_purchase(new_purchase)?)
}

/// Every purchase of a user, newest first, with a product summary.
pub fn get_purchases_by_user_id<R>(repo: &R, user_id: &str) -> ServiceResult<Vec<PurchaseDetails>>
where
    R: PurchaseReader + ?Sized,
{
    let (_, purchases) = repo.list_purchases(PurchaseListQuery::new().user_id(user_id))?;
    Ok(purchases)
}

/// Set the status of all purchases recorded for a checkout session.
pub fn update_purchase_status<R>(
    repo: &R,
    external_session_id: &str,
    status: PurchaseStatus,
) -> ServiceResult<usize>
where
    R: PurchaseWriter + ?Sized,
{
    let updated = repo.update_purchase_status(external_session_id, status)?;
    if updated == 0 {
        log::warn!("No purchases recorded for checkout session {external_session_id}");
    }
    Ok(updated)
}

/// A product can be bought again unless the user already owns it.
pub fn can_user_purchase<R>(repo: &R, user_id: &str, product_id: i32) -> ServiceResult<bool>
where
    R: PurchaseReader + ?Sized,
{
    Ok(!repo.has_completed_purchase(user_id, product_id)?)
}
