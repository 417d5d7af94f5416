use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::purchase::{PurchaseDetails, PurchaseListQuery, PurchaseStatus};
use crate::domain::review::ReviewWithProduct;
use crate::domain::user::{NewUser, User};
use crate::repository::{PurchaseReader, ReviewReader, UserReader, UserWriter};
use crate::services::ServiceResult;

/// Data required to render the account page.
pub struct AccountPage {
    pub user: Option<User>,
    pub purchases: Vec<PurchaseDetails>,
    pub reviews: Vec<ReviewWithProduct>,
    pub total_spent: i64,
}

/// Insert the signed-in user or refresh their profile.
pub fn upsert_user<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    Ok(repo.upsert_user(&NewUser::from(user))?)
}

pub fn get_user_by_id<R>(repo: &R, user_id: &str) -> ServiceResult<Option<User>>
where
    R: UserReader + ?Sized,
{
    Ok(repo.get_user_by_id(user_id)?)
}

/// Completed purchases and reviews of the signed-in user.
pub fn load_account_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<AccountPage>
where
    R: UserReader + PurchaseReader + ReviewReader + ?Sized,
{
    let stored = repo.get_user_by_id(&user.sub)?;

    let (_, purchases) = repo.list_purchases(
        PurchaseListQuery::new()
            .user_id(user.sub.clone())
            .status(PurchaseStatus::Completed),
    )?;
    let total_spent = purchases.iter().map(|details| details.purchase.amount).sum();

    let reviews = repo.list_reviews_by_user(&user.sub)?;

    Ok(AccountPage {
        user: stored,
        purchases,
        reviews,
        total_spent,
    })
}
