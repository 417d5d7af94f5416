use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::product::Product;
use crate::domain::seller::{SellerDraft, SellerStep};
use crate::forms::seller::{SellerBasicForm, SellerDetailsForm};
use crate::repository::ProductWriter;
use crate::services::{ServiceError, ServiceResult, products};

/// Store the first step and move on when it is complete. Returns whether the
/// draft advanced.
pub fn submit_basic(draft: &mut SellerDraft, form: SellerBasicForm) -> ServiceResult<bool> {
    draft.step = SellerStep::Basic;

    form.apply_to(draft)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(draft.advance())
}

/// Store the second step and move to the preview.
pub fn submit_details(draft: &mut SellerDraft, form: SellerDetailsForm) -> ServiceResult<()> {
    if draft.step != SellerStep::Details {
        return Err(ServiceError::Form(
            "Fill in the basic information first.".to_string(),
        ));
    }

    form.apply_to(draft)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    draft.advance();
    Ok(())
}

pub fn go_back(draft: &mut SellerDraft) {
    draft.back();
}

/// Create the listing from a previewed draft. The listing stays hidden
/// until an administrator activates it.
pub fn publish_listing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    draft: &SellerDraft,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if draft.step != SellerStep::Preview || !draft.basic_is_complete() {
        return Err(ServiceError::Form(
            "The listing is not ready to be published.".to_string(),
        ));
    }

    let creator = if user.name.trim().is_empty() {
        user.email.clone()
    } else {
        user.name.trim().to_string()
    };

    products::create_product(repo, &draft.to_new_product(creator))
}
