use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::admin::{DashboardStats, ProductWithStats, UserWithStats};
use crate::domain::product::{Product, ProductListQuery, UpdateProduct};
use crate::domain::purchase::{PurchaseListQuery, PurchaseStatus};
use crate::domain::user::UserListQuery;
use crate::repository::{ProductReader, ProductWriter, PurchaseReader, UserReader};
use crate::services::{ServiceError, ServiceResult, last_page};

/// Page size of the users table.
pub const USERS_PER_PAGE: usize = 20;
/// Completed purchases listed on the dashboard.
const RECENT_PURCHASES: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct AdminUsersQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminProductsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
}

pub struct AdminUsersPage {
    pub users: Paginated<UserWithStats>,
    pub search: Option<String>,
}

pub struct AdminProductsPage {
    pub products: Paginated<ProductWithStats>,
    pub categories: Vec<String>,
    pub search: Option<String>,
    pub category: Option<String>,
}

fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Midnight of the first day of the month containing `now`.
fn month_start(now: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(now)
}

/// Dashboard figures. Data-store failures are logged and reported as zeros.
pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardStats>
where
    R: UserReader + ProductReader + PurchaseReader + ?Sized,
{
    ensure_admin(user)?;

    match collect_dashboard(repo, Utc::now().naive_utc()) {
        Ok(stats) => Ok(stats),
        Err(err) => {
            log::error!("Failed to load dashboard stats: {err}");
            Ok(DashboardStats::default())
        }
    }
}

fn collect_dashboard<R>(repo: &R, now: NaiveDateTime) -> ServiceResult<DashboardStats>
where
    R: UserReader + ProductReader + PurchaseReader + ?Sized,
{
    let (total_users, _) = repo.list_users(UserListQuery::new().paginate(1, 1))?;
    let (total_products, _) = repo.list_products(ProductListQuery::new().paginate(1, 1))?;

    let completed = PurchaseListQuery::new().status(PurchaseStatus::Completed);
    let total_revenue = repo.sum_purchase_amounts(completed.clone())?;
    let monthly_revenue =
        repo.sum_purchase_amounts(completed.clone().created_since(month_start(now)))?;
    let (_, recent_purchases) = repo.list_purchases(completed.paginate(1, RECENT_PURCHASES))?;

    Ok(DashboardStats {
        total_users,
        total_products,
        total_revenue,
        monthly_revenue,
        recent_purchases,
    })
}

/// Users table with purchase counts, newest first.
pub fn load_users_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: AdminUsersQuery,
) -> ServiceResult<AdminUsersPage>
where
    R: UserReader + PurchaseReader + ?Sized,
{
    ensure_admin(user)?;

    let search = non_empty(query.search);
    let page = query.page.unwrap_or(1).max(1);

    let page_query = |page: usize| {
        let mut list_query = UserListQuery::new().paginate(page, USERS_PER_PAGE);
        if let Some(term) = search.as_ref() {
            list_query = list_query.search(term);
        }
        list_query
    };

    let (mut total, mut users) = repo.list_users(page_query(page))?;
    let last = last_page(total, USERS_PER_PAGE);
    let page = if page > last {
        (total, users) = repo.list_users(page_query(last))?;
        last
    } else {
        page
    };
    let ids: Vec<String> = users.iter().map(|user| user.id.clone()).collect();
    let counts = repo.count_purchases_by_user(&ids)?;

    let items = users
        .into_iter()
        .map(|user| {
            let purchase_count = counts.get(&user.id).copied().unwrap_or(0);
            UserWithStats {
                user,
                purchase_count,
            }
        })
        .collect();

    Ok(AdminUsersPage {
        users: Paginated::new(items, page, total.div_ceil(USERS_PER_PAGE)),
        search,
    })
}

/// Products table including inactive listings, newest first.
pub fn load_products_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: AdminProductsQuery,
) -> ServiceResult<AdminProductsPage>
where
    R: ProductReader + PurchaseReader + ?Sized,
{
    ensure_admin(user)?;

    let search = non_empty(query.search);
    let category = non_empty(query.category);
    let page = query.page.unwrap_or(1).max(1);

    let page_query = |page: usize| {
        let mut list_query = ProductListQuery::new()
            .include_inactive()
            .paginate(page, DEFAULT_ITEMS_PER_PAGE);
        if let Some(term) = search.as_ref() {
            list_query = list_query.search(term);
        }
        if let Some(category) = category.as_ref() {
            list_query = list_query.category(category);
        }
        list_query
    };

    let (mut total, mut products) = repo.list_products(page_query(page))?;
    let last = last_page(total, DEFAULT_ITEMS_PER_PAGE);
    let page = if page > last {
        (total, products) = repo.list_products(page_query(last))?;
        last
    } else {
        page
    };
    let ids: Vec<i32> = products.iter().map(|product| product.id).collect();
    let counts = repo.count_purchases_by_product(&ids)?;
    let categories = repo.list_categories()?;

    let items = products
        .into_iter()
        .map(|product| {
            let purchase_count = counts.get(&product.id).copied().unwrap_or(0);
            ProductWithStats {
                product,
                purchase_count,
            }
        })
        .collect();

    Ok(AdminProductsPage {
        products: Paginated::new(items, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        categories,
        search,
        category,
    })
}

/// Flip the active flag of a product.
pub fn toggle_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    ensure_admin(user)?;

    let product = repo
        .get_product_by_id(product_id)?
        .ok_or(ServiceError::NotFound)?;

    let updated = repo.update_product(
        product_id,
        &UpdateProduct::new().active(!product.is_active),
    )?;
    log::info!(
        "Product {product_id} set {} by {}",
        if updated.is_active { "active" } else { "inactive" },
        user.email
    );
    Ok(updated)
}

/// Remove a product. Purchases keep their title snapshot.
pub fn delete_product<R>(repo: &R, user: &AuthenticatedUser, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    ensure_admin(user)?;

    repo.delete_product(product_id)?;
    log::info!("Product {product_id} deleted by {}", user.email);
    Ok(())
}
