use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::catalog::SAMPLE_PRODUCTS;
use crate::domain::product::{CatalogStats, NewProduct, Product, ProductListQuery};
use crate::domain::review::Review;
use crate::repository::{ProductReader, ProductWriter, PurchaseReader, ReviewReader};
use crate::services::{ServiceError, ServiceResult, last_page};

/// How many products of the same category are suggested on a product page.
const RELATED_LIMIT: usize = 3;

/// Query parameters accepted by the storefront index.
#[derive(Debug, Default, Deserialize)]
pub struct StorefrontQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the storefront index.
pub struct StorefrontPage {
    pub products: Paginated<Product>,
    pub categories: Vec<String>,
    pub stats: CatalogStats,
    pub search: Option<String>,
    pub category: Option<String>,
    /// Set when the data store failed and the built-in catalog is shown.
    pub fallback: bool,
}

/// Data required to render a product page.
pub struct ProductPage {
    pub product: Product,
    pub reviews: Vec<Review>,
    pub related: Vec<Product>,
    /// The viewer owns the product through a completed purchase.
    pub has_purchased: bool,
    pub has_reviewed: bool,
    /// Set when the data store failed and the built-in catalog is shown.
    pub fallback: bool,
}

impl ProductPage {
    /// A review form is offered to buyers who have not reviewed yet.
    pub fn can_review(&self) -> bool {
        self.has_purchased && !self.has_reviewed
    }
}

/// All active products, newest first.
pub fn get_all_products<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    let (_, products) = repo.list_products(ProductListQuery::new())?;
    Ok(products)
}

/// Active product by id. Inactive products are reported as missing.
pub fn get_product_by_id<R>(repo: &R, product_id: i32) -> ServiceResult<Option<Product>>
where
    R: ProductReader + ?Sized,
{
    let product = repo.get_product_by_id(product_id)?;
    Ok(product.filter(|product| product.is_active))
}

/// Active products of one category, newest first.
pub fn get_products_by_category<R>(repo: &R, category: &str) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    let (_, products) = repo.list_products(ProductListQuery::new().category(category))?;
    Ok(products)
}

/// Active products whose title, description or tags contain the term.
pub fn search_products<R>(repo: &R, term: &str) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    let term = term.trim();
    if term.is_empty() {
        return get_all_products(repo);
    }

    let (_, products) = repo.list_products(ProductListQuery::new().search(term))?;
    Ok(products)
}

/// Insert a product together with its tags.
pub fn create_product<R>(repo: &R, new_product: &NewProduct) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if new_product.title.trim().is_empty() {
        return Err(ServiceError::Form("Title is required.".to_string()));
    }
    if new_product.price <= 0 {
        return Err(ServiceError::Form("Price must be positive.".to_string()));
    }

    let product = repo.create_product(new_product)?;
    log::info!("Created product {} «{}»", product.id, product.title);
    Ok(product)
}

/// Load the storefront grid. Never fails: when the data store is unavailable
/// the built-in catalog is filtered and paginated instead.
pub fn load_storefront<R>(repo: &R, query: StorefrontQuery) -> StorefrontPage
where
    R: ProductReader + ?Sized,
{
    let StorefrontQuery {
        search,
        category,
        page,
    } = query;

    let search = search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());
    let category = category.filter(|category| !category.is_empty());
    let page = page.unwrap_or(1).max(1);

    match load_storefront_from_repo(repo, search.as_deref(), category.as_deref(), page) {
        Ok((products, categories, stats)) => StorefrontPage {
            products,
            categories,
            stats,
            search,
            category,
            fallback: false,
        },
        Err(err) => {
            log::error!("Failed to load the storefront, showing the sample catalog: {err}");
            let (products, categories, stats) =
                load_sample_storefront(search.as_deref(), category.as_deref(), page);
            StorefrontPage {
                products,
                categories,
                stats,
                search,
                category,
                fallback: true,
            }
        }
    }
}

fn load_storefront_from_repo<R>(
    repo: &R,
    search: Option<&str>,
    category: Option<&str>,
    page: usize,
) -> ServiceResult<(Paginated<Product>, Vec<String>, CatalogStats)>
where
    R: ProductReader + ?Sized,
{
    let page_query = |page: usize| {
        let mut list_query = ProductListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
        if let Some(term) = search {
            list_query = list_query.search(term);
        }
        if let Some(category) = category {
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

    let categories = repo.list_categories()?;
    let (_, all_products) = repo.list_products(ProductListQuery::new())?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    Ok((
        Paginated::new(products, page, total_pages),
        categories,
        CatalogStats::from_products(&all_products),
    ))
}

fn load_sample_storefront(
    search: Option<&str>,
    category: Option<&str>,
    page: usize,
) -> (Paginated<Product>, Vec<String>, CatalogStats) {
    let matching: Vec<Product> = SAMPLE_PRODUCTS
        .iter()
        .filter(|product| search.is_none_or(|term| product.matches(term)))
        .filter(|product| category.is_none_or(|category| product.category == category))
        .cloned()
        .collect();

    let mut categories: Vec<String> = SAMPLE_PRODUCTS
        .iter()
        .map(|product| product.category.clone())
        .collect();
    categories.sort();
    categories.dedup();

    let total_pages = matching.len().div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let page = page.min(last_page(matching.len(), DEFAULT_ITEMS_PER_PAGE));
    let items = matching
        .into_iter()
        .skip((page - 1).saturating_mul(DEFAULT_ITEMS_PER_PAGE))
        .take(DEFAULT_ITEMS_PER_PAGE)
        .collect();

    (
        Paginated::new(items, page, total_pages),
        categories,
        CatalogStats::from_products(&SAMPLE_PRODUCTS),
    )
}

/// Load a product page. Administrators may also open inactive listings.
pub fn load_product_page<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    product_id: i32,
) -> ServiceResult<ProductPage>
where
    R: ProductReader + ReviewReader + PurchaseReader + ?Sized,
{
    let is_admin = user.is_some_and(|user| check_role(SERVICE_ACCESS_ROLE, &user.roles));

    let product = match repo.get_product_by_id(product_id) {
        Ok(product) => product
            .filter(|product| product.is_active || is_admin)
            .ok_or(ServiceError::NotFound)?,
        Err(err) => {
            log::error!("Failed to load product {product_id}, trying the sample catalog: {err}");
            return sample_product_page(product_id).ok_or_else(|| err.into());
        }
    };

    let reviews = repo.list_reviews_by_product(product.id)?;

    let (_, same_category) = repo.list_products(
        ProductListQuery::new()
            .category(product.category.clone())
            .paginate(1, RELATED_LIMIT + 1),
    )?;
    let related = same_category
        .into_iter()
        .filter(|candidate| candidate.id != product.id)
        .take(RELATED_LIMIT)
        .collect();

    let (has_purchased, has_reviewed) = match user {
        Some(user) => (
            repo.has_completed_purchase(&user.sub, product.id)?,
            reviews.iter().any(|review| review.user_id == user.sub),
        ),
        None => (false, false),
    };

    Ok(ProductPage {
        product,
        reviews,
        related,
        has_purchased,
        has_reviewed,
        fallback: false,
    })
}

/// Product page built from the built-in catalog, without reviews or
/// purchase state.
fn sample_product_page(product_id: i32) -> Option<ProductPage> {
    let product = SAMPLE_PRODUCTS
        .iter()
        .find(|product| product.id == product_id)?
        .clone();

    let related = SAMPLE_PRODUCTS
        .iter()
        .filter(|candidate| candidate.category == product.category && candidate.id != product.id)
        .take(RELATED_LIMIT)
        .cloned()
        .collect();

    Some(ProductPage {
        product,
        reviews: Vec::new(),
        related,
        has_purchased: false,
        has_reviewed: false,
        fallback: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushkind_common::repository::errors::RepositoryError;
    use serde_json::Value;

    use crate::services::test_support::{
        FakeRepo, sample_product, sample_review, user_with_roles,
    };

    #[test]
    fn search_with_blank_term_lists_everything() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_list_products()
            .times(1)
            .withf(|query| query.search.is_none() && !query.include_inactive)
            .returning(|_| Ok((1, vec![sample_product(1, "Logo maker", 1200)])));

        let products = search_products(&repo, "   ").unwrap();

        assert_eq!(products.len(), 1);
    }

    #[test]
    fn search_passes_trimmed_term() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_list_products()
            .times(1)
            .withf(|query| query.search.as_deref() == Some("logo"))
            .returning(|_| Ok((0, vec![])));

        assert!(search_products(&repo, " logo ").unwrap().is_empty());
    }

    #[test]
    fn get_product_by_id_hides_inactive() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|id| {
                let mut product = sample_product(id, "Hidden", 900);
                product.is_active = false;
                Ok(Some(product))
            });

        assert!(get_product_by_id(&repo, 4).unwrap().is_none());
    }

    #[test]
    fn create_product_rejects_zero_price() {
        let repo = FakeRepo::new();
        let payload = NewProduct::new("Logo maker", "Makes logos", 0, "Design", "Studio");

        assert!(matches!(
            create_product(&repo, &payload),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn storefront_applies_filters_and_pagination() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_list_products()
            .times(1)
            .withf(|query| query.pagination.is_some())
            .returning(|query| {
                assert_eq!(query.search.as_deref(), Some("logo"));
                assert_eq!(query.category.as_deref(), Some("Design"));
                let pagination = query.pagination.as_ref().map(|p| (p.page, p.per_page));
                assert_eq!(pagination, Some((2, DEFAULT_ITEMS_PER_PAGE)));
                Ok((DEFAULT_ITEMS_PER_PAGE + 1, vec![sample_product(9, "Logo", 500)]))
            });
        repo.product_reader
            .expect_list_products()
            .times(1)
            .withf(|query| query.pagination.is_none())
            .returning(|_| {
                let mut first = sample_product(1, "A", 1000);
                first.rating = 4.0;
                let mut second = sample_product(2, "B", 2000);
                second.rating = 5.0;
                Ok((2, vec![first, second]))
            });
        repo.product_reader
            .expect_list_categories()
            .returning(|| Ok(vec!["Design".to_string(), "Writing".to_string()]));

        let page = load_storefront(
            &repo,
            StorefrontQuery {
                search: Some(" logo ".to_string()),
                category: Some("Design".to_string()),
                page: Some(2),
            },
        );

        assert!(!page.fallback);
        assert_eq!(page.categories.len(), 2);
        assert_eq!(page.stats.product_count, 2);
        assert_eq!(page.stats.average_price, 1500);
        assert_eq!(page.stats.average_rating, 4.5);

        let json: Value = serde_json::to_value(&page.products).unwrap();
        assert_eq!(json["page"], 2);
        assert_eq!(json["items"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn storefront_falls_back_to_sample_catalog() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_list_products()
            .returning(|_| Err(RepositoryError::NotFound));

        let page = load_storefront(&repo, StorefrontQuery::default());

        assert!(page.fallback);
        assert!(!page.categories.is_empty());
        assert_eq!(page.stats.product_count, SAMPLE_PRODUCTS.len());
    }

    #[test]
    fn storefront_clamps_huge_page_to_the_last_one() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_list_products()
            .times(1)
            .withf(|query| query.pagination.as_ref().map(|p| p.page) == Some(usize::MAX))
            .returning(|_| Ok((DEFAULT_ITEMS_PER_PAGE + 1, vec![])));
        repo.product_reader
            .expect_list_products()
            .times(1)
            .withf(|query| query.pagination.as_ref().map(|p| p.page) == Some(2))
            .returning(|_| Ok((DEFAULT_ITEMS_PER_PAGE + 1, vec![sample_product(9, "Logo", 500)])));
        repo.product_reader
            .expect_list_products()
            .times(1)
            .withf(|query| query.pagination.is_none())
            .returning(|_| Ok((1, vec![sample_product(9, "Logo", 500)])));
        repo.product_reader
            .expect_list_categories()
            .returning(|| Ok(vec!["Design".to_string()]));

        let page = load_storefront(
            &repo,
            StorefrontQuery {
                page: Some(usize::MAX),
                ..StorefrontQuery::default()
            },
        );

        assert!(!page.fallback);
        let json: Value = serde_json::to_value(&page.products).unwrap();
        assert_eq!(json["page"], 2);
        assert_eq!(json["items"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn sample_storefront_clamps_huge_page() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_list_products()
            .returning(|_| Err(RepositoryError::NotFound));

        let page = load_storefront(
            &repo,
            StorefrontQuery {
                page: Some(usize::MAX),
                ..StorefrontQuery::default()
            },
        );

        assert!(page.fallback);
        let json: Value = serde_json::to_value(&page.products).unwrap();
        let last = last_page(SAMPLE_PRODUCTS.len(), DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(json["page"], last);
        assert!(!json["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn product_page_flags_for_buyer_without_review() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|id| Ok(Some(sample_product(id, "Logo maker", 1200))));
        repo.review_reader
            .expect_list_reviews_by_product()
            .returning(|_| Ok(vec![]));
        repo.product_reader.expect_list_products().returning(|_| {
            Ok((
                3,
                vec![
                    sample_product(1, "Logo maker", 1200),
                    sample_product(2, "Banner maker", 800),
                    sample_product(3, "Icon maker", 600),
                ],
            ))
        });
        repo.purchase_reader
            .expect_has_completed_purchase()
            .withf(|user_id, product_id| user_id == "user-1" && *product_id == 1)
            .returning(|_, _| Ok(true));

        let user = user_with_roles(&[]);
        let page = load_product_page(&repo, Some(&user), 1).unwrap();

        assert!(page.has_purchased);
        assert!(!page.has_reviewed);
        assert!(page.can_review());
        assert_eq!(
            page.related.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn product_page_detects_existing_review() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|id| Ok(Some(sample_product(id, "Logo maker", 1200))));
        repo.review_reader
            .expect_list_reviews_by_product()
            .returning(|product_id| Ok(vec![sample_review(1, product_id, 5)]));
        repo.product_reader
            .expect_list_products()
            .returning(|_| Ok((0, vec![])));
        repo.purchase_reader
            .expect_has_completed_purchase()
            .returning(|_, _| Ok(true));

        let user = user_with_roles(&[]);
        let page = load_product_page(&repo, Some(&user), 1).unwrap();

        assert!(page.has_reviewed);
        assert!(!page.can_review());
    }

    #[test]
    fn product_page_falls_back_to_sample_catalog() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|_| Err(RepositoryError::NotFound));

        let user = user_with_roles(&[]);
        let page = load_product_page(&repo, Some(&user), SAMPLE_PRODUCTS[0].id).unwrap();

        assert!(page.fallback);
        assert_eq!(page.product.title, SAMPLE_PRODUCTS[0].title);
        assert!(page.reviews.is_empty());
        assert!(!page.has_purchased);
        assert!(!page.can_review());
        assert!(
            page.related
                .iter()
                .all(|related| related.category == page.product.category
                    && related.id != page.product.id)
        );
    }

    #[test]
    fn product_page_outside_sample_catalog_reports_store_error() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|_| Err(RepositoryError::NotFound));

        let result = load_product_page(&repo, None, 9999);

        assert!(result.is_err());
    }

    #[test]
    fn inactive_product_page_is_not_found_for_customers() {
        let mut repo = FakeRepo::new();
        repo.product_reader.expect_get_product_by_id().returning(|id| {
            let mut product = sample_product(id, "Draft", 100);
            product.is_active = false;
            Ok(Some(product))
        });

        let result = load_product_page(&repo, None, 1);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
