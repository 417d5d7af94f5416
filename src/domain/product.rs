use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Domain representation of a product listed in the storefront.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Title shown in listings.
    pub title: String,
    /// Longer description shown on the detail page.
    pub description: String,
    /// Price represented in the smallest currency unit.
    pub price: i64,
    /// Free-form category name.
    pub category: String,
    /// Tag names attached to the product.
    pub tags: Vec<String>,
    /// Emoji or short glyph used as the product icon.
    pub icon: String,
    /// Display name of the seller.
    pub creator: String,
    /// Average review rating rounded to one decimal.
    pub rating: f64,
    /// Number of reviews the rating is computed from.
    pub review_count: i32,
    /// Inactive products are hidden from the storefront.
    pub is_active: bool,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Case-insensitive match against title, description and tags.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// Payload required to insert a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub tags: Vec<String>,
    pub icon: String,
    pub creator: String,
    pub is_active: bool,
}

/// Icon used when the seller did not pick one.
pub const DEFAULT_ICON: &str = "🤖";

impl NewProduct {
    /// Build a new active product payload without tags.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        price: i64,
        category: impl Into<String>,
        creator: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            price,
            category: category.into(),
            tags: Vec::new(),
            icon: DEFAULT_ICON.to_string(),
            creator: creator.into(),
            is_active: true,
        }
    }

    /// Attach tag names to the payload.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Use a custom icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Override the initial visibility.
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Patch data applied when updating an existing product.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    /// Optional visibility toggle.
    pub is_active: Option<bool>,
    /// Optional rating recomputation result.
    pub rating: Option<ProductRating>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self {
            is_active: None,
            rating: None,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Show or hide the product in the storefront.
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Replace the aggregated rating.
    pub fn rating(mut self, rating: ProductRating) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// Aggregated review score stored on the product row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductRating {
    /// Average rating rounded to one decimal.
    pub rating: f64,
    /// Number of reviews.
    pub review_count: i32,
}

impl ProductRating {
    /// Average a list of ratings. Returns `None` when there is nothing to average.
    pub fn from_ratings(ratings: &[i32]) -> Option<Self> {
        if ratings.is_empty() {
            return None;
        }

        let sum: i64 = ratings.iter().map(|rating| i64::from(*rating)).sum();
        let average = sum as f64 / ratings.len() as f64;

        Some(Self {
            rating: (average * 10.0).round() / 10.0,
            review_count: ratings.len() as i32,
        })
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Optional search term applied to title, description and tags.
    pub search: Option<String>,
    /// Optional exact category filter.
    pub category: Option<String>,
    /// Whether inactive products should be included in the results.
    pub include_inactive: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets all active products.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Filter the results by category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Include inactive products in the results.
    pub fn include_inactive(mut self) -> Self {
        self.include_inactive = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Summary statistics shown above the storefront grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    pub product_count: usize,
    pub average_rating: f64,
    pub total_reviews: i64,
    pub average_price: i64,
}

impl CatalogStats {
    /// Compute the stats for the given products. An empty slice yields zeros.
    pub fn from_products(products: &[Product]) -> Self {
        if products.is_empty() {
            return Self::default();
        }

        let count = products.len();
        let rating_sum: f64 = products.iter().map(|product| product.rating).sum();
        let total_reviews = products
            .iter()
            .map(|product| i64::from(product.review_count))
            .sum();
        let price_sum: i64 = products.iter().map(|product| product.price).sum();

        Self {
            product_count: count,
            average_rating: (rating_sum / count as f64 * 10.0).round() / 10.0,
            total_reviews,
            average_price: (price_sum as f64 / count as f64).round() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(title: &str, tags: &[&str], rating: f64, reviews: i32, price: i64) -> Product {
        Product {
            id: 1,
            title: title.to_string(),
            description: "Proofreads business documents".to_string(),
            price,
            category: "Writing".to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            icon: DEFAULT_ICON.to_string(),
            creator: "Lab".to_string(),
            rating,
            review_count: reviews,
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn rating_is_rounded_to_one_decimal() {
        let rating = ProductRating::from_ratings(&[5, 4, 4]).expect("rating");
        assert_eq!(rating.rating, 4.3);
        assert_eq!(rating.review_count, 3);
    }

    #[test]
    fn rating_of_no_reviews_is_none() {
        assert!(ProductRating::from_ratings(&[]).is_none());
    }

    #[test]
    fn matches_checks_tags_case_insensitively() {
        let item = product("Proofreader", &["Grammar", "AI"], 0.0, 0, 100);
        assert!(item.matches("grammar"));
        assert!(item.matches("BUSINESS"));
        assert!(!item.matches("logo"));
        assert!(item.matches("   "));
    }

    #[test]
    fn catalog_stats_average_values() {
        let products = vec![
            product("A", &[], 4.8, 127, 2980),
            product("B", &[], 4.6, 89, 4500),
        ];

        let stats = CatalogStats::from_products(&products);

        assert_eq!(stats.product_count, 2);
        assert_eq!(stats.average_rating, 4.7);
        assert_eq!(stats.total_reviews, 216);
        assert_eq!(stats.average_price, 3740);
    }

    #[test]
    fn catalog_stats_of_empty_catalog_are_zero() {
        assert_eq!(CatalogStats::from_products(&[]), CatalogStats::default());
    }
}
