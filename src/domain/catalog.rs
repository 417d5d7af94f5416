//! Built-in catalog shown when the data store cannot be reached.

use chrono::NaiveDateTime;
use lazy_static::lazy_static;

use crate::domain::product::Product;

fn sample(
    id: i32,
    title: &str,
    description: &str,
    price: i64,
    category: &str,
    icon: &str,
    rating: f64,
    review_count: i32,
    tags: &[&str],
    creator: &str,
) -> Product {
    Product {
        id,
        title: title.to_string(),
        description: description.to_string(),
        price,
        category: category.to_string(),
        tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        icon: icon.to_string(),
        creator: creator.to_string(),
        rating,
        review_count,
        is_active: true,
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

lazy_static! {
    /// Placeholder products used as a fallback listing.
    pub static ref SAMPLE_PRODUCTS: Vec<Product> = vec![
        sample(
            1,
            "AI proofreader",
            "Proofreads and polishes business documents and blog posts. Detects typos, suggests polite forms and improves readability.",
            2980,
            "Writing",
            "🧠",
            4.8,
            127,
            &["writing", "proofreading", "business", "AI"],
            "Tanaka AI Lab",
        ),
        sample(
            2,
            "Data analysis assistant",
            "Turns CSV files into charts automatically and surfaces trends and correlations in seconds.",
            4500,
            "Data analysis",
            "📊",
            4.6,
            89,
            &["data analysis", "charts", "statistics", "CSV", "automation"],
            "Data Science Inc.",
        ),
        sample(
            3,
            "Logo generator",
            "Type a company name and get professional logos in several styles, exported at high resolution.",
            1980,
            "Design",
            "🎨",
            4.9,
            203,
            &["design", "logo", "branding", "AI"],
            "Creative AI",
        ),
        sample(
            4,
            "Customer support bot",
            "Round-the-clock chatbot with FAQ answers, escalation and continuous learning.",
            3500,
            "Chatbot",
            "💬",
            4.4,
            156,
            &["chatbot", "support", "automation", "FAQ"],
            "SupportTech",
        ),
        sample(
            5,
            "Study planner",
            "Builds an optimised study schedule from goals and current level, and tracks progress.",
            2200,
            "Education",
            "📚",
            4.7,
            95,
            &["education", "study", "planning", "schedule"],
            "EduTech AI",
        ),
        sample(
            6,
            "SEO optimizer",
            "Audits a website's SEO and proposes concrete improvements, including competitor and keyword research.",
            5980,
            "Marketing",
            "🔍",
            4.5,
            74,
            &["SEO", "analysis", "marketing", "web"],
            "SEO Master",
        ),
    ];
}
