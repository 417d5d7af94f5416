use serde::{Deserialize, Serialize};

use crate::domain::product::{DEFAULT_ICON, NewProduct};

/// Session key under which the seller draft is stored.
pub const SELLER_DRAFT_SESSION_KEY: &str = "seller_draft";

/// Categories a seller can choose from.
pub const SELLER_CATEGORIES: &[&str] = &[
    "Chatbot",
    "Image generation",
    "Text processing",
    "Data analysis",
    "Speech recognition",
    "Translation",
    "Code generation",
    "Other",
];

/// Icons offered on the first step of the seller form.
pub const SELLER_ICONS: &[&str] = &[
    "🤖", "💬", "🎨", "📊", "🎵", "🌐", "💻", "📝", "🔍", "⚡", "🧠", "🎯", "🚀", "💡", "🛠️", "📱",
];

/// Steps of the seller wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SellerStep {
    #[default]
    Basic,
    Details,
    Preview,
}

impl SellerStep {
    /// One-based position shown as "step N/3".
    pub fn number(&self) -> u8 {
        match self {
            SellerStep::Basic => 1,
            SellerStep::Details => 2,
            SellerStep::Preview => 3,
        }
    }
}

/// Listing being composed by a seller across the wizard steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerDraft {
    pub step: SellerStep,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: i64,
    pub icon: String,
    pub tags: Vec<String>,
}

impl Default for SellerDraft {
    fn default() -> Self {
        Self {
            step: SellerStep::Basic,
            title: String::new(),
            description: String::new(),
            category: String::new(),
            price: 0,
            icon: DEFAULT_ICON.to_string(),
            tags: Vec::new(),
        }
    }
}

impl SellerDraft {
    /// Whether the first step holds enough information to move on.
    pub fn basic_is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.category.is_empty()
            && self.price > 0
    }

    /// Move forward one step. Returns `false` and stays put when the basic
    /// step is incomplete or the draft is already on the preview step.
    pub fn advance(&mut self) -> bool {
        match self.step {
            SellerStep::Basic if self.basic_is_complete() => {
                self.step = SellerStep::Details;
                true
            }
            SellerStep::Details => {
                self.step = SellerStep::Preview;
                true
            }
            _ => false,
        }
    }

    /// Move back one step. The first step has nowhere to go.
    pub fn back(&mut self) {
        self.step = match self.step {
            SellerStep::Basic | SellerStep::Details => SellerStep::Basic,
            SellerStep::Preview => SellerStep::Details,
        };
    }

    /// Convert a finished draft into a product payload. Listings created by
    /// sellers stay hidden until an administrator activates them.
    pub fn to_new_product(&self, creator: impl Into<String>) -> NewProduct {
        NewProduct::new(
            self.title.trim(),
            self.description.trim(),
            self.price,
            self.category.clone(),
            creator,
        )
        .with_icon(self.icon.clone())
        .with_tags(self.tags.clone())
        .active(false)
    }
}
