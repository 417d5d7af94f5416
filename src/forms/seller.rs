use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::DEFAULT_ICON;
use crate::domain::seller::{SELLER_CATEGORIES, SELLER_ICONS, SellerDraft};
use crate::domain::session::{MAX_DRAFT_STORED_LEN, stored_len};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

const TITLE_MAX_LEN: u64 = 128;
const DESCRIPTION_MAX_LEN: u64 = 1000;
const TAG_MAX_LEN: usize = 32;
const MAX_TAGS: usize = 10;

pub type SellerFormResult<T> = Result<T, SellerFormError>;

#[derive(Debug, Error)]
pub enum SellerFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("the listing is too long, shorten the description or tags")]
    TooLarge,
    #[error("failed to read the form: {0}")]
    Decode(#[from] serde_html_form::de::Error),
}

/// First step of the listing wizard.
#[derive(Debug, Deserialize, Validate)]
pub struct SellerBasicForm {
    #[validate(length(max = TITLE_MAX_LEN))]
    #[serde(default)]
    pub title: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Raw price input; anything unparsable counts as zero.
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub icon: String,
}

impl SellerBasicForm {
    /// Copy the sanitized input into the draft. Incomplete input is kept so
    /// the user can fix it; completeness is checked when advancing.
    pub fn apply_to(self, draft: &mut SellerDraft) -> SellerFormResult<()> {
        self.validate()?;

        let category = self.category.trim();
        if !category.is_empty() && !SELLER_CATEGORIES.contains(&category) {
            return Err(SellerFormError::UnknownCategory(category.to_string()));
        }

        let mut updated = draft.clone();
        updated.title = sanitize_inline_text(&self.title);
        updated.description = sanitize_multiline_text(&self.description);
        updated.category = category.to_string();
        updated.price = self.price.trim().parse::<i64>().unwrap_or(0).max(0);
        updated.icon = if SELLER_ICONS.contains(&self.icon.as_str()) {
            self.icon
        } else {
            DEFAULT_ICON.to_string()
        };

        replace_draft(draft, updated)
    }
}

/// The draft lives in the cookie session, so anything beyond the stored size
/// budget is rejected and the previous draft is kept.
fn replace_draft(draft: &mut SellerDraft, updated: SellerDraft) -> SellerFormResult<()> {
    if stored_len(&updated) > MAX_DRAFT_STORED_LEN {
        return Err(SellerFormError::TooLarge);
    }
    *draft = updated;
    Ok(())
}

/// Second step of the listing wizard. Tags arrive as repeated `tags`
/// fields, so the body is decoded with `serde_html_form`.
#[derive(Debug, Default, Deserialize)]
pub struct SellerDetailsForm {
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SellerDetailsForm {
    pub fn from_body(body: &[u8]) -> SellerFormResult<Self> {
        Ok(serde_html_form::from_bytes(body)?)
    }

    pub fn apply_to(self, draft: &mut SellerDraft) -> SellerFormResult<()> {
        let mut updated = draft.clone();
        updated.tags = normalize_tags(&self.tags);
        replace_draft(draft, updated)
    }
}

/// Trim, collapse whitespace, drop empties and duplicates (case-insensitive),
/// and cap both tag length and count.
fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    for value in raw.iter().flat_map(|value| value.split(',')) {
        let tag: String = sanitize_inline_text(value).chars().take(TAG_MAX_LEN).collect();
        if tag.is_empty() {
            continue;
        }
        if tags.iter().any(|existing| existing.eq_ignore_ascii_case(&tag)) {
            continue;
        }
        tags.push(tag);
        if tags.len() == MAX_TAGS {
            break;
        }
    }

    tags
}
