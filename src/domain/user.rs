use chrono::NaiveDateTime;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// A shopper known to the store. The identifier is the SSO subject.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload used to insert or refresh a user record.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
}

impl NewUser {
    #[must_use]
    pub fn new(id: impl Into<String>, email: &str, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.trim().to_lowercase(),
            name: name.into(),
            image: None,
        }
    }

    /// Attach an avatar URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

impl From<&AuthenticatedUser> for NewUser {
    fn from(value: &AuthenticatedUser) -> Self {
        NewUser::new(value.sub.clone(), &value.email, value.name.clone())
    }
}

/// Query definition used to list users in the back-office.
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    /// Optional search term applied to name and email.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
