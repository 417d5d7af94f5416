//! Helpers for integration tests.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_common::domain::auth::AuthenticatedUser;
use tempfile::TempDir;

use storefront::domain::product::{NewProduct, Product};
use storefront::repository::{DieselRepository, ProductWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests. The file lives in a
/// temporary directory removed on drop.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory.");
        let path = dir.path().join(filename);
        let path = path.to_str().expect("Temporary path is not UTF-8.");

        let pool = establish_connection_pool(path).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb { _dir: dir, pool }
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool.clone())
    }
}

pub fn user(sub: &str, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: sub.to_string(),
        email: format!("{sub}@example.com"),
        hub_id: 1,
        name: format!("User {sub}"),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        exp: 0,
    }
}

pub fn seed_product(repo: &DieselRepository, title: &str, price: i64, category: &str) -> Product {
    repo.create_product(&NewProduct::new(
        title,
        format!("{title} description"),
        price,
        category,
        "Seller",
    ))
    .expect("create product")
}
