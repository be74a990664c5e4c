//! Persistence contracts the engine depends on.
//!
//! Any backend satisfying [`OAuthAppStore`] and [`TokenStore`] is valid. Two
//! ship with the crate: [`db`] over SeaORM and [`memory`] over `DashMap`.
//!
//! Stores must enforce uniqueness of `client_id` and of token `code`, and
//! report lookups of absent records as [`OAuthError::NotFound`](crate::error::OAuthError::NotFound).

use crate::error::Result;
use crate::model::{ClientSecret, OauthApp, OwnerType, Token};
use async_trait::async_trait;

pub mod db;
pub mod memory;

pub use db::{DbOAuthAppStore, DbTokenStore};
pub use memory::{MemoryOAuthAppStore, MemoryTokenStore};

#[async_trait]
pub trait OAuthAppStore: Send + Sync {
    async fn create_app(&self, app: OauthApp) -> Result<()>;
    async fn get_app(&self, client_id: &str) -> Result<OauthApp>;
    /// Overwrites the mutable fields of an existing app.
    async fn update_app(&self, app: OauthApp) -> Result<()>;
    async fn list_apps_by_owner(&self, owner_type: OwnerType, owner_id: i64)
    -> Result<Vec<OauthApp>>;
    /// Deleting an absent app is not an error.
    async fn delete_app(&self, client_id: &str) -> Result<()>;

    /// Persists a secret; the store assigns `id`.
    async fn create_secret(&self, secret: ClientSecret) -> Result<ClientSecret>;
    async fn delete_secret(&self, client_id: &str, secret_id: i64) -> Result<()>;
    async fn delete_secret_by_client_id(&self, client_id: &str) -> Result<()>;
    async fn list_secret(&self, client_id: &str) -> Result<Vec<ClientSecret>>;
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn create(&self, token: &Token) -> Result<()>;
    /// Returns the number of rows removed (0 or 1).
    async fn delete_by_code(&self, code: &str) -> Result<u64>;
    /// Returns the number of rows removed.
    async fn delete_by_client_id(&self, client_id: &str) -> Result<u64>;
    async fn get(&self, code: &str) -> Result<Token>;
}
