//! The OAuth manager: app lifecycle, secret lifecycle and the
//! authorization-code grant.
//!
//! One [`OAuthManager`] is built per process and cloned into every caller. It
//! holds no mutable state of its own; every durable fact lives in the stores,
//! so concurrent calls need no locking here.

use crate::config::OAuthConfig;
use crate::generate::{AuthorizationCodeGenerate, RandomCodeGenerate};
use crate::store::{DbOAuthAppStore, DbTokenStore, OAuthAppStore, TokenStore};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use time::Duration;

pub mod app;
pub mod secret;
pub mod token;

pub use app::{CreateOAuthAppReq, UpdateOAuthAppReq, gen_client_id};
pub use secret::{mask_client_secrets, mask_secret};
pub use token::{AccessTokenGenerateRequest, AuthorizeGenerateRequest};

#[derive(Clone)]
pub struct OAuthManager {
    oauth_store: Arc<dyn OAuthAppStore>,
    token_store: Arc<dyn TokenStore>,
    authorization_generate: Arc<dyn AuthorizationCodeGenerate>,
    authorize_code_expire: Duration,
    access_token_expire: Duration,
}

impl OAuthManager {
    pub fn new(
        oauth_store: Arc<dyn OAuthAppStore>,
        token_store: Arc<dyn TokenStore>,
        authorization_generate: Arc<dyn AuthorizationCodeGenerate>,
        authorize_code_expire: Duration,
        access_token_expire: Duration,
    ) -> Self {
        Self {
            oauth_store,
            token_store,
            authorization_generate,
            authorize_code_expire,
            access_token_expire,
        }
    }

    /// Database-backed manager with random authorization codes and the
    /// lifetimes from `config`.
    pub fn from_config(db: Arc<DatabaseConnection>, config: &OAuthConfig) -> Self {
        Self::new(
            Arc::new(DbOAuthAppStore::new(db.clone())),
            Arc::new(DbTokenStore::new(db)),
            Arc::new(RandomCodeGenerate),
            config.authorize_code_expire(),
            config.access_token_expire(),
        )
    }

    pub fn authorize_code_expire(&self) -> Duration {
        self.authorize_code_expire
    }

    pub fn access_token_expire(&self) -> Duration {
        self.access_token_expire
    }
}

impl std::fmt::Debug for OAuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthManager")
            .field("authorize_code_expire", &self.authorize_code_expire)
            .field("access_token_expire", &self.access_token_expire)
            .finish_non_exhaustive()
    }
}
