//! In-process stores over `DashMap`.
//!
//! Suitable for tests and single-process deployments. Every operation touches
//! one shard lock at a time, so `delete_by_code` is an atomic remove and two
//! racing exchanges of the same code see exactly one successful delete.

use crate::error::{OAuthError, Resource, Result};
use crate::model::{ClientSecret, OauthApp, OwnerType, Token};
use crate::store::{OAuthAppStore, TokenStore};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sea_orm::DbErr;
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Default)]
pub struct MemoryOAuthAppStore {
    apps: DashMap<String, OauthApp>,
    secrets: DashMap<i64, ClientSecret>,
    next_secret_id: AtomicI64,
}

impl MemoryOAuthAppStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OAuthAppStore for MemoryOAuthAppStore {
    async fn create_app(&self, app: OauthApp) -> Result<()> {
        match self.apps.entry(app.client_id.clone()) {
            Entry::Occupied(_) => Err(DbErr::RecordNotInserted.into()),
            Entry::Vacant(slot) => {
                slot.insert(app);
                Ok(())
            }
        }
    }

    async fn get_app(&self, client_id: &str) -> Result<OauthApp> {
        self.apps
            .get(client_id)
            .map(|app| app.clone())
            .ok_or_else(|| OAuthError::not_found(Resource::App, client_id))
    }

    async fn update_app(&self, app: OauthApp) -> Result<()> {
        let mut stored = self
            .apps
            .get_mut(&app.client_id)
            .ok_or_else(|| OAuthError::not_found(Resource::App, &app.client_id))?;
        stored.name = app.name;
        stored.redirect_uri = app.redirect_uri;
        stored.home_url = app.home_url;
        stored.desc = app.desc;
        stored.updated_at = app.updated_at;
        Ok(())
    }

    async fn list_apps_by_owner(
        &self,
        owner_type: OwnerType,
        owner_id: i64,
    ) -> Result<Vec<OauthApp>> {
        let mut apps: Vec<OauthApp> = self
            .apps
            .iter()
            .filter(|app| app.owner_type == owner_type && app.owner_id == owner_id)
            .map(|app| app.clone())
            .collect();
        apps.sort_by_key(|app| app.created_at);
        Ok(apps)
    }

    async fn delete_app(&self, client_id: &str) -> Result<()> {
        self.apps.remove(client_id);
        Ok(())
    }

    async fn create_secret(&self, mut secret: ClientSecret) -> Result<ClientSecret> {
        secret.id = self.next_secret_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.secrets.insert(secret.id, secret.clone());
        Ok(secret)
    }

    async fn delete_secret(&self, client_id: &str, secret_id: i64) -> Result<()> {
        self.secrets
            .remove_if(&secret_id, |_, secret| secret.client_id == client_id)
            .map(|_| ())
            .ok_or_else(|| {
                OAuthError::not_found(Resource::Secret, format!("{client_id}/{secret_id}"))
            })
    }

    async fn delete_secret_by_client_id(&self, client_id: &str) -> Result<()> {
        self.secrets.retain(|_, secret| secret.client_id != client_id);
        Ok(())
    }

    async fn list_secret(&self, client_id: &str) -> Result<Vec<ClientSecret>> {
        let mut secrets: Vec<ClientSecret> = self
            .secrets
            .iter()
            .filter(|secret| secret.client_id == client_id)
            .map(|secret| secret.clone())
            .collect();
        secrets.sort_by_key(|secret| secret.id);
        Ok(secrets)
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<String, Token>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tokens (codes and access tokens) belonging to `client_id`.
    pub fn count_for_client(&self, client_id: &str) -> usize {
        self.tokens
            .iter()
            .filter(|token| token.client_id == client_id)
            .count()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn create(&self, token: &Token) -> Result<()> {
        match self.tokens.entry(token.code.clone()) {
            Entry::Occupied(_) => Err(DbErr::RecordNotInserted.into()),
            Entry::Vacant(slot) => {
                slot.insert(token.clone());
                Ok(())
            }
        }
    }

    async fn delete_by_code(&self, code: &str) -> Result<u64> {
        Ok(self.tokens.remove(code).map_or(0, |_| 1))
    }

    async fn delete_by_client_id(&self, client_id: &str) -> Result<u64> {
        let mut removed = 0;
        self.tokens.retain(|_, token| {
            let keep = token.client_id != client_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }

    async fn get(&self, code: &str) -> Result<Token> {
        self.tokens
            .get(code)
            .map(|token| token.clone())
            .ok_or_else(|| OAuthError::not_found(Resource::Token, code))
    }
}
