//! OAuth app lifecycle.

use super::OAuthManager;
use crate::error::Result;
use crate::model::{AppType, OauthApp, OwnerType};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Deserialize;
use time::OffsetDateTime;

/// Prefix marking platform (first-party) client IDs.
pub const PLATFORM_CLIENT_ID_PREFIX: &str = "ho";
pub const BASIC_OAUTH_CLIENT_LENGTH: usize = 20;

pub(crate) fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a client ID following the naming convention of `app_type`.
pub fn gen_client_id(app_type: AppType) -> String {
    match app_type {
        AppType::Platform => format!(
            "{PLATFORM_CLIENT_ID_PREFIX}{}",
            random_alphanumeric(BASIC_OAUTH_CLIENT_LENGTH)
        ),
        AppType::Direct => random_alphanumeric(BASIC_OAUTH_CLIENT_LENGTH),
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateOAuthAppReq {
    pub name: String,
    pub redirect_uri: String,
    pub home_url: String,
    pub desc: String,
    pub owner_type: OwnerType,
    pub owner_id: i64,
    pub app_type: AppType,
}

/// Mutable app fields. Client ID, owner and app type never change.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateOAuthAppReq {
    pub name: String,
    pub redirect_uri: String,
    pub home_url: String,
    pub desc: String,
}

impl OAuthManager {
    /// Register a new client and return the record as stored.
    #[tracing::instrument(skip_all, fields(app_type = ?info.app_type, owner_id = info.owner_id))]
    pub async fn create_oauth_app(&self, info: CreateOAuthAppReq) -> Result<OauthApp> {
        let client_id = gen_client_id(info.app_type);
        let now = OffsetDateTime::now_utc();
        let app = OauthApp {
            client_id: client_id.clone(),
            name: info.name,
            redirect_uri: info.redirect_uri,
            home_url: info.home_url,
            desc: info.desc,
            owner_type: info.owner_type,
            owner_id: info.owner_id,
            app_type: info.app_type,
            created_at: now,
            updated_at: now,
        };
        self.oauth_store.create_app(app).await?;
        tracing::info!(client_id = %client_id, "created oauth app");

        self.oauth_store.get_app(&client_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_oauth_app(&self, client_id: &str) -> Result<OauthApp> {
        self.oauth_store.get_app(client_id).await
    }

    #[tracing::instrument(skip(self, info))]
    pub async fn update_oauth_app(
        &self,
        client_id: &str,
        info: UpdateOAuthAppReq,
    ) -> Result<OauthApp> {
        let mut app = self.oauth_store.get_app(client_id).await?;
        app.name = info.name;
        app.redirect_uri = info.redirect_uri;
        app.home_url = info.home_url;
        app.desc = info.desc;
        app.updated_at = OffsetDateTime::now_utc();
        self.oauth_store.update_app(app).await?;

        self.oauth_store.get_app(client_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_oauth_apps(
        &self,
        owner_type: OwnerType,
        owner_id: i64,
    ) -> Result<Vec<OauthApp>> {
        self.oauth_store
            .list_apps_by_owner(owner_type, owner_id)
            .await
    }

    /// Revoke every token, delete every secret, then delete the app.
    ///
    /// Not transactional: a failure stops the cascade with earlier steps
    /// applied. Each step is idempotent, so the whole call can be retried.
    #[tracing::instrument(skip(self))]
    pub async fn delete_oauth_app(&self, client_id: &str) -> Result<()> {
        self.revoke_all_access_token(client_id).await?;
        self.oauth_store.delete_secret_by_client_id(client_id).await?;
        self.oauth_store.delete_app(client_id).await?;
        tracing::info!("deleted oauth app");
        Ok(())
    }
}
