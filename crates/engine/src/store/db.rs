//! SeaORM-backed stores.

use crate::entity::{oauth_app, oauth_client_secret, oauth_token};
use crate::error::{OAuthError, Resource, Result};
use crate::model::{ClientSecret, OauthApp, OwnerType, Token};
use crate::store::{OAuthAppStore, TokenStore};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct DbOAuthAppStore {
    db: Arc<DatabaseConnection>,
}

impl DbOAuthAppStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OAuthAppStore for DbOAuthAppStore {
    async fn create_app(&self, app: OauthApp) -> Result<()> {
        let model = oauth_app::ActiveModel {
            client_id: Set(app.client_id),
            name: Set(app.name),
            redirect_uri: Set(app.redirect_uri),
            home_url: Set(app.home_url),
            description: Set(app.desc),
            owner_type: Set(app.owner_type),
            owner_id: Set(app.owner_id),
            app_type: Set(app.app_type),
            created_at: Set(app.created_at),
            updated_at: Set(app.updated_at),
        };
        oauth_app::Entity::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn get_app(&self, client_id: &str) -> Result<OauthApp> {
        oauth_app::Entity::find_by_id(client_id)
            .one(self.db.as_ref())
            .await?
            .map(OauthApp::from)
            .ok_or_else(|| OAuthError::not_found(Resource::App, client_id))
    }

    async fn update_app(&self, app: OauthApp) -> Result<()> {
        let existing = oauth_app::Entity::find_by_id(&app.client_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| OAuthError::not_found(Resource::App, &app.client_id))?;

        let mut active: oauth_app::ActiveModel = existing.into();
        active.name = Set(app.name);
        active.redirect_uri = Set(app.redirect_uri);
        active.home_url = Set(app.home_url);
        active.description = Set(app.desc);
        active.updated_at = Set(app.updated_at);
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn list_apps_by_owner(
        &self,
        owner_type: OwnerType,
        owner_id: i64,
    ) -> Result<Vec<OauthApp>> {
        let apps = oauth_app::Entity::find()
            .filter(oauth_app::Column::OwnerType.eq(owner_type))
            .filter(oauth_app::Column::OwnerId.eq(owner_id))
            .order_by_asc(oauth_app::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(apps.into_iter().map(OauthApp::from).collect())
    }

    async fn delete_app(&self, client_id: &str) -> Result<()> {
        oauth_app::Entity::delete_by_id(client_id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn create_secret(&self, secret: ClientSecret) -> Result<ClientSecret> {
        let model = oauth_client_secret::ActiveModel {
            id: NotSet,
            client_id: Set(secret.client_id),
            client_secret: Set(secret.client_secret),
            created_at: Set(secret.created_at),
            created_by: Set(secret.created_by),
        };
        let stored = model.insert(self.db.as_ref()).await?;
        Ok(stored.into())
    }

    async fn delete_secret(&self, client_id: &str, secret_id: i64) -> Result<()> {
        let result = oauth_client_secret::Entity::delete_many()
            .filter(oauth_client_secret::Column::Id.eq(secret_id))
            .filter(oauth_client_secret::Column::ClientId.eq(client_id))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(OAuthError::not_found(
                Resource::Secret,
                format!("{client_id}/{secret_id}"),
            ));
        }
        Ok(())
    }

    async fn delete_secret_by_client_id(&self, client_id: &str) -> Result<()> {
        oauth_client_secret::Entity::delete_many()
            .filter(oauth_client_secret::Column::ClientId.eq(client_id))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn list_secret(&self, client_id: &str) -> Result<Vec<ClientSecret>> {
        let secrets = oauth_client_secret::Entity::find()
            .filter(oauth_client_secret::Column::ClientId.eq(client_id))
            .order_by_asc(oauth_client_secret::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(secrets.into_iter().map(ClientSecret::from).collect())
    }
}

#[derive(Clone, Debug)]
pub struct DbTokenStore {
    db: Arc<DatabaseConnection>,
}

impl DbTokenStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenStore for DbTokenStore {
    async fn create(&self, token: &Token) -> Result<()> {
        oauth_token::Entity::insert(oauth_token::ActiveModel::from(token))
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn delete_by_code(&self, code: &str) -> Result<u64> {
        let result = oauth_token::Entity::delete_by_id(code)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_by_client_id(&self, client_id: &str) -> Result<u64> {
        let result = oauth_token::Entity::delete_many()
            .filter(oauth_token::Column::ClientId.eq(client_id))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }

    async fn get(&self, code: &str) -> Result<Token> {
        oauth_token::Entity::find_by_id(code)
            .one(self.db.as_ref())
            .await?
            .map(Token::from)
            .ok_or_else(|| OAuthError::not_found(Resource::Token, code))
    }
}
