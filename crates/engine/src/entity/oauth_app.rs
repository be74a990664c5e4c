//! OAuth app entity - registered client applications.

use crate::model::{AppType, OauthApp, OwnerType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "oauth_app")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub client_id: String,
    pub name: String,
    pub redirect_uri: String,
    pub home_url: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub owner_type: OwnerType,
    pub owner_id: i64,
    pub app_type: AppType,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::oauth_client_secret::Entity")]
    ClientSecret,
    #[sea_orm(has_many = "super::oauth_token::Entity")]
    Token,
}

impl Related<super::oauth_client_secret::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientSecret.def()
    }
}

impl Related<super::oauth_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Token.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for OauthApp {
    fn from(m: Model) -> Self {
        OauthApp {
            client_id: m.client_id,
            name: m.name,
            redirect_uri: m.redirect_uri,
            home_url: m.home_url,
            desc: m.description,
            owner_type: m.owner_type,
            owner_id: m.owner_id,
            app_type: m.app_type,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
