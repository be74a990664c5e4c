//! OAuth client secret entity - rotatable credentials, many per app.

use crate::model::ClientSecret;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "oauth_client_secret")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub client_id: String,
    pub client_secret: String,
    pub created_at: OffsetDateTime,
    pub created_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::oauth_app::Entity",
        from = "Column::ClientId",
        to = "super::oauth_app::Column::ClientId"
    )]
    App,
}

impl Related<super::oauth_app::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::App.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ClientSecret {
    fn from(m: Model) -> Self {
        ClientSecret {
            id: m.id,
            client_id: m.client_id,
            client_secret: m.client_secret,
            created_at: m.created_at,
            created_by: m.created_by,
        }
    }
}
