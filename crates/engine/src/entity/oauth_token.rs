//! OAuth token entity - authorization codes and access tokens share this table.

use crate::model::Token;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "oauth_token")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub state: String,
    #[sea_orm(column_type = "Text")]
    pub scope: String,
    pub user_or_robot_identity: String,
    pub created_at: OffsetDateTime,
    /// Lifetime in whole seconds
    pub expires_in: i64,
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

impl From<Model> for Token {
    fn from(m: Model) -> Self {
        Token {
            code: m.code,
            client_id: m.client_id,
            redirect_uri: m.redirect_uri,
            state: m.state,
            scope: m.scope,
            user_or_robot_identity: m.user_or_robot_identity,
            created_at: m.created_at,
            expires_in: Duration::seconds(m.expires_in),
        }
    }
}

impl From<&Token> for ActiveModel {
    fn from(t: &Token) -> Self {
        use sea_orm::ActiveValue::Set;
        ActiveModel {
            code: Set(t.code.clone()),
            client_id: Set(t.client_id.clone()),
            redirect_uri: Set(t.redirect_uri.clone()),
            state: Set(t.state.clone()),
            scope: Set(t.scope.clone()),
            user_or_robot_identity: Set(t.user_or_robot_identity.clone()),
            created_at: Set(t.created_at),
            expires_in: Set(t.expires_in.whole_seconds()),
        }
    }
}
