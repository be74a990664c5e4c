//! Domain types shared by the manager, the code generators and the stores.
//!
//! These are storage-agnostic: the SeaORM entities in [`crate::entity`] convert
//! to and from them, and the in-memory backend stores them directly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use time::{Duration, OffsetDateTime};

/// The kind of principal owning an OAuth app. Opaque to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum OwnerType {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "group")]
    Group,
}

/// Client category, distinguished by its client-ID naming convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum AppType {
    /// First-party app; client ID carries the platform prefix.
    #[sea_orm(string_value = "platform")]
    Platform,
    /// Third-party app registered directly by an owner.
    #[sea_orm(string_value = "direct")]
    Direct,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OauthApp {
    pub client_id: String,
    pub name: String,
    pub redirect_uri: String,
    pub home_url: String,
    pub desc: String,
    pub owner_type: OwnerType,
    pub owner_id: i64,
    pub app_type: AppType,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecret {
    /// Assigned by the store on creation.
    pub id: i64,
    pub client_id: String,
    pub client_secret: String,
    pub created_at: OffsetDateTime,
    pub created_by: Option<i64>,
}

/// An authorization code or an access token; the role is decided by the
/// caller and by the lifetime it was issued with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub code: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub state: String,
    pub scope: String,
    pub user_or_robot_identity: String,
    pub created_at: OffsetDateTime,
    pub expires_in: Duration,
}

impl Token {
    /// `None` when the deadline lies beyond the representable date range.
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.created_at.checked_add(self.expires_in)
    }

    /// Whether the token's own lifetime has elapsed at `now`. A deadline past
    /// the representable range never elapses.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at().is_some_and(|deadline| deadline < now)
    }
}

/// Request metadata handed to the code generators and recorded in traces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub remote_addr: Option<IpAddr>,
    pub user_agent: Option<String>,
}
