use thiserror::Error;
use time::OffsetDateTime;

/// Coarse classification of an [`OAuthError`], stable for callers that map
/// failures onto protocol responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    RequestNotValid,
    SecretNotValid,
    CodeExpired,
    CodeGeneration,
    Storage,
}

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    App,
    Secret,
    Token,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::App => f.write_str("oauth app"),
            Resource::Secret => f.write_str("client secret"),
            Resource::Token => f.write_str("token"),
        }
    }
}

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("{resource} not found: {key}")]
    NotFound { resource: Resource, key: String },
    #[error("OAuth request not valid for client {client_id}: {reason}")]
    RequestNotValid { client_id: String, reason: String },
    #[error("No client secret matches for client {client_id}")]
    SecretNotValid { client_id: String },
    #[error("Authorization code for client {client_id} expired at {expired_at}")]
    CodeExpired {
        client_id: String,
        expired_at: OffsetDateTime,
    },
    #[error("Code generation failed: {0}")]
    CodeGeneration(String),
    #[error("Storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),
}

impl OAuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OAuthError::NotFound { .. } => ErrorKind::NotFound,
            OAuthError::RequestNotValid { .. } => ErrorKind::RequestNotValid,
            OAuthError::SecretNotValid { .. } => ErrorKind::SecretNotValid,
            OAuthError::CodeExpired { .. } => ErrorKind::CodeExpired,
            OAuthError::CodeGeneration(_) => ErrorKind::CodeGeneration,
            OAuthError::Storage(_) => ErrorKind::Storage,
        }
    }

    pub(crate) fn not_found(resource: Resource, key: impl Into<String>) -> Self {
        OAuthError::NotFound {
            resource,
            key: key.into(),
        }
    }
}

pub type Result<T, E = OAuthError> = std::result::Result<T, E>;
