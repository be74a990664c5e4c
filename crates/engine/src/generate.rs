//! Code-generation strategies for authorization codes and access tokens.
//!
//! The engine asks an [`AuthorizationCodeGenerate`] for authorization codes and
//! the caller hands an [`AccessTokenCodeGenerate`] to each exchange, so the two
//! formats can be swapped independently. Generators must be collision
//! resistant; uniqueness itself is enforced by the token store.

use crate::error::{OAuthError, Result};
use crate::model::{RequestContext, Token};
use base64::Engine;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Snapshot of the token being minted plus the request that asked for it.
#[derive(Clone, Debug)]
pub struct CodeGenerateInfo {
    pub token: Token,
    pub request: RequestContext,
}

pub trait AuthorizationCodeGenerate: Send + Sync {
    fn gen_code(&self, info: &CodeGenerateInfo) -> Result<String>;
}

pub trait AccessTokenCodeGenerate: Send + Sync {
    fn get_code(&self, info: &CodeGenerateInfo) -> Result<String>;
}

/// Generate a URL-safe random token from 32 bytes of OS randomness.
pub fn random_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes)
        .map_err(|e| OAuthError::CodeGeneration(format!("OS randomness unavailable: {e}")))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Opaque random codes, usable for both roles.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomCodeGenerate;

impl AuthorizationCodeGenerate for RandomCodeGenerate {
    fn gen_code(&self, _info: &CodeGenerateInfo) -> Result<String> {
        random_token()
    }
}

impl AccessTokenCodeGenerate for RandomCodeGenerate {
    fn get_code(&self, _info: &CodeGenerateInfo) -> Result<String> {
        random_token()
    }
}

/// Claims carried by a self-describing access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User or robot identity the token acts for
    pub sub: String,
    pub client_id: String,
    pub scope: String,
    pub iat: i64,
    pub exp: i64,
    /// Random per-token id; keeps two tokens minted in the same second distinct
    pub jti: String,
}

/// HS256-signed JWT access tokens.
#[derive(Clone)]
pub struct JwtAccessTokenGenerate {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtAccessTokenGenerate {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Verify the signature and expiry of a token minted by this generator.
    pub fn decode(&self, token: &str) -> jsonwebtoken::errors::Result<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
    }
}

impl AccessTokenCodeGenerate for JwtAccessTokenGenerate {
    fn get_code(&self, info: &CodeGenerateInfo) -> Result<String> {
        let token = &info.token;
        let exp = token.expires_at().ok_or_else(|| {
            OAuthError::CodeGeneration("access token lifetime out of range".into())
        })?;
        let claims = AccessTokenClaims {
            sub: token.user_or_robot_identity.clone(),
            client_id: token.client_id.clone(),
            scope: token.scope.clone(),
            iat: token.created_at.unix_timestamp(),
            exp: exp.unix_timestamp(),
            jti: random_token()?,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| OAuthError::CodeGeneration(format!("JWT signing failed: {e}")))
    }
}
