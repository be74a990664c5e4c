//! The authorization-code grant.
//!
//! An authorization code is Issued by [`OAuthManager::gen_authorize_code`] and
//! either Consumed (deleted after a successful exchange) or Expired. Expiry is
//! never swept here; it is only enforced when the code is exchanged.

use super::OAuthManager;
use crate::error::{OAuthError, Resource, Result};
use crate::generate::{AccessTokenCodeGenerate, CodeGenerateInfo};
use crate::model::{RequestContext, Token};
use subtle::ConstantTimeEq;
use time::OffsetDateTime;

#[derive(Clone, Debug, Default)]
pub struct AuthorizeGenerateRequest {
    pub client_id: String,
    pub redirect_url: String,
    pub state: String,
    pub scope: String,
    pub user_identity: String,
    pub request: RequestContext,
}

#[derive(Clone, Default)]
pub struct AccessTokenGenerateRequest {
    pub client_id: String,
    pub client_secret: String,
    /// The authorization code being exchanged
    pub code: String,
    pub redirect_url: String,
    pub state: String,
    pub request: RequestContext,
}

impl std::fmt::Debug for AccessTokenGenerateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenGenerateRequest")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("code", &"<redacted>")
            .field("redirect_url", &self.redirect_url)
            .field("state", &self.state)
            .field("request", &self.request)
            .finish()
    }
}

fn secret_matches(stored: &str, presented: &str) -> bool {
    stored.as_bytes().ct_eq(presented.as_bytes()).into()
}

impl OAuthManager {
    fn new_authorization_token(&self, req: &AuthorizeGenerateRequest) -> Result<Token> {
        let mut token = Token {
            code: String::new(),
            client_id: req.client_id.clone(),
            redirect_uri: req.redirect_url.clone(),
            state: req.state.clone(),
            scope: req.scope.clone(),
            user_or_robot_identity: req.user_identity.clone(),
            created_at: OffsetDateTime::now_utc(),
            expires_in: self.authorize_code_expire,
        };
        token.code = self.authorization_generate.gen_code(&CodeGenerateInfo {
            token: token.clone(),
            request: req.request.clone(),
        })?;
        Ok(token)
    }

    fn new_access_token(
        &self,
        authorization_code: &Token,
        req: &AccessTokenGenerateRequest,
        access_token_generate: &dyn AccessTokenCodeGenerate,
    ) -> Result<Token> {
        let mut token = Token {
            code: String::new(),
            client_id: req.client_id.clone(),
            redirect_uri: req.redirect_url.clone(),
            state: String::new(),
            scope: authorization_code.scope.clone(),
            user_or_robot_identity: authorization_code.user_or_robot_identity.clone(),
            created_at: OffsetDateTime::now_utc(),
            expires_in: self.access_token_expire,
        };
        token.code = access_token_generate.get_code(&CodeGenerateInfo {
            token: token.clone(),
            request: req.request.clone(),
        })?;
        Ok(token)
    }

    /// Check the exchange request against the stored authorization code.
    fn check_by_authorization_code(
        &self,
        req: &AccessTokenGenerateRequest,
        code_token: &Token,
        now: OffsetDateTime,
    ) -> Result<()> {
        let reject = |reason: String| OAuthError::RequestNotValid {
            client_id: req.client_id.clone(),
            reason,
        };

        if req.client_id != code_token.client_id {
            return Err(reject(format!(
                "code was issued to client {}",
                code_token.client_id
            )));
        }
        if req.state != code_token.state {
            return Err(reject(format!(
                "req state = {}, code state = {}",
                req.state, code_token.state
            )));
        }
        if req.redirect_url != code_token.redirect_uri {
            return Err(reject(format!(
                "req redirect url = {}, code redirect url = {}",
                req.redirect_url, code_token.redirect_uri
            )));
        }

        let expired_at = code_token
            .created_at
            .checked_add(self.authorize_code_expire)
            .ok_or_else(|| reject("authorization code lifetime out of range".into()))?;
        if expired_at < now {
            return Err(OAuthError::CodeExpired {
                client_id: req.client_id.clone(),
                expired_at,
            });
        }
        Ok(())
    }

    /// Issue and persist an authorization code for an existing client.
    #[tracing::instrument(skip_all, fields(client_id = %req.client_id))]
    pub async fn gen_authorize_code(&self, req: &AuthorizeGenerateRequest) -> Result<Token> {
        self.oauth_store.get_app(&req.client_id).await?;

        let token = self.new_authorization_token(req)?;
        self.token_store.create(&token).await?;
        tracing::debug!("issued authorization code");
        Ok(token)
    }

    /// Exchange an authorization code for an access token.
    ///
    /// The access token is persisted before the code is deleted. A failed
    /// delete is logged and ignored since the token is already issued, which
    /// leaves the code replayable until it expires. If the delete removed
    /// nothing, a concurrent exchange consumed the code first: the token
    /// minted here is withdrawn and the call fails with `NotFound`. Should the
    /// withdrawal itself fail, that token stays stored and is logged at
    /// `error` for the operator to revoke.
    #[tracing::instrument(skip_all, fields(client_id = %req.client_id))]
    pub async fn gen_access_token(
        &self,
        req: &AccessTokenGenerateRequest,
        access_token_generate: &dyn AccessTokenCodeGenerate,
    ) -> Result<Token> {
        let secrets = self.oauth_store.list_secret(&req.client_id).await?;
        if !secrets
            .iter()
            .any(|secret| secret_matches(&secret.client_secret, &req.client_secret))
        {
            tracing::warn!("client secret not valid");
            return Err(OAuthError::SecretNotValid {
                client_id: req.client_id.clone(),
            });
        }

        let code_token = self.token_store.get(&req.code).await?;
        self.check_by_authorization_code(req, &code_token, OffsetDateTime::now_utc())?;

        let access_token = self.new_access_token(&code_token, req, access_token_generate)?;
        self.token_store.create(&access_token).await?;

        match self.token_store.delete_by_code(&req.code).await {
            Ok(0) => {
                tracing::warn!("authorization code consumed concurrently, withdrawing access token");
                if let Err(e) = self.token_store.delete_by_code(&access_token.code).await {
                    tracing::error!(
                        error = %e,
                        client_id = %access_token.client_id,
                        "failed to withdraw access token, a second token for this code remains stored"
                    );
                }
                return Err(OAuthError::not_found(Resource::Token, &req.code));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Delete authorization token error");
            }
        }

        tracing::info!("issued access token");
        Ok(access_token)
    }

    /// Delete every code and access token of a client.
    #[tracing::instrument(skip(self))]
    pub async fn revoke_all_access_token(&self, client_id: &str) -> Result<()> {
        let removed = self.token_store.delete_by_client_id(client_id).await?;
        tracing::info!(removed, "revoked tokens");
        Ok(())
    }

    /// Look up a token by value. Expiry is not checked here.
    #[tracing::instrument(skip_all)]
    pub async fn load_access_token(&self, access_token: &str) -> Result<Token> {
        self.token_store.get(access_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::RandomCodeGenerate;
    use crate::store::{MemoryOAuthAppStore, MemoryTokenStore};
    use std::sync::Arc;
    use time::Duration;

    fn manager() -> OAuthManager {
        OAuthManager::new(
            Arc::new(MemoryOAuthAppStore::new()),
            Arc::new(MemoryTokenStore::new()),
            Arc::new(RandomCodeGenerate),
            Duration::minutes(10),
            Duration::hours(1),
        )
    }

    fn code_token(created_at: OffsetDateTime) -> Token {
        Token {
            code: "code".into(),
            client_id: "client".into(),
            redirect_uri: "https://app.example.org/cb".into(),
            state: "xyz".into(),
            scope: "read".into(),
            user_or_robot_identity: "user:1".into(),
            created_at,
            expires_in: Duration::minutes(10),
        }
    }

    fn exchange() -> AccessTokenGenerateRequest {
        AccessTokenGenerateRequest {
            client_id: "client".into(),
            client_secret: "secret".into(),
            code: "code".into(),
            redirect_url: "https://app.example.org/cb".into(),
            state: "xyz".into(),
            request: RequestContext::default(),
        }
    }

    #[test]
    fn check_accepts_code_at_deadline() {
        let m = manager();
        let created = OffsetDateTime::now_utc();
        let token = code_token(created);
        m.check_by_authorization_code(&exchange(), &token, created + Duration::minutes(10))
            .unwrap();
    }

    #[test]
    fn check_rejects_code_past_deadline() {
        let m = manager();
        let created = OffsetDateTime::now_utc();
        let token = code_token(created);
        let err = m
            .check_by_authorization_code(
                &exchange(),
                &token,
                created + Duration::minutes(10) + Duration::seconds(1),
            )
            .unwrap_err();
        assert!(matches!(err, OAuthError::CodeExpired { .. }));
    }

    #[test]
    fn check_rejects_foreign_client() {
        let m = manager();
        let token = code_token(OffsetDateTime::now_utc());
        let req = AccessTokenGenerateRequest {
            client_id: "other".into(),
            ..exchange()
        };
        let err = m
            .check_by_authorization_code(&req, &token, OffsetDateTime::now_utc())
            .unwrap_err();
        assert!(matches!(err, OAuthError::RequestNotValid { .. }));
    }

    #[test]
    fn check_rejects_unrepresentable_deadline() {
        let m = OAuthManager::new(
            Arc::new(MemoryOAuthAppStore::new()),
            Arc::new(MemoryTokenStore::new()),
            Arc::new(RandomCodeGenerate),
            Duration::MAX,
            Duration::MAX,
        );
        let token = code_token(OffsetDateTime::now_utc());
        let err = m
            .check_by_authorization_code(&exchange(), &token, OffsetDateTime::now_utc())
            .unwrap_err();
        assert!(matches!(err, OAuthError::RequestNotValid { .. }));
    }

    #[test]
    fn debug_redacts_secret_and_code() {
        let rendered = format!("{:?}", exchange());
        assert!(!rendered.contains("secret\""));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn secret_comparison_is_exact() {
        assert!(secret_matches("abc", "abc"));
        assert!(!secret_matches("abc", "abcd"));
        assert!(!secret_matches("abc", "abd"));
        assert!(!secret_matches("abc", ""));
    }
}
