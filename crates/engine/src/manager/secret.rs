//! Client secret lifecycle and masking.

use super::OAuthManager;
use super::app::random_alphanumeric;
use crate::error::Result;
use crate::model::ClientSecret;
use time::OffsetDateTime;

pub const OAUTH_CLIENT_SECRET_LENGTH: usize = 40;

const MASK_PREFIX: &str = "*****";
const MASK_KEPT_CHARS: usize = 8;

/// Redact a secret for display: the eight characters before the last one,
/// behind a fixed `*****` prefix. Secrets too short to cut yield the bare prefix.
pub fn mask_secret(secret: &str) -> String {
    let len = secret.len();
    let kept = len
        .checked_sub(MASK_KEPT_CHARS + 1)
        .and_then(|start| secret.get(start..len - 1))
        .unwrap_or_default();
    format!("{MASK_PREFIX}{kept}")
}

pub fn mask_client_secrets(secrets: &mut [ClientSecret]) {
    for secret in secrets {
        secret.client_secret = mask_secret(&secret.client_secret);
    }
}

impl OAuthManager {
    /// Mint a new secret for an existing app. The returned value is the only
    /// time its plaintext leaves the engine.
    #[tracing::instrument(skip(self))]
    pub async fn create_secret(
        &self,
        client_id: &str,
        created_by: Option<i64>,
    ) -> Result<ClientSecret> {
        self.oauth_store.get_app(client_id).await?;

        let secret = ClientSecret {
            id: 0,
            client_id: client_id.to_string(),
            client_secret: random_alphanumeric(OAUTH_CLIENT_SECRET_LENGTH),
            created_at: OffsetDateTime::now_utc(),
            created_by,
        };
        let stored = self.oauth_store.create_secret(secret).await?;
        tracing::info!(secret_id = stored.id, "created client secret");
        Ok(stored)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_secret(&self, client_id: &str, secret_id: i64) -> Result<()> {
        self.oauth_store.delete_secret(client_id, secret_id).await
    }

    /// All secrets of a client, masked.
    #[tracing::instrument(skip(self))]
    pub async fn list_secret(&self, client_id: &str) -> Result<Vec<ClientSecret>> {
        let mut secrets = self.oauth_store.list_secret(client_id).await?;
        mask_client_secrets(&mut secrets);
        Ok(secrets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_keeps_eight_chars_before_last() {
        assert_eq!(mask_secret("0123456789abcdefghij"), "*****bcdefghi");
    }

    #[test]
    fn mask_full_length_secret() {
        let secret = random_alphanumeric(OAUTH_CLIENT_SECRET_LENGTH);
        let masked = mask_secret(&secret);
        assert_eq!(masked.len(), MASK_PREFIX.len() + MASK_KEPT_CHARS);
        assert!(masked.ends_with(&secret[31..39]));
    }

    #[test]
    fn mask_short_secrets_do_not_panic() {
        assert_eq!(mask_secret(""), "*****");
        assert_eq!(mask_secret("12345678"), "*****");
        assert_eq!(mask_secret("123456789"), "*****12345678");
    }

    #[test]
    fn mask_in_place() {
        let mut secrets = vec![ClientSecret {
            id: 1,
            client_id: "c".into(),
            client_secret: "0123456789abcdefghij".into(),
            created_at: OffsetDateTime::now_utc(),
            created_by: None,
        }];
        mask_client_secrets(&mut secrets);
        assert_eq!(secrets[0].client_secret, "*****bcdefghi");
    }
}
