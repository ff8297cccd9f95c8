use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;

use crate::core::{CoreError, CoreResult};

/// Durable home for the blob store refresh token. The drive client only
/// ever sees this capability, so tests and the OAuth connect flow can
/// swap the backing freely.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn refresh_token(&self) -> CoreResult<SecretString>;
    async fn store_refresh_token(&self, token: SecretString) -> CoreResult<()>;
}

/// SQLite-backed store with an optional environment fallback used until
/// the connect flow has persisted a token.
pub struct SqliteCredentialStore {
    pool: SqlitePool,
    fallback: Option<SecretString>,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool, fallback: Option<SecretString>) -> Self {
        SqliteCredentialStore { pool, fallback }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn refresh_token(&self) -> CoreResult<SecretString> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT refresh_token FROM drive_credentials WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        if let Some((token,)) = row {
            return Ok(SecretString::new(token));
        }
        match &self.fallback {
            Some(token) => Ok(SecretString::new(token.expose_secret().clone())),
            None => Err(CoreError::StorageAuth(
                "drive account is not connected and no refresh token is configured".to_string(),
            )),
        }
    }

    async fn store_refresh_token(&self, token: SecretString) -> CoreResult<()> {
        sqlx::query(
            "INSERT INTO drive_credentials (id, refresh_token, updated_at) \
             VALUES (1, ?1, datetime('now')) \
             ON CONFLICT(id) DO UPDATE SET refresh_token = ?1, updated_at = datetime('now')",
        )
        .bind(token.expose_secret())
        .execute(&self.pool)
        .await?;
        tracing::info!("drive refresh token updated");
        Ok(())
    }
}

/// Fixed-token store for tests and one-off scripts.
pub struct StaticCredentialStore {
    token: SecretString,
}

impl StaticCredentialStore {
    pub fn new(token: impl Into<String>) -> Self {
        StaticCredentialStore {
            token: SecretString::new(token.into()),
        }
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn refresh_token(&self) -> CoreResult<SecretString> {
        Ok(SecretString::new(self.token.expose_secret().clone()))
    }

    async fn store_refresh_token(&self, token: SecretString) -> CoreResult<()> {
        let _ = token;
        Err(CoreError::StorageAuth(
            "static credential store cannot persist tokens".to_string(),
        ))
    }
}
