use mayvn_core::models::{
    ConnectedAccount, NewConnectedAccount, ProfileCache, PLACEHOLDER_USERNAME,
};
use mayvn_core::AppError;
use sqlx::{PgPool, Postgres};

const ACCOUNT_COLUMNS: &str = "user_id, brand_id, instagram_user_id, username, name, \
    profile_picture_url, access_token, access_token_encrypted, token_type, token_expires_at, \
    is_active, connected_at, updated_at";

/// Trait for connected-account storage operations
/// Accounts are keyed by (user_id, brand_id, instagram_user_id).
#[async_trait::async_trait]
pub trait ConnectedAccountStore: Send + Sync {
    /// Insert or replace the token of an account and mark it active
    async fn upsert(&self, account: NewConnectedAccount) -> Result<ConnectedAccount, AppError>;

    async fn find(
        &self,
        user_id: &str,
        brand_id: &str,
        instagram_user_id: &str,
    ) -> Result<Option<ConnectedAccount>, AppError>;

    /// All accounts of a brand, oldest connection first
    async fn list_for_brand(
        &self,
        user_id: &str,
        brand_id: &str,
    ) -> Result<Vec<ConnectedAccount>, AppError>;

    async fn update_profile(
        &self,
        user_id: &str,
        brand_id: &str,
        instagram_user_id: &str,
        profile: &ProfileCache,
    ) -> Result<(), AppError>;

    /// Mark the account inactive and drop its token material.
    /// Returns false when no such account exists.
    async fn deactivate(
        &self,
        user_id: &str,
        brand_id: &str,
        instagram_user_id: &str,
    ) -> Result<bool, AppError>;

    /// Backend reachability, used by the health check
    async fn ping(&self) -> Result<(), AppError>;
}

/// PostgreSQL-backed connected-account repository
#[derive(Clone)]
pub struct PostgresConnectedAccountRepository {
    pool: PgPool,
}

impl PostgresConnectedAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ConnectedAccountStore for PostgresConnectedAccountRepository {
    #[tracing::instrument(skip(self, account), fields(
        db.table = "connected_accounts",
        db.operation = "upsert",
        instagram_user_id = %account.instagram_user_id
    ))]
    async fn upsert(&self, account: NewConnectedAccount) -> Result<ConnectedAccount, AppError> {
        let query = format!(
            r#"
            INSERT INTO connected_accounts (
                user_id, brand_id, instagram_user_id, username,
                access_token, access_token_encrypted, token_type, token_expires_at,
                is_active, connected_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, NOW(), NOW())
            ON CONFLICT (user_id, brand_id, instagram_user_id) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                access_token_encrypted = EXCLUDED.access_token_encrypted,
                token_type = EXCLUDED.token_type,
                token_expires_at = EXCLUDED.token_expires_at,
                is_active = TRUE,
                connected_at = NOW(),
                updated_at = NOW()
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        let saved = sqlx::query_as::<Postgres, ConnectedAccount>(&query)
            .bind(&account.user_id)
            .bind(&account.brand_id)
            .bind(&account.instagram_user_id)
            .bind(PLACEHOLDER_USERNAME)
            .bind(&account.access_token)
            .bind(&account.access_token_encrypted)
            .bind(account.token_type)
            .bind(account.token_expires_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }

    #[tracing::instrument(skip(self), fields(db.table = "connected_accounts", db.operation = "select"))]
    async fn find(
        &self,
        user_id: &str,
        brand_id: &str,
        instagram_user_id: &str,
    ) -> Result<Option<ConnectedAccount>, AppError> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM connected_accounts \
             WHERE user_id = $1 AND brand_id = $2 AND instagram_user_id = $3"
        );

        let account = sqlx::query_as::<Postgres, ConnectedAccount>(&query)
            .bind(user_id)
            .bind(brand_id)
            .bind(instagram_user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    #[tracing::instrument(skip(self), fields(db.table = "connected_accounts", db.operation = "select"))]
    async fn list_for_brand(
        &self,
        user_id: &str,
        brand_id: &str,
    ) -> Result<Vec<ConnectedAccount>, AppError> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM connected_accounts \
             WHERE user_id = $1 AND brand_id = $2 \
             ORDER BY connected_at ASC, instagram_user_id ASC"
        );

        let accounts = sqlx::query_as::<Postgres, ConnectedAccount>(&query)
            .bind(user_id)
            .bind(brand_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }

    #[tracing::instrument(skip(self, profile), fields(db.table = "connected_accounts", db.operation = "update"))]
    async fn update_profile(
        &self,
        user_id: &str,
        brand_id: &str,
        instagram_user_id: &str,
        profile: &ProfileCache,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE connected_accounts
            SET username = COALESCE($4, username),
                name = COALESCE($5, name),
                profile_picture_url = COALESCE($6, profile_picture_url),
                updated_at = NOW()
            WHERE user_id = $1 AND brand_id = $2 AND instagram_user_id = $3
            "#,
        )
        .bind(user_id)
        .bind(brand_id)
        .bind(instagram_user_id)
        .bind(&profile.username)
        .bind(&profile.name)
        .bind(&profile.profile_picture_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "connected_accounts", db.operation = "update"))]
    async fn deactivate(
        &self,
        user_id: &str,
        brand_id: &str,
        instagram_user_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE connected_accounts
            SET is_active = FALSE,
                access_token = NULL,
                access_token_encrypted = NULL,
                updated_at = NOW()
            WHERE user_id = $1 AND brand_id = $2 AND instagram_user_id = $3
            "#,
        )
        .bind(user_id)
        .bind(brand_id)
        .bind(instagram_user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
