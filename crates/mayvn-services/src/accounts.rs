//! Connected-account management
//!
//! Saving and disconnecting tokens, choosing the account an insights request
//! runs against, and caching profile data fetched from the Graph API.

use chrono::Utc;
use mayvn_core::models::{
    AccountProfile, AccountSummary, ConnectedAccount, NewConnectedAccount, ProfileCache,
};
use mayvn_core::{AppError, EncryptionService};
use mayvn_db::ConnectedAccountStore;
use std::sync::Arc;

use crate::instagram::{classify_token, GraphApiClient, TokenClassification};

/// Account chosen for a request, with its decrypted token
pub struct SelectedAccount {
    pub account: ConnectedAccount,
    pub access_token: String,
    /// Every account of the brand, for the account switcher
    pub all_accounts: Vec<AccountSummary>,
}

impl std::fmt::Debug for SelectedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedAccount")
            .field("account", &self.account)
            .field("all_accounts", &self.all_accounts)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn ConnectedAccountStore>,
    encryption: Option<EncryptionService>,
    graph: GraphApiClient,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn ConnectedAccountStore>,
        encryption: Option<EncryptionService>,
        graph: GraphApiClient,
    ) -> Self {
        Self {
            store,
            encryption,
            graph,
        }
    }

    pub fn store(&self) -> &Arc<dyn ConnectedAccountStore> {
        &self.store
    }

    /// Store a token for an account, classifying it through the Graph API.
    /// The account becomes active; a failed inspection is not an error.
    #[tracing::instrument(skip(self, access_token))]
    pub async fn save_token(
        &self,
        user_id: &str,
        brand_id: &str,
        instagram_user_id: &str,
        access_token: &str,
    ) -> Result<(ConnectedAccount, TokenClassification), AppError> {
        let (plaintext, encrypted) = match &self.encryption {
            Some(encryption) => (None, Some(encryption.encrypt(access_token)?)),
            None => {
                tracing::warn!("ENCRYPTION_KEY not configured, storing access token unencrypted");
                (Some(access_token.to_string()), None)
            }
        };

        let debug_info = match self.graph.debug_token(access_token).await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(error = %e, "Could not determine token type");
                None
            }
        };
        let classification = classify_token(debug_info.as_ref(), Utc::now());

        let account = self
            .store
            .upsert(NewConnectedAccount {
                user_id: user_id.to_string(),
                brand_id: brand_id.to_string(),
                instagram_user_id: instagram_user_id.to_string(),
                access_token: plaintext,
                access_token_encrypted: encrypted,
                token_type: classification.token_type,
                token_expires_at: classification.expires_at,
            })
            .await?;

        tracing::info!(
            token_type = %classification.token_type,
            expires_in_days = classification.expires_in_days,
            "Access token saved"
        );

        Ok((account, classification))
    }

    pub async fn list_accounts(
        &self,
        user_id: &str,
        brand_id: &str,
    ) -> Result<Vec<ConnectedAccount>, AppError> {
        self.store.list_for_brand(user_id, brand_id).await
    }

    /// Plaintext token of an account. A stored plaintext token wins; otherwise
    /// the encrypted one is decrypted. Undecryptable tokens count as missing.
    pub fn resolve_token(&self, account: &ConnectedAccount) -> Option<String> {
        if let Some(token) = account.access_token.as_deref().filter(|t| !t.is_empty()) {
            return Some(token.to_string());
        }

        let encrypted = account
            .access_token_encrypted
            .as_deref()
            .filter(|t| !t.is_empty())?;

        let Some(encryption) = &self.encryption else {
            tracing::warn!(
                instagram_user_id = %account.instagram_user_id,
                "Encrypted token stored but ENCRYPTION_KEY is not configured"
            );
            return None;
        };

        match encryption.decrypt(encrypted) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!(
                    instagram_user_id = %account.instagram_user_id,
                    error = %e,
                    "Failed to decrypt access token"
                );
                None
            }
        }
    }

    /// Pick the account an insights request runs against: the requested one,
    /// or else the first usable account of the brand.
    #[tracing::instrument(skip(self))]
    pub async fn select_account(
        &self,
        user_id: &str,
        brand_id: &str,
        requested: Option<&str>,
    ) -> Result<SelectedAccount, AppError> {
        let accounts = self.store.list_for_brand(user_id, brand_id).await?;
        tracing::debug!(account_count = accounts.len(), "Loaded brand accounts");

        if accounts.is_empty() {
            return Err(AppError::Unauthorized(
                "Not connected. Please connect your Instagram account.".to_string(),
            ));
        }

        let all_accounts: Vec<AccountSummary> =
            accounts.iter().map(ConnectedAccount::summary).collect();

        let account = match requested {
            Some(instagram_user_id) => {
                let account = self
                    .store
                    .find(user_id, brand_id, instagram_user_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Instagram account not found".to_string()))?;
                if account.is_expired() {
                    return Err(AppError::InvalidOAuthToken(
                        "Token expired. Please reconnect your Instagram account.".to_string(),
                    ));
                }
                account
            }
            None => accounts
                .into_iter()
                .find(ConnectedAccount::is_usable)
                .ok_or_else(|| {
                    AppError::Unauthorized(
                        "No active Instagram accounts. Please reconnect.".to_string(),
                    )
                })?,
        };

        let access_token = self.resolve_token(&account).ok_or_else(|| {
            tracing::warn!(
                instagram_user_id = %account.instagram_user_id,
                "Access token is missing"
            );
            AppError::InvalidOAuthToken("Access token is missing. Please reconnect.".to_string())
        })?;

        Ok(SelectedAccount {
            account,
            access_token,
            all_accounts,
        })
    }

    /// Remember the fetched profile on the account. Failures are logged only.
    pub async fn cache_profile(&self, account: &ConnectedAccount, profile: &AccountProfile) {
        let cache = ProfileCache {
            username: profile.username.clone(),
            name: profile.name.clone(),
            profile_picture_url: profile.profile_picture_url.clone(),
        };
        if cache == ProfileCache::default() {
            return;
        }

        if let Err(e) = self
            .store
            .update_profile(
                &account.user_id,
                &account.brand_id,
                &account.instagram_user_id,
                &cache,
            )
            .await
        {
            tracing::warn!(
                instagram_user_id = %account.instagram_user_id,
                error = %e,
                "Failed to cache Instagram profile"
            );
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn disconnect(
        &self,
        user_id: &str,
        brand_id: &str,
        instagram_user_id: &str,
    ) -> Result<(), AppError> {
        if !self
            .store
            .deactivate(user_id, brand_id, instagram_user_id)
            .await?
        {
            return Err(AppError::NotFound("Instagram account not found".to_string()));
        }
        tracing::info!("Instagram account disconnected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use mayvn_core::models::TokenType;
    use mayvn_core::ErrorMetadata;
    use mayvn_db::InMemoryConnectedAccountStore;
    use mockito::{Matcher, Server};

    const KEY: &[u8] = b"01234567890123456789012345678901";

    fn stored(
        instagram_user_id: &str,
        token: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        is_active: bool,
        connected_offset_secs: i64,
    ) -> ConnectedAccount {
        let connected_at = Utc::now() - Duration::days(1) + Duration::seconds(connected_offset_secs);
        ConnectedAccount {
            user_id: "u1".to_string(),
            brand_id: "b1".to_string(),
            instagram_user_id: instagram_user_id.to_string(),
            username: Some(format!("{}-name", instagram_user_id)),
            name: None,
            profile_picture_url: None,
            access_token: token.map(str::to_string),
            access_token_encrypted: None,
            token_type: TokenType::LongLived,
            token_expires_at: expires_at,
            is_active,
            connected_at,
            updated_at: connected_at,
        }
    }

    fn service(store: Arc<InMemoryConnectedAccountStore>, base_url: &str) -> AccountService {
        AccountService::new(
            store,
            Some(EncryptionService::from_key_bytes(KEY).unwrap()),
            GraphApiClient::new(base_url, std::time::Duration::from_secs(5)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_select_without_accounts_is_unauthorized() {
        let store = Arc::new(InMemoryConnectedAccountStore::new());
        let err = service(store, "http://127.0.0.1:9")
            .select_account("u1", "b1", None)
            .await
            .unwrap_err();
        assert_eq!(err.http_status_code(), 401);
        assert_eq!(
            err.client_message(),
            "Not connected. Please connect your Instagram account."
        );
    }

    #[tokio::test]
    async fn test_select_skips_expired_and_inactive_accounts() {
        let store = Arc::new(InMemoryConnectedAccountStore::new());
        store
            .insert(stored("ig-1", Some("t1"), Some(Utc::now() - Duration::days(1)), true, 0))
            .await;
        store.insert(stored("ig-2", Some("t2"), None, false, 10)).await;
        store.insert(stored("ig-3", Some("t3"), None, true, 20)).await;

        let selected = service(store, "http://127.0.0.1:9")
            .select_account("u1", "b1", None)
            .await
            .unwrap();
        assert_eq!(selected.account.instagram_user_id, "ig-3");
        assert_eq!(selected.access_token, "t3");

        let flags: Vec<bool> = selected.all_accounts.iter().map(|a| a.is_active).collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[tokio::test]
    async fn test_select_reports_no_active_account() {
        let store = Arc::new(InMemoryConnectedAccountStore::new());
        store.insert(stored("ig-1", Some("t1"), None, false, 0)).await;

        let err = service(store, "http://127.0.0.1:9")
            .select_account("u1", "b1", None)
            .await
            .unwrap_err();
        assert_eq!(
            err.client_message(),
            "No active Instagram accounts. Please reconnect."
        );
    }

    #[tokio::test]
    async fn test_select_requested_account() {
        let store = Arc::new(InMemoryConnectedAccountStore::new());
        store.insert(stored("ig-1", Some("t1"), None, true, 0)).await;
        store
            .insert(stored("ig-2", Some("t2"), Some(Utc::now() - Duration::hours(1)), true, 10))
            .await;
        let svc = service(store, "http://127.0.0.1:9");

        let missing = svc.select_account("u1", "b1", Some("ig-9")).await.unwrap_err();
        assert_eq!(missing.http_status_code(), 404);

        let expired = svc.select_account("u1", "b1", Some("ig-2")).await.unwrap_err();
        assert_eq!(expired.http_status_code(), 401);
        assert_eq!(
            expired.client_message(),
            "Token expired. Please reconnect your Instagram account."
        );

        let selected = svc.select_account("u1", "b1", Some("ig-1")).await.unwrap();
        assert_eq!(selected.access_token, "t1");
    }

    #[tokio::test]
    async fn test_select_without_token_material() {
        let store = Arc::new(InMemoryConnectedAccountStore::new());
        store.insert(stored("ig-1", None, None, true, 0)).await;

        let err = service(store, "http://127.0.0.1:9")
            .select_account("u1", "b1", None)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_OAUTH_TOKEN");
        assert_eq!(
            err.client_message(),
            "Access token is missing. Please reconnect."
        );
    }

    #[tokio::test]
    async fn test_save_token_encrypts_and_classifies() {
        let mut server = Server::new_async().await;
        let expires_at = (Utc::now() + Duration::days(59)).timestamp();
        let _mock = server
            .mock("GET", "/debug_token")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(format!(r#"{{"data":{{"expires_at":{}}}}}"#, expires_at))
            .create_async()
            .await;

        let store = Arc::new(InMemoryConnectedAccountStore::new());
        let svc = service(store.clone(), &server.url());
        let (account, classification) = svc
            .save_token("u1", "b1", "ig-1", "EAAB-secret")
            .await
            .unwrap();

        assert_eq!(classification.token_type, TokenType::LongLived);
        assert_eq!(account.token_type, TokenType::LongLived);
        assert!(account.access_token.is_none());
        let encrypted = account.access_token_encrypted.clone().unwrap();
        assert_ne!(encrypted, "EAAB-secret");
        assert_eq!(svc.resolve_token(&account).as_deref(), Some("EAAB-secret"));
    }

    #[tokio::test]
    async fn test_save_token_survives_failed_inspection() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/debug_token")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":{"message":"Invalid OAuth access token."}}"#)
            .create_async()
            .await;

        let store = Arc::new(InMemoryConnectedAccountStore::new());
        let svc = AccountService::new(
            store,
            None,
            GraphApiClient::new(&server.url(), std::time::Duration::from_secs(5)).unwrap(),
        );
        let (account, classification) = svc.save_token("u1", "b1", "ig-1", "tok").await.unwrap();

        assert_eq!(classification.token_type, TokenType::Unknown);
        assert_eq!(classification.expires_in_days, 60);
        assert_eq!(account.access_token.as_deref(), Some("tok"));
        assert!(account.is_active);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_account_is_not_found() {
        let store = Arc::new(InMemoryConnectedAccountStore::new());
        store.insert(stored("ig-1", Some("t1"), None, true, 0)).await;
        let svc = service(store.clone(), "http://127.0.0.1:9");

        let err = svc.disconnect("u1", "b1", "ig-2").await.unwrap_err();
        assert_eq!(err.http_status_code(), 404);

        svc.disconnect("u1", "b1", "ig-1").await.unwrap();
        let account = store.find("u1", "b1", "ig-1").await.unwrap().unwrap();
        assert!(!account.is_active);
        assert!(svc.resolve_token(&account).is_none());
    }

    #[tokio::test]
    async fn test_cache_profile_updates_store() {
        let store = Arc::new(InMemoryConnectedAccountStore::new());
        let account = stored("ig-1", Some("t1"), None, true, 0);
        store.insert(account.clone()).await;
        let svc = service(store.clone(), "http://127.0.0.1:9");

        let profile = AccountProfile {
            id: "ig-1".to_string(),
            username: Some("acme".to_string()),
            name: Some("Acme Inc".to_string()),
            biography: None,
            profile_picture_url: Some("https://cdn.example/p.jpg".to_string()),
            followers_count: None,
            follows_count: None,
            media_count: None,
            website: None,
        };
        svc.cache_profile(&account, &profile).await;

        let cached = store.find("u1", "b1", "ig-1").await.unwrap().unwrap();
        assert_eq!(cached.username.as_deref(), Some("acme"));
        assert_eq!(cached.name.as_deref(), Some("Acme Inc"));
    }
}
