use chrono::Utc;
use mayvn_core::models::{
    ConnectedAccount, NewConnectedAccount, ProfileCache, PLACEHOLDER_USERNAME,
};
use mayvn_core::AppError;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::ConnectedAccountStore;

type AccountKey = (String, String, String);

fn key(user_id: &str, brand_id: &str, instagram_user_id: &str) -> AccountKey {
    (
        user_id.to_string(),
        brand_id.to_string(),
        instagram_user_id.to_string(),
    )
}

/// Connected-account store kept in process memory
#[derive(Default)]
pub struct InMemoryConnectedAccountStore {
    accounts: RwLock<HashMap<AccountKey, ConnectedAccount>>,
}

impl InMemoryConnectedAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record, bypassing upsert semantics
    pub async fn insert(&self, account: ConnectedAccount) {
        let k = key(
            &account.user_id,
            &account.brand_id,
            &account.instagram_user_id,
        );
        self.accounts.write().await.insert(k, account);
    }
}

#[async_trait::async_trait]
impl ConnectedAccountStore for InMemoryConnectedAccountStore {
    async fn upsert(&self, account: NewConnectedAccount) -> Result<ConnectedAccount, AppError> {
        let now = Utc::now();
        let k = key(
            &account.user_id,
            &account.brand_id,
            &account.instagram_user_id,
        );

        let mut accounts = self.accounts.write().await;
        let existing = accounts.remove(&k);
        let saved = ConnectedAccount {
            user_id: account.user_id,
            brand_id: account.brand_id,
            instagram_user_id: account.instagram_user_id,
            username: existing
                .as_ref()
                .and_then(|a| a.username.clone())
                .or_else(|| Some(PLACEHOLDER_USERNAME.to_string())),
            name: existing.as_ref().and_then(|a| a.name.clone()),
            profile_picture_url: existing.as_ref().and_then(|a| a.profile_picture_url.clone()),
            access_token: account.access_token,
            access_token_encrypted: account.access_token_encrypted,
            token_type: account.token_type,
            token_expires_at: account.token_expires_at,
            is_active: true,
            connected_at: now,
            updated_at: now,
        };
        accounts.insert(k, saved.clone());

        Ok(saved)
    }

    async fn find(
        &self,
        user_id: &str,
        brand_id: &str,
        instagram_user_id: &str,
    ) -> Result<Option<ConnectedAccount>, AppError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(&key(user_id, brand_id, instagram_user_id))
            .cloned())
    }

    async fn list_for_brand(
        &self,
        user_id: &str,
        brand_id: &str,
    ) -> Result<Vec<ConnectedAccount>, AppError> {
        let accounts = self.accounts.read().await;
        let mut matching: Vec<ConnectedAccount> = accounts
            .values()
            .filter(|a| a.user_id == user_id && a.brand_id == brand_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.instagram_user_id.cmp(&b.instagram_user_id))
        });
        Ok(matching)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        brand_id: &str,
        instagram_user_id: &str,
        profile: &ProfileCache,
    ) -> Result<(), AppError> {
        let mut accounts = self.accounts.write().await;
        if let Some(account) = accounts.get_mut(&key(user_id, brand_id, instagram_user_id)) {
            if profile.username.is_some() {
                account.username = profile.username.clone();
            }
            if profile.name.is_some() {
                account.name = profile.name.clone();
            }
            if profile.profile_picture_url.is_some() {
                account.profile_picture_url = profile.profile_picture_url.clone();
            }
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn deactivate(
        &self,
        user_id: &str,
        brand_id: &str,
        instagram_user_id: &str,
    ) -> Result<bool, AppError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&key(user_id, brand_id, instagram_user_id)) {
            Some(account) => {
                account.is_active = false;
                account.access_token = None;
                account.access_token_encrypted = None;
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mayvn_core::models::TokenType;

    fn new_account(instagram_user_id: &str, token: &str) -> NewConnectedAccount {
        NewConnectedAccount {
            user_id: "user-1".to_string(),
            brand_id: "brand-1".to_string(),
            instagram_user_id: instagram_user_id.to_string(),
            access_token: Some(token.to_string()),
            access_token_encrypted: None,
            token_type: TokenType::LongLived,
            token_expires_at: Some(Utc::now() + Duration::days(59)),
        }
    }

    #[tokio::test]
    async fn test_upsert_then_find() {
        let store = InMemoryConnectedAccountStore::new();
        let saved = store.upsert(new_account("ig-1", "tok-a")).await.unwrap();
        assert!(saved.is_active);
        assert_eq!(saved.username.as_deref(), Some(PLACEHOLDER_USERNAME));
        assert_eq!(saved.token_type, TokenType::LongLived);

        let found = store.find("user-1", "brand-1", "ig-1").await.unwrap();
        assert_eq!(found, Some(saved));
        assert!(store.find("user-1", "brand-2", "ig-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_token_and_keeps_profile() {
        let store = InMemoryConnectedAccountStore::new();
        store.upsert(new_account("ig-1", "tok-a")).await.unwrap();
        store
            .update_profile(
                "user-1",
                "brand-1",
                "ig-1",
                &ProfileCache {
                    username: Some("acme".to_string()),
                    name: Some("Acme".to_string()),
                    profile_picture_url: None,
                },
            )
            .await
            .unwrap();
        store.deactivate("user-1", "brand-1", "ig-1").await.unwrap();

        let saved = store.upsert(new_account("ig-1", "tok-b")).await.unwrap();
        assert!(saved.is_active);
        assert_eq!(saved.access_token.as_deref(), Some("tok-b"));
        assert_eq!(saved.username.as_deref(), Some("acme"));
        assert_eq!(saved.name.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_list_for_brand_is_scoped_and_ordered() {
        let store = InMemoryConnectedAccountStore::new();
        store.upsert(new_account("ig-1", "a")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.upsert(new_account("ig-2", "b")).await.unwrap();

        let mut other = new_account("ig-3", "c");
        other.brand_id = "brand-2".to_string();
        store.upsert(other).await.unwrap();

        let listed = store.list_for_brand("user-1", "brand-1").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|a| a.instagram_user_id.as_str()).collect();
        assert_eq!(ids, vec!["ig-1", "ig-2"]);
    }

    #[tokio::test]
    async fn test_deactivate_clears_tokens() {
        let store = InMemoryConnectedAccountStore::new();
        store.upsert(new_account("ig-1", "tok")).await.unwrap();

        assert!(store.deactivate("user-1", "brand-1", "ig-1").await.unwrap());
        let account = store
            .find("user-1", "brand-1", "ig-1")
            .await
            .unwrap()
            .unwrap();
        assert!(!account.is_active);
        assert!(!account.has_token_material());

        assert!(!store.deactivate("user-1", "brand-1", "missing").await.unwrap());
    }
}
