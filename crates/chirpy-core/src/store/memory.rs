//! 인메모리 저장소.
//!
//! 데이터베이스 없이 서버를 띄우거나 테스트할 때 사용합니다.
//! 모든 변경은 `tokio::sync::RwLock` 쓰기 잠금 아래에서 이루어지므로
//! 폐기와 조회는 서로 선형화됩니다.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    ChirpRecord, ChirpStore, RefreshTokenRecord, RefreshTokenRepository, SortOrder,
    UserCredentialStore, UserRecord,
};
use crate::error::StoreError;

/// 인메모리 사용자 저장소.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserCredentialStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, email: &str, hashed_password: &str) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict);
        }

        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_credential(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email && u.id != id) {
            return Err(StoreError::Conflict);
        }

        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn upgrade(&self, id: Uuid) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if !user.is_chirpy_red {
            user.is_chirpy_red = true;
            user.updated_at = Utc::now();
        }
        Ok(user.clone())
    }

    async fn reset(&self) -> Result<u64, StoreError> {
        let mut users = self.users.write().await;
        let count = users.len() as u64;
        users.clear();
        Ok(count)
    }
}

/// 인메모리 Refresh Token 저장소.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), StoreError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&record.token) {
            return Err(StoreError::Conflict);
        }
        tokens.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, StoreError> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn revoke(&self, token: &str, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(token) {
            Some(record) => {
                record.revoked_at.get_or_insert(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reset(&self) -> Result<u64, StoreError> {
        let mut tokens = self.tokens.write().await;
        let count = tokens.len() as u64;
        tokens.clear();
        Ok(count)
    }
}

/// 인메모리 게시글 저장소.
#[derive(Debug, Default)]
pub struct InMemoryChirpStore {
    chirps: RwLock<HashMap<Uuid, ChirpRecord>>,
}

impl InMemoryChirpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChirpStore for InMemoryChirpStore {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<ChirpRecord, StoreError> {
        let now = Utc::now();
        let chirp = ChirpRecord {
            id: Uuid::new_v4(),
            body: body.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.chirps.write().await.insert(chirp.id, chirp.clone());
        Ok(chirp)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChirpRecord>, StoreError> {
        Ok(self.chirps.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        author: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<ChirpRecord>, StoreError> {
        let chirps = self.chirps.read().await;
        let mut list: Vec<ChirpRecord> = chirps
            .values()
            .filter(|c| author.map_or(true, |a| c.user_id == a))
            .cloned()
            .collect();

        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        if order == SortOrder::Desc {
            list.reverse();
        }
        Ok(list)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.chirps.write().await.remove(&id).is_some())
    }

    async fn reset(&self) -> Result<u64, StoreError> {
        let mut chirps = self.chirps.write().await;
        let count = chirps.len() as u64;
        chirps.clear();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_chirp_list_order() {
        let store = InMemoryChirpStore::new();
        let author = Uuid::new_v4();
        let first = store.create(author, "first").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create(author, "second").await.unwrap();
        store.create(Uuid::new_v4(), "other").await.unwrap();

        let asc = store.list(Some(author), SortOrder::Asc).await.unwrap();
        assert_eq!(
            asc.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );

        let desc = store.list(Some(author), SortOrder::Desc).await.unwrap();
        assert_eq!(desc[0].id, second.id);

        assert_eq!(store.list(None, SortOrder::Asc).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_user_create_and_find() {
        let store = InMemoryUserStore::new();
        let user = store.create("a@b.com", "hash").await.unwrap();

        let by_email = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@b.com");
        assert!(store.find_by_email("x@y.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryUserStore::new();
        store.create("a@b.com", "hash").await.unwrap();

        assert_eq!(
            store.create("a@b.com", "other").await.unwrap_err(),
            StoreError::Conflict
        );
    }

    #[tokio::test]
    async fn test_update_credential() {
        let store = InMemoryUserStore::new();
        let a = store.create("a@b.com", "hash-a").await.unwrap();
        let b = store.create("c@d.com", "hash-b").await.unwrap();

        let updated = store
            .update_credential(a.id, "new@b.com", "hash-new")
            .await
            .unwrap();
        assert_eq!(updated.email, "new@b.com");
        assert_eq!(updated.hashed_password, "hash-new");

        // 다른 사용자의 이메일로 변경 불가
        assert_eq!(
            store
                .update_credential(a.id, "c@d.com", "x")
                .await
                .unwrap_err(),
            StoreError::Conflict
        );
        // 자기 이메일 유지는 허용
        assert!(store.update_credential(b.id, "c@d.com", "y").await.is_ok());
        assert_eq!(
            store
                .update_credential(Uuid::new_v4(), "z@z.com", "x")
                .await
                .unwrap_err(),
            StoreError::NotFound
        );
    }

    #[tokio::test]
    async fn test_upgrade_user() {
        let store = InMemoryUserStore::new();
        let user = store.create("a@b.com", "hash").await.unwrap();
        assert!(!user.is_chirpy_red);

        let upgraded = store.upgrade(user.id).await.unwrap();
        assert!(upgraded.is_chirpy_red);
        assert!(store.find_by_id(user.id).await.unwrap().unwrap().is_chirpy_red);

        // 재부여는 갱신 시각을 바꾸지 않음
        let again = store.upgrade(user.id).await.unwrap();
        assert_eq!(again.updated_at, upgraded.updated_at);

        assert_eq!(
            store.upgrade(Uuid::new_v4()).await.unwrap_err(),
            StoreError::NotFound
        );
    }

    #[tokio::test]
    async fn test_user_reset() {
        let store = InMemoryUserStore::new();
        store.create("a@b.com", "hash").await.unwrap();
        store.create("c@d.com", "hash").await.unwrap();

        assert_eq!(store.reset().await.unwrap(), 2);
        assert!(store.find_by_email("a@b.com").await.unwrap().is_none());
    }

    fn token_record(token: &str) -> RefreshTokenRecord {
        let now = Utc::now();
        RefreshTokenRecord {
            token: token.to_string(),
            user_id: Uuid::new_v4(),
            created_at: now,
            expires_at: now + chrono::Duration::days(1),
            revoked_at: None,
        }
    }

    #[tokio::test]
    async fn test_revoke_keeps_first_timestamp() {
        let repo = InMemoryRefreshTokenRepository::new();
        repo.insert(&token_record("t1")).await.unwrap();

        let first = Utc::now();
        assert!(repo.revoke("t1", first).await.unwrap());
        assert!(repo
            .revoke("t1", first + chrono::Duration::minutes(1))
            .await
            .unwrap());
        assert_eq!(
            repo.find("t1").await.unwrap().unwrap().revoked_at,
            Some(first)
        );

        assert!(!repo.revoke("missing", first).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_token_insert_conflicts() {
        let repo = InMemoryRefreshTokenRepository::new();
        repo.insert(&token_record("t1")).await.unwrap();
        assert_eq!(
            repo.insert(&token_record("t1")).await.unwrap_err(),
            StoreError::Conflict
        );
    }

    #[tokio::test]
    async fn test_concurrent_revoke_and_find() {
        let repo = Arc::new(InMemoryRefreshTokenRepository::new());
        repo.insert(&token_record("shared")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.revoke("shared", Utc::now()).await.unwrap()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert!(repo.find("shared").await.unwrap().unwrap().is_revoked());
    }

    #[tokio::test]
    async fn test_chirp_lifecycle() {
        let store = InMemoryChirpStore::new();
        let user_id = Uuid::new_v4();

        let chirp = store.create(user_id, "hello").await.unwrap();
        assert_eq!(
            store.find_by_id(chirp.id).await.unwrap().unwrap().user_id,
            user_id
        );

        assert_eq!(store.list(None, SortOrder::Asc).await.unwrap().len(), 1);
        assert!(store
            .list(Some(Uuid::new_v4()), SortOrder::Asc)
            .await
            .unwrap()
            .is_empty());

        assert!(store.delete(chirp.id).await.unwrap());
        assert!(!store.delete(chirp.id).await.unwrap());
        assert!(store.find_by_id(chirp.id).await.unwrap().is_none());
    }
}
