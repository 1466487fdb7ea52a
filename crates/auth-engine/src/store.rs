//! Durable mirror of the current session.

use auth_storage::{SessionStorage, StorageError, StorageKeys, StorageResult};
use tracing::warn;

use crate::users::User;

/// A (token, user) pair loaded back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSession {
    pub token: String,
    pub user: User,
}

/// Persists the current session and the registered-accounts list.
///
/// The store is passive: it never interprets the session, it only
/// guarantees that the token and user record are written and cleared
/// together from the caller's point of view.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    /// Create a store over the given backend.
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Persist the session pair.
    ///
    /// The user record is serialized before anything is written, so a
    /// serialization failure leaves storage untouched; the user key is
    /// written before the token key, so a token is never observable
    /// without its user.
    pub fn persist(&self, token: &str, user: &User) -> StorageResult<()> {
        let user_json = serde_json::to_string(user)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;

        self.storage.set(StorageKeys::AUTH_USER, &user_json)?;
        self.storage.set(StorageKeys::AUTH_TOKEN, token)?;
        Ok(())
    }

    /// Load the persisted session pair.
    ///
    /// Returns `None` unless both keys are present and the user record
    /// deserializes; corrupt state is logged and reads as no session.
    pub fn load(&self) -> StorageResult<Option<PersistedSession>> {
        let Some(token) = self.storage.get(StorageKeys::AUTH_TOKEN)? else {
            return Ok(None);
        };
        let Some(user_json) = self.storage.get(StorageKeys::AUTH_USER)? else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Ok(Some(PersistedSession { token, user })),
            Err(error) => {
                warn!(%error, "stored user record is corrupt, treating session as absent");
                Ok(None)
            }
        }
    }

    /// Remove both session keys. Idempotent; the registered-accounts list
    /// is not touched.
    pub fn clear(&self) -> StorageResult<()> {
        let _ = self.storage.delete(StorageKeys::AUTH_TOKEN);
        let _ = self.storage.delete(StorageKeys::AUTH_USER);
        Ok(())
    }

    /// All previously registered accounts. Absent or corrupt state reads
    /// as an empty list.
    pub fn registered_users(&self) -> StorageResult<Vec<User>> {
        match self.storage.get(StorageKeys::REGISTERED_USERS)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(users) => Ok(users),
                Err(error) => {
                    warn!(%error, "registered-users list is corrupt, treating as empty");
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    /// Append one account through a single write of the full list, so a
    /// failed call never leaves a partially updated list.
    pub fn append_registered_user(&self, user: &User) -> StorageResult<()> {
        let mut users = self.registered_users()?;
        users.retain(|existing| existing.email != user.email);
        users.push(user.clone());

        let json = serde_json::to_string(&users)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.storage.set(StorageKeys::REGISTERED_USERS, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::Role;
    use auth_storage::{FileStorage, MemoryStorage};
    use tempfile::tempdir;

    fn test_user() -> User {
        User::register("Ana Moreno", "ana@x.com", Role::Creator)
    }

    fn create_store() -> SessionStore {
        SessionStore::new(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_load_empty_store() {
        let store = create_store();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_persist_then_load() {
        let store = create_store();
        let user = test_user();

        store.persist("aaa.bbb.ccc", &user).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token, "aaa.bbb.ccc");
        assert_eq!(loaded.user, user);
    }

    #[test]
    fn test_persist_round_trips_across_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let user = test_user();

        {
            let store = SessionStore::new(Box::new(FileStorage::open(&path).unwrap()));
            store.persist("aaa.bbb.ccc", &user).unwrap();
        }

        // Simulated restart: a fresh backend over the same file
        let store = SessionStore::new(Box::new(FileStorage::open(&path).unwrap()));
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token, "aaa.bbb.ccc");
        assert_eq!(loaded.user, user);
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let store = create_store();
        store.persist("aaa.bbb.ccc", &test_user()).unwrap();

        store.clear().unwrap();

        assert_eq!(store.load().unwrap(), None);
        assert!(!store.storage.has(StorageKeys::AUTH_TOKEN).unwrap());
        assert!(!store.storage.has(StorageKeys::AUTH_USER).unwrap());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = create_store();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_clear_keeps_registered_users() {
        let store = create_store();
        let user = test_user();
        store.append_registered_user(&user).unwrap();
        store.persist("aaa.bbb.ccc", &user).unwrap();

        store.clear().unwrap();

        assert_eq!(store.registered_users().unwrap().len(), 1);
    }

    #[test]
    fn test_load_rejects_half_pairs() {
        let store = create_store();
        let user = test_user();

        // Token without user
        store
            .storage
            .set(StorageKeys::AUTH_TOKEN, "aaa.bbb.ccc")
            .unwrap();
        assert_eq!(store.load().unwrap(), None);

        // User without token
        store.storage.delete(StorageKeys::AUTH_TOKEN).unwrap();
        store
            .storage
            .set(
                StorageKeys::AUTH_USER,
                &serde_json::to_string(&user).unwrap(),
            )
            .unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_load_treats_corrupt_user_as_absent() {
        let store = create_store();
        store
            .storage
            .set(StorageKeys::AUTH_TOKEN, "aaa.bbb.ccc")
            .unwrap();
        store
            .storage
            .set(StorageKeys::AUTH_USER, "{not valid json")
            .unwrap();

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_registered_users_starts_empty() {
        let store = create_store();
        assert!(store.registered_users().unwrap().is_empty());
    }

    #[test]
    fn test_append_registered_user() {
        let store = create_store();
        let ana = test_user();
        let liam = User::register("Liam Okafor", "liam@x.com", Role::Student);

        store.append_registered_user(&ana).unwrap();
        store.append_registered_user(&liam).unwrap();

        let users = store.registered_users().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email, "ana@x.com");
        assert_eq!(users[1].email, "liam@x.com");
    }

    #[test]
    fn test_corrupt_registered_list_reads_empty() {
        let store = create_store();
        store
            .storage
            .set(StorageKeys::REGISTERED_USERS, "[[[broken")
            .unwrap();

        assert!(store.registered_users().unwrap().is_empty());
    }
}
