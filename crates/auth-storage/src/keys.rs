//! Storage key constants.

/// Storage keys used by the session layer
pub struct StorageKeys;

impl StorageKeys {
    /// Current session token (`header.payload.trailer` string)
    pub const AUTH_TOKEN: &'static str = "auth_token";

    /// Current signed-in user (JSON)
    pub const AUTH_USER: &'static str = "auth_user";

    /// Previously registered accounts (JSON array)
    pub const REGISTERED_USERS: &'static str = "registered_users";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_unique() {
        let keys = [
            StorageKeys::AUTH_TOKEN,
            StorageKeys::AUTH_USER,
            StorageKeys::REGISTERED_USERS,
        ];
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len(), "Storage keys must be unique");
    }
}
