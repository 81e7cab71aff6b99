//! Loading and saving the registry through a key-value store.

use crate::registry::entry::{merge, AccountEntry};
use crate::storage::{KeyValueStore, StoreResult, REGISTRY_KEY};

/// Ordered list of discovered accounts, unique by account id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountRegistry {
    entries: Vec<AccountEntry>,
}

impl AccountRegistry {
    /// Load the registry; a missing key is an empty registry. Repeated
    /// account ids in the stored blob keep their first entry.
    pub fn load(store: &dyn KeyValueStore) -> StoreResult<Self> {
        let entries: Vec<AccountEntry> = match store.get(REGISTRY_KEY)? {
            Some(blob) => serde_json::from_str(&blob)?,
            None => Vec::new(),
        };
        let registry = Self::from(entries);
        tracing::debug!(accounts = registry.len(), "Registry loaded");
        Ok(registry)
    }

    /// Persist the whole registry.
    pub fn save(&self, store: &dyn KeyValueStore) -> StoreResult<()> {
        let blob = serde_json::to_string(&self.entries)?;
        store.set(REGISTRY_KEY, &blob)?;
        tracing::info!(accounts = self.len(), "Registry saved");
        Ok(())
    }

    /// Merge newly found accounts, returning the entries actually added.
    pub fn merge_found(&mut self, found: Vec<AccountEntry>) -> Vec<AccountEntry> {
        let before = self.entries.len();
        let merged = merge(std::mem::take(&mut self.entries), found);
        self.entries = merged;
        self.entries[before..].to_vec()
    }

    /// Entry for `account_id`, if registered.
    pub fn find(&self, account_id: &str) -> Option<&AccountEntry> {
        self.entries.iter().find(|e| e.account_id == account_id)
    }

    pub fn entries(&self) -> &[AccountEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<AccountEntry>> for AccountRegistry {
    fn from(entries: Vec<AccountEntry>) -> Self {
        Self {
            entries: merge(Vec::new(), entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn entry(account: &str) -> AccountEntry {
        AccountEntry::new("44'/397'/0'/0'/1'".parse().unwrap(), "ed25519:k", account)
    }

    #[test]
    fn test_load_empty() {
        let store = MemoryStore::new();
        assert!(AccountRegistry::load(&store).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let store = MemoryStore::new();
        let mut registry = AccountRegistry::default();
        let added = registry.merge_found(vec![entry("a.near"), entry("b.near"), entry("a.near")]);
        assert_eq!(added.len(), 2);
        registry.save(&store).unwrap();

        let loaded = AccountRegistry::load(&store).unwrap();
        assert_eq!(loaded, registry);
        assert_eq!(loaded.find("b.near").unwrap().account_id, "b.near");
        assert!(loaded.find("c.near").is_none());
    }

    #[test]
    fn test_reads_camel_case_blob() {
        let store = MemoryStore::new();
        store
            .set(
                REGISTRY_KEY,
                r#"[{"path":"44'/397'/0'/0'/1'","publicKey":"ed25519:k","accountId":"x.near"}]"#,
            )
            .unwrap();
        let registry = AccountRegistry::load(&store).unwrap();
        assert_eq!(registry.entries()[0].path.components(), &[44, 397, 0, 0, 1]);
    }

    #[test]
    fn test_load_drops_repeated_account_ids() {
        let store = MemoryStore::new();
        store
            .set(
                REGISTRY_KEY,
                r#"[{"path":"44'/397'/0'/0'/1'","publicKey":"ed25519:k","accountId":"x.near"},
                    {"path":"44'/397'/0'/0'/2'","publicKey":"ed25519:j","accountId":"x.near"},
                    {"path":"44'/397'/0'/0'/3'","publicKey":"ed25519:i","accountId":"y.near"}]"#,
            )
            .unwrap();
        let registry = AccountRegistry::load(&store).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find("x.near").unwrap().public_key, "ed25519:k");
    }

    #[test]
    fn test_merge_found_reports_only_new() {
        let mut registry = AccountRegistry::from(vec![entry("a.near")]);
        let added = registry.merge_found(vec![entry("a.near")]);
        assert!(added.is_empty());
        assert_eq!(registry.len(), 1);
    }
}
