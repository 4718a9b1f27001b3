//! In-process reference backend.
//!
//! Keeps every record behind one lock; guards are held only across the
//! synchronous map operations and never across an await point, so concurrent
//! dispatcher calls block briefly and cannot deadlock each other.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    AccountStore, AccountStoreError, NameEntry, NameStore, NameStoreError,
};
use crate::domain::{Account, GLOBAL_SCOPE};

/// True when `account` is visible from `scope_id`.
///
/// Records stored in the global scope are visible from every scope; all
/// other records match their own scope only.
fn visible_in_scope(account: &Account, scope_id: Uuid) -> bool {
    account.scope_id == scope_id || account.scope_id == GLOBAL_SCOPE
}

/// Reference [`AccountStore`] keeping records in a `HashMap` keyed by
/// principal id. Secondary lookups are scope-filtered scans.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<Uuid, Account>>, AccountStoreError> {
        self.accounts
            .read()
            .map_err(|_| AccountStoreError::Connection {
                message: "account store lock poisoned".to_owned(),
            })
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(
        &self,
        scope_id: Uuid,
        principal_id: Uuid,
    ) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.read()?;
        Ok(accounts
            .get(&principal_id)
            .filter(|account| visible_in_scope(account, scope_id))
            .cloned())
    }

    async fn find_by_name(
        &self,
        scope_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.read()?;
        Ok(accounts
            .values()
            .find(|account| {
                visible_in_scope(account, scope_id)
                    && account.first_name == first_name
                    && account.last_name == last_name
            })
            .cloned())
    }

    async fn find_by_email(
        &self,
        scope_id: Uuid,
        email: &str,
    ) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.read()?;
        Ok(accounts
            .values()
            .find(|account| visible_in_scope(account, scope_id) && account.email == email)
            .cloned())
    }

    async fn search(&self, scope_id: Uuid, text: &str) -> Result<Vec<Account>, AccountStoreError> {
        let needle = text.to_lowercase();
        let accounts = self.read()?;
        let mut matches: Vec<Account> = accounts
            .values()
            .filter(|account| {
                visible_in_scope(account, scope_id)
                    && (account.first_name.to_lowercase().contains(&needle)
                        || account.last_name.to_lowercase().contains(&needle)
                        || account.email.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(matches)
    }

    async fn upsert(&self, account: &Account) -> Result<(), AccountStoreError> {
        let mut accounts =
            self.accounts
                .write()
                .map_err(|_| AccountStoreError::Connection {
                    message: "account store lock poisoned".to_owned(),
                })?;
        accounts.insert(account.principal_id, account.clone());
        Ok(())
    }
}

/// Reference [`NameStore`] keyed by full name, so listing order is stable.
#[derive(Debug, Default)]
pub struct MemoryNameStore {
    entries: RwLock<BTreeMap<String, NameEntry>>,
}

impl MemoryNameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NameStore for MemoryNameStore {
    async fn store(&self, entry: &NameEntry) -> Result<(), NameStoreError> {
        let mut entries = self.entries.write().map_err(|_| NameStoreError::Query {
            message: "name store lock poisoned".to_owned(),
        })?;
        entries.insert(entry.full_name(), entry.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<NameEntry>, NameStoreError> {
        let entries = self.entries.read().map_err(|_| NameStoreError::Query {
            message: "name store lock poisoned".to_owned(),
        })?;
        Ok(entries.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::ServiceUrls;

    fn account(scope_id: Uuid, first: &str, last: &str, email: &str) -> Account {
        Account {
            principal_id: Uuid::new_v4(),
            scope_id,
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            email: email.to_owned(),
            user_flags: 0,
            user_level: 0,
            user_title: String::new(),
            service_urls: ServiceUrls::default(),
            created: Utc::now(),
        }
    }

    #[tokio::test]
    async fn upsert_then_lookup_by_each_key() {
        let store = MemoryAccountStore::new();
        let jane = account(GLOBAL_SCOPE, "Jane", "Doe", "jane@example.com");
        store.upsert(&jane).await.expect("upsert");

        let by_id = store
            .find_by_id(GLOBAL_SCOPE, jane.principal_id)
            .await
            .expect("find by id");
        assert_eq!(by_id.as_ref(), Some(&jane));

        let by_name = store
            .find_by_name(GLOBAL_SCOPE, "Jane", "Doe")
            .await
            .expect("find by name");
        assert_eq!(by_name.as_ref(), Some(&jane));

        let by_email = store
            .find_by_email(GLOBAL_SCOPE, "jane@example.com")
            .await
            .expect("find by email");
        assert_eq!(by_email, Some(jane));
    }

    #[tokio::test]
    async fn upsert_replaces_the_record_for_a_principal() {
        let store = MemoryAccountStore::new();
        let mut jane = account(GLOBAL_SCOPE, "Jane", "Doe", "jane@example.com");
        store.upsert(&jane).await.expect("insert");

        jane.email = "doe@example.com".to_owned();
        store.upsert(&jane).await.expect("replace");

        let stored = store
            .find_by_id(GLOBAL_SCOPE, jane.principal_id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.email, "doe@example.com");
    }

    #[tokio::test]
    async fn scoped_records_are_invisible_to_other_scopes() {
        let store = MemoryAccountStore::new();
        let scope = Uuid::new_v4();
        let scoped = account(scope, "Jane", "Doe", "jane@example.com");
        store.upsert(&scoped).await.expect("upsert");

        let elsewhere = store
            .find_by_name(Uuid::new_v4(), "Jane", "Doe")
            .await
            .expect("find");
        assert_eq!(elsewhere, None);

        let at_home = store
            .find_by_name(scope, "Jane", "Doe")
            .await
            .expect("find");
        assert!(at_home.is_some());
    }

    #[tokio::test]
    async fn global_records_are_visible_from_every_scope() {
        let store = MemoryAccountStore::new();
        let global = account(GLOBAL_SCOPE, "Jane", "Doe", "jane@example.com");
        store.upsert(&global).await.expect("upsert");

        let from_elsewhere = store
            .find_by_name(Uuid::new_v4(), "Jane", "Doe")
            .await
            .expect("find");
        assert!(from_elsewhere.is_some());
    }

    #[tokio::test]
    async fn search_matches_names_and_email_case_insensitively() {
        let store = MemoryAccountStore::new();
        store
            .upsert(&account(GLOBAL_SCOPE, "Jane", "Doe", "jane@example.com"))
            .await
            .expect("upsert");
        store
            .upsert(&account(GLOBAL_SCOPE, "John", "Adams", "john@example.com"))
            .await
            .expect("upsert");

        let by_name = store.search(GLOBAL_SCOPE, "doe").await.expect("search");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].first_name, "Jane");

        let by_email = store
            .search(GLOBAL_SCOPE, "EXAMPLE.COM")
            .await
            .expect("search");
        assert_eq!(by_email.len(), 2);
        // Ordered by last name for stable output.
        assert_eq!(by_email[0].last_name, "Adams");

        let nothing = store.search(GLOBAL_SCOPE, "zz").await.expect("search");
        assert!(nothing.is_empty());
    }

    #[tokio::test]
    async fn name_store_overwrites_repeated_full_names() {
        let store = MemoryNameStore::new();
        let mut entry = NameEntry {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            food: "pie".to_owned(),
        };
        store.store(&entry).await.expect("store");

        entry.food = "cake".to_owned();
        store.store(&entry).await.expect("overwrite");

        let entries = store.list().await.expect("list");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].food, "cake");
    }
}
