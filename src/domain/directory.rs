//! Account-directory service.
//!
//! Pure mediator between the driving port and the storage backend: it owns
//! validation, existence checks, and field population, and holds no state of
//! its own beyond the store reference.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::validate_names;
use crate::domain::ports::{AccountDirectory, AccountStore};
use crate::domain::{Account, AccountUpdate, DirectoryError, NewAccount};

/// Concrete [`AccountDirectory`] implementation over a pluggable store.
#[derive(Clone)]
pub struct AccountDirectoryService {
    store: Arc<dyn AccountStore>,
}

impl AccountDirectoryService {
    /// Create a new service over the given store.
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountDirectory for AccountDirectoryService {
    /// Create a new account.
    ///
    /// The existence check and the write are two backend round trips; the
    /// backend is not required to provide cross-request isolation, so two
    /// concurrent creates for the same name pair may both succeed.
    async fn create_account(&self, request: NewAccount) -> Result<Account, DirectoryError> {
        validate_names(&request.first_name, &request.last_name)?;

        if self
            .store
            .find_by_name(request.scope_id, &request.first_name, &request.last_name)
            .await?
            .is_some()
        {
            return Err(DirectoryError::AlreadyExists {
                scope_id: request.scope_id,
                first_name: request.first_name,
                last_name: request.last_name,
            });
        }

        let account = Account {
            principal_id: Uuid::new_v4(),
            scope_id: request.scope_id,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            user_flags: request.user_flags,
            user_level: request.user_level,
            user_title: request.user_title,
            service_urls: request.service_urls.unwrap_or_default(),
            created: Utc::now(),
        };
        self.store.upsert(&account).await?;
        Ok(account)
    }

    /// Replace an existing account in full; only `principal_id` and
    /// `created` survive from the stored record.
    async fn update_account(&self, request: AccountUpdate) -> Result<Account, DirectoryError> {
        validate_names(&request.first_name, &request.last_name)?;

        let Some(existing) = self
            .store
            .find_by_id(request.scope_id, request.principal_id)
            .await?
        else {
            return Err(DirectoryError::NotFound {
                principal_id: request.principal_id,
            });
        };

        let account = Account {
            principal_id: existing.principal_id,
            scope_id: request.scope_id,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            user_flags: request.user_flags,
            user_level: request.user_level,
            user_title: request.user_title,
            service_urls: request.service_urls,
            created: existing.created,
        };
        self.store.upsert(&account).await?;
        Ok(account)
    }

    async fn account_by_name(
        &self,
        scope_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Account>, DirectoryError> {
        Ok(self
            .store
            .find_by_name(scope_id, first_name, last_name)
            .await?)
    }

    async fn account_by_email(
        &self,
        scope_id: Uuid,
        email: &str,
    ) -> Result<Option<Account>, DirectoryError> {
        Ok(self.store.find_by_email(scope_id, email).await?)
    }

    async fn account_by_id(
        &self,
        scope_id: Uuid,
        principal_id: Uuid,
    ) -> Result<Option<Account>, DirectoryError> {
        Ok(self.store.find_by_id(scope_id, principal_id).await?)
    }

    async fn search_accounts(
        &self,
        scope_id: Uuid,
        text: &str,
    ) -> Result<Vec<Account>, DirectoryError> {
        Ok(self.store.search(scope_id, text).await?)
    }
}
