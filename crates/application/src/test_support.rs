//! Shared fakes for application unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hearthware_core::{AppError, AppResult, Principal, Session};
use hearthware_domain::{CollectionKey, RoleAssignment};

use crate::{ChangeHub, IdentityProvider, KeyValueStore, RoleRepository, StorageSignal};

#[derive(Default)]
pub(crate) struct FakeKeyValueStore {
    values: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
}

impl FakeKeyValueStore {
    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for FakeKeyValueStore {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Internal("storage unavailable".to_owned()));
        }

        Ok(self
            .values
            .lock()
            .map_err(|_| AppError::Internal("poisoned".to_owned()))?
            .get(key)
            .cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.values
            .lock()
            .map_err(|_| AppError::Internal("poisoned".to_owned()))?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.values
            .lock()
            .map_err(|_| AppError::Internal("poisoned".to_owned()))?
            .remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingSignal {
    announced: Mutex<Vec<CollectionKey>>,
}

impl RecordingSignal {
    pub(crate) fn announced(&self) -> Vec<CollectionKey> {
        self.announced
            .lock()
            .map(|values| values.clone())
            .unwrap_or_default()
    }
}

impl StorageSignal for RecordingSignal {
    fn announce(&self, key: CollectionKey) {
        if let Ok(mut announced) = self.announced.lock() {
            announced.push(key);
        }
    }
}

pub(crate) fn local_parts() -> (Arc<FakeKeyValueStore>, Arc<ChangeHub>, Arc<RecordingSignal>) {
    (
        Arc::new(FakeKeyValueStore::default()),
        Arc::new(ChangeHub::new()),
        Arc::new(RecordingSignal::default()),
    )
}

struct FakeAccount {
    password: String,
    principal: Principal,
}

/// Identity service fake with live-token bookkeeping.
#[derive(Default)]
pub(crate) struct FakeIdentityProvider {
    accounts: Mutex<HashMap<String, FakeAccount>>,
    live_tokens: Mutex<HashMap<String, Principal>>,
    issued: AtomicUsize,
    unreachable: AtomicBool,
}

impl FakeIdentityProvider {
    pub(crate) fn with_account(self, email: &str, password: &str, principal_id: &str) -> Self {
        if let Ok(mut accounts) = self.accounts.lock() {
            accounts.insert(
                email.to_owned(),
                FakeAccount {
                    password: password.to_owned(),
                    principal: Principal::new(principal_id, Some(email.to_owned())),
                },
            );
        }
        self
    }

    pub(crate) fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub(crate) fn revoke_all(&self) {
        if let Ok(mut tokens) = self.live_tokens.lock() {
            tokens.clear();
        }
    }

    pub(crate) fn live_token_count(&self) -> usize {
        self.live_tokens.lock().map(|tokens| tokens.len()).unwrap_or(0)
    }

    fn ensure_reachable(&self) -> AppResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AppError::Internal("identity service unreachable".to_owned()));
        }
        Ok(())
    }

    fn issue(&self, principal: Principal) -> Session {
        let serial = self.issued.fetch_add(1, Ordering::SeqCst);
        let token = format!("token-{serial}");
        if let Ok(mut tokens) = self.live_tokens.lock() {
            tokens.insert(token.clone(), principal.clone());
        }
        Session::new(token, Some(format!("refresh-{serial}")), principal, None)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        self.ensure_reachable()?;
        let principal = {
            let accounts = self
                .accounts
                .lock()
                .map_err(|_| AppError::Internal("poisoned".to_owned()))?;
            match accounts.get(email) {
                Some(account) if account.password == password => account.principal.clone(),
                _ => {
                    return Err(AppError::Unauthorized(
                        "Invalid login credentials".to_owned(),
                    ));
                }
            }
        };

        Ok(self.issue(principal))
    }

    async fn fetch_principal(&self, access_token: &str) -> AppResult<Option<Principal>> {
        self.ensure_reachable()?;
        Ok(self
            .live_tokens
            .lock()
            .map_err(|_| AppError::Internal("poisoned".to_owned()))?
            .get(access_token)
            .cloned())
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<Session> {
        self.ensure_reachable()?;
        let access_token = refresh_token.replacen("refresh-", "token-", 1);
        let principal = self
            .live_tokens
            .lock()
            .map_err(|_| AppError::Internal("poisoned".to_owned()))?
            .remove(&access_token)
            .ok_or_else(|| AppError::Unauthorized("Invalid Refresh Token".to_owned()))?;

        Ok(self.issue(principal))
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        self.ensure_reachable()?;
        if let Ok(mut tokens) = self.live_tokens.lock() {
            tokens.remove(access_token);
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeRoleRepository {
    assignments: HashMap<String, RoleAssignment>,
    failing: AtomicBool,
}

impl FakeRoleRepository {
    pub(crate) fn with_role(mut self, principal_id: &str, role: &str) -> Self {
        self.assignments.insert(
            principal_id.to_owned(),
            RoleAssignment::new(principal_id, role),
        );
        self
    }

    pub(crate) fn failing() -> Self {
        let repository = Self::default();
        repository.failing.store(true, Ordering::SeqCst);
        repository
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn find_role_assignment(&self, principal_id: &str) -> AppResult<Option<RoleAssignment>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Internal("profiles lookup timed out".to_owned()));
        }

        Ok(self.assignments.get(principal_id).cloned())
    }
}
