use std::collections::BTreeMap;

use super::{CacheError, RecordCache};
use crate::client::EmailApi;
use crate::target::normalize_email;

/// Verification statuses keyed by normalized email address.
#[derive(Debug)]
pub struct EmailVerifier<A> {
    api: A,
    records: RecordCache<String>,
}

impl<A> EmailVerifier<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            records: RecordCache::new(),
        }
    }

    /// Stored status for `email`, or `None` when absent (or not a valid
    /// address).
    pub fn read(&self, email: &str) -> Option<&str> {
        let key = normalize_email(email).ok()?;
        self.records.get(&key).map(String::as_str)
    }

    /// Every stored status, ordered by email.
    pub fn read_all(&self) -> &BTreeMap<String, String> {
        self.records.entries()
    }

    /// Removes the entry for `email` and returns its status.
    pub fn delete(&mut self, email: &str) -> Result<String, CacheError> {
        let key = normalize_email(email)?;
        self.records.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

impl<A: EmailApi> EmailVerifier<A> {
    /// Verifies `email` remotely and stores the status. Fails if the address
    /// is already cached; use [`EmailVerifier::update`] to refresh it.
    pub fn create(&mut self, email: &str) -> Result<&str, CacheError> {
        let key = normalize_email(email)?;
        let api = &self.api;
        self.records
            .create_with(key, |target| api.verify_email(target))
            .map(String::as_str)
    }

    /// Re-verifies a cached address and overwrites its status.
    pub fn update(&mut self, email: &str) -> Result<&str, CacheError> {
        let key = normalize_email(email)?;
        let api = &self.api;
        self.records
            .update_with(&key, |target| api.verify_email(target))
            .map(String::as_str)
    }
}
