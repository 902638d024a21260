use std::collections::BTreeMap;

use super::{CacheError, RecordCache};
use crate::client::EmailApi;
use crate::target::normalize_domain;

/// Addresses discovered per domain, keyed by normalized domain name.
#[derive(Debug)]
pub struct DomainSearch<A> {
    api: A,
    records: RecordCache<Vec<String>>,
}

impl<A> DomainSearch<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            records: RecordCache::new(),
        }
    }

    pub fn read(&self, domain: &str) -> Option<&[String]> {
        let key = normalize_domain(domain).ok()?;
        self.records.get(&key).map(Vec::as_slice)
    }

    pub fn read_all(&self) -> &BTreeMap<String, Vec<String>> {
        self.records.entries()
    }

    pub fn delete(&mut self, domain: &str) -> Result<Vec<String>, CacheError> {
        let key = normalize_domain(domain)?;
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

impl<A: EmailApi> DomainSearch<A> {
    /// Searches `domain` remotely and stores the addresses found, in the
    /// order returned. Fails if the domain is already cached.
    pub fn create(&mut self, domain: &str) -> Result<&[String], CacheError> {
        let key = normalize_domain(domain)?;
        let api = &self.api;
        self.records
            .create_with(key, |target| api.domain_search(target))
            .map(Vec::as_slice)
    }

    pub fn update(&mut self, domain: &str) -> Result<&[String], CacheError> {
        let key = normalize_domain(domain)?;
        let api = &self.api;
        self.records
            .update_with(&key, |target| api.domain_search(target))
            .map(Vec::as_slice)
    }
}
