//! Batch execution of textual cache operations over one shared client.

mod operation;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use operation::{Collection, Operation, OperationParseError, Verb};

use crate::cache::{CacheError, DomainSearch, EmailVerifier};
use crate::client::EmailApi;
use crate::target::{normalize_domain, normalize_email};

/// A cached value: a verification status or the addresses of a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Status(String),
    Emails(Vec<String>),
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => f.write_str(status),
            Self::Emails(emails) if emails.is_empty() => f.write_str("<none>"),
            Self::Emails(emails) => f.write_str(&emails.join(", ")),
        }
    }
}

/// Result of one applied [`Operation`]. `records` holds the affected entry,
/// every entry of the collection for a keyless read, or nothing when a read
/// key is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub verb: Verb,
    pub collection: Collection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub records: BTreeMap<String, Record>,
}

impl Outcome {
    fn single(verb: Verb, collection: Collection, key: String, record: Record) -> Self {
        Self {
            verb,
            collection,
            records: BTreeMap::from([(key.clone(), record)]),
            key: Some(key),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let past = match self.verb {
            Verb::Create => "created",
            Verb::Update => "updated",
            Verb::Delete => "deleted",
            Verb::Read => {
                return match &self.key {
                    Some(key) => match self.records.values().next() {
                        Some(record) => write!(f, "{} {key}: {record}", self.collection),
                        None => write!(f, "{} {key}: <absent>", self.collection),
                    },
                    None => {
                        write!(f, "{} entries: {}", self.collection, self.records.len())?;
                        for (key, record) in &self.records {
                            write!(f, "\n  {key}: {record}")?;
                        }
                        Ok(())
                    }
                };
            }
        };
        write!(f, "{past} {}", self.collection)?;
        for (key, record) in &self.records {
            write!(f, " {key}: {record}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] OperationParseError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// One email verifier and one domain search sharing a client.
#[derive(Debug)]
pub struct Session<A> {
    verifier: EmailVerifier<A>,
    domains: DomainSearch<A>,
}

impl<A: EmailApi + Clone> Session<A> {
    pub fn new(api: A) -> Self {
        Self {
            verifier: EmailVerifier::new(api.clone()),
            domains: DomainSearch::new(api),
        }
    }
}

impl<A: EmailApi> Session<A> {
    pub fn verifier(&self) -> &EmailVerifier<A> {
        &self.verifier
    }

    pub fn domains(&self) -> &DomainSearch<A> {
        &self.domains
    }

    pub fn apply(&mut self, op: &Operation) -> Result<Outcome, CacheError> {
        debug!(operation = %op, "applying operation");
        let Some(raw) = op.key() else {
            return Ok(self.read_all(op.collection()));
        };
        let verb = op.verb();
        let collection = op.collection();

        match collection {
            Collection::Emails => {
                let key = match normalize_email(raw) {
                    Ok(key) => key,
                    Err(_) if verb == Verb::Read => {
                        return Ok(absent(verb, collection, raw.to_string()));
                    }
                    Err(err) => return Err(err.into()),
                };
                let status = match verb {
                    Verb::Create => Some(self.verifier.create(&key)?.to_string()),
                    Verb::Update => Some(self.verifier.update(&key)?.to_string()),
                    Verb::Delete => Some(self.verifier.delete(&key)?),
                    Verb::Read => self.verifier.read(&key).map(str::to_string),
                };
                Ok(match status {
                    Some(status) => {
                        Outcome::single(verb, collection, key, Record::Status(status))
                    }
                    None => absent(verb, collection, key),
                })
            }
            Collection::Domains => {
                let key = match normalize_domain(raw) {
                    Ok(key) => key,
                    Err(_) if verb == Verb::Read => {
                        return Ok(absent(verb, collection, raw.to_string()));
                    }
                    Err(err) => return Err(err.into()),
                };
                let emails = match verb {
                    Verb::Create => Some(self.domains.create(&key)?.to_vec()),
                    Verb::Update => Some(self.domains.update(&key)?.to_vec()),
                    Verb::Delete => Some(self.domains.delete(&key)?),
                    Verb::Read => self.domains.read(&key).map(<[String]>::to_vec),
                };
                Ok(match emails {
                    Some(emails) => {
                        Outcome::single(verb, collection, key, Record::Emails(emails))
                    }
                    None => absent(verb, collection, key),
                })
            }
        }
    }

    /// Parses and applies one line. Blank lines and `#` comments yield
    /// `None`.
    pub fn run_line(&mut self, line: &str) -> Option<Result<Outcome, SessionError>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        Some(
            trimmed
                .parse::<Operation>()
                .map_err(SessionError::from)
                .and_then(|op| self.apply(&op).map_err(SessionError::from)),
        )
    }

    fn read_all(&self, collection: Collection) -> Outcome {
        let records = match collection {
            Collection::Emails => self
                .verifier
                .read_all()
                .iter()
                .map(|(key, status)| (key.clone(), Record::Status(status.clone())))
                .collect(),
            Collection::Domains => self
                .domains
                .read_all()
                .iter()
                .map(|(key, emails)| (key.clone(), Record::Emails(emails.clone())))
                .collect(),
        };
        Outcome {
            verb: Verb::Read,
            collection,
            key: None,
            records,
        }
    }
}

fn absent(verb: Verb, collection: Collection, key: String) -> Outcome {
    Outcome {
        verb,
        collection,
        key: Some(key),
        records: BTreeMap::new(),
    }
}
