use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Which cache an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Collection {
    #[serde(rename = "email")]
    Emails,
    #[serde(rename = "domain")]
    Domains,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emails => "email",
            Self::Domains => "domain",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = OperationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" | "emails" => Ok(Self::Emails),
            "domain" | "domains" => Ok(Self::Domains),
            other => Err(OperationParseError::UnknownCollection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Create,
    Read,
    Update,
    Delete,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = OperationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(OperationParseError::UnknownVerb(other.to_string())),
        }
    }
}

/// One cache operation, written `<verb> <collection> [key]`.
///
/// Only `read` may omit the key, in which case it returns the whole
/// collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    verb: Verb,
    collection: Collection,
    key: Option<String>,
}

impl Operation {
    pub fn new(verb: Verb, collection: Collection, key: impl Into<String>) -> Self {
        Self {
            verb,
            collection,
            key: Some(key.into()),
        }
    }

    pub fn create(collection: Collection, key: impl Into<String>) -> Self {
        Self::new(Verb::Create, collection, key)
    }

    pub fn read_all(collection: Collection) -> Self {
        Self {
            verb: Verb::Read,
            collection,
            key: None,
        }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.collection)?;
        if let Some(key) = &self.key {
            write!(f, " {key}")?;
        }
        Ok(())
    }
}

impl FromStr for Operation {
    type Err = OperationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb: Verb = words.next().ok_or(OperationParseError::Empty)?.parse()?;
        let collection: Collection = words
            .next()
            .ok_or(OperationParseError::MissingCollection)?
            .parse()?;
        let key = words.next();

        if let Some(extra) = words.next() {
            return Err(OperationParseError::TrailingInput(extra.to_string()));
        }

        match key {
            Some(key) => Ok(Self::new(verb, collection, key)),
            None if verb == Verb::Read => Ok(Self::read_all(collection)),
            None => Err(OperationParseError::MissingKey(verb)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperationParseError {
    #[error("empty operation")]
    Empty,
    #[error("unknown verb '{0}', use: create|read|update|delete")]
    UnknownVerb(String),
    #[error("missing collection, use: email|domain")]
    MissingCollection,
    #[error("unknown collection '{0}', use: email|domain")]
    UnknownCollection(String),
    #[error("'{0}' requires a key")]
    MissingKey(Verb),
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}
