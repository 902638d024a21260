#![forbid(unsafe_code)]
//! mailfinder_lib — email verification and domain search over the Hunter
//! API, with in-memory CRUD caches of the results.

pub mod cache;
pub mod client;
pub mod config;
pub mod session;
pub mod target;

pub use cache::{CacheError, DomainSearch, EmailVerifier, RecordCache};
pub use client::{ApiError, EmailApi, Endpoint, HunterClient};
pub use config::{ApiConfig, ConfigError};
pub use session::{
    Collection, Operation, OperationParseError, Outcome, Record, Session, SessionError, Verb,
};
pub use target::{TargetError, normalize_domain, normalize_email};
