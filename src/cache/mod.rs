//! In-memory caches of remote lookups.
//!
//! [`EmailVerifier`] and [`DomainSearch`] share the CRUD contract of
//! [`RecordCache`]: create rejects existing keys, update and delete reject
//! missing ones, and a remote failure never alters the stored data.

mod domain;
mod error;
mod store;
mod verifier;

pub use domain::DomainSearch;
pub use error::CacheError;
pub use store::RecordCache;
pub use verifier::EmailVerifier;
