//! Remote API access.
//!
//! [`EmailApi`] is the seam the caches call through; [`HunterClient`] is the
//! blocking HTTP implementation against the Hunter v2 endpoints.

mod error;
mod hunter;
mod types;

use std::fmt;

pub use error::ApiError;
pub use hunter::HunterClient;

#[cfg(test)]
mod tests;

/// Remote operations backing the caches.
pub trait EmailApi {
    /// Deliverability status label for `email`, as returned by the service.
    fn verify_email(&self, email: &str) -> Result<String, ApiError>;

    /// Addresses known for `domain`, in the order returned by the service.
    fn domain_search(&self, domain: &str) -> Result<Vec<String>, ApiError>;
}

impl<T: EmailApi + ?Sized> EmailApi for &T {
    fn verify_email(&self, email: &str) -> Result<String, ApiError> {
        (**self).verify_email(email)
    }

    fn domain_search(&self, domain: &str) -> Result<Vec<String>, ApiError> {
        (**self).domain_search(domain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    EmailVerifier,
    DomainSearch,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::EmailVerifier => "email-verifier",
            Self::DomainSearch => "domain-search",
        }
    }

    /// Name of the query parameter carrying the lookup target.
    pub(crate) fn target_param(self) -> &'static str {
        match self {
            Self::EmailVerifier => "email",
            Self::DomainSearch => "domain",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
