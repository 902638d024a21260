use thiserror::Error;

/// Errors raised while turning user input into a lookup target.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("input is empty")]
    EmptyInput,
    #[error("invalid email address: {}", .reasons.join("; "))]
    InvalidEmail { reasons: Vec<String> },
    #[error("invalid domain: {}", .reasons.join("; "))]
    InvalidDomain { reasons: Vec<String> },
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
}

impl TargetError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn invalid_email(reasons: Vec<String>) -> Self {
        Self::InvalidEmail { reasons }
    }

    pub(crate) fn invalid_domain(reasons: Vec<String>) -> Self {
        Self::InvalidDomain { reasons }
    }
}
