//! Wire format of the Hunter v2 responses we consume. Unknown fields are
//! ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerificationData {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DomainSearchData {
    #[serde(default)]
    pub emails: Vec<EmailEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmailEntry {
    pub value: String,
}

/// Body sent with non-2xx answers.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}
