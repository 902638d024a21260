//! Normalization of user input into lookup targets.
//!
//! Cache keys and remote queries both use the normalized form returned here,
//! so `" Jane@Example.COM "` and `"Jane@example.com"` address the same entry.

mod domain;
mod error;
mod local;

pub use error::TargetError;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

/// Normalize an email address: trimmed, local part kept verbatim, domain
/// converted to lower-case ASCII.
pub fn normalize_email(email: &str) -> Result<String, TargetError> {
    let input = email.trim();
    if input.is_empty() {
        return Err(TargetError::EmptyInput);
    }

    let mut reasons = Vec::new();

    let parts: Vec<&str> = input.split('@').collect();
    if parts.len() != 2 {
        reasons.push("must contain exactly one '@'".to_string());
        return Err(TargetError::invalid_email(reasons));
    }
    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        reasons.push(format!(
            "local part length {} invalid (1..={MAX_LOCAL_LEN})",
            local.len()
        ));
    } else if !local::is_dot_atom(local) {
        reasons.push("invalid local part".to_string());
    }

    let ascii = match domain::to_ascii(domain) {
        Ok(ascii) => ascii,
        Err(TargetError::EmptyInput) => {
            reasons.push("domain part is empty".to_string());
            return Err(TargetError::invalid_email(reasons));
        }
        Err(err) => return Err(err),
    };
    domain::check_labels(&ascii, &mut reasons);

    let normalized = format!("{local}@{ascii}");
    if normalized.len() > MAX_EMAIL_LEN {
        reasons.push(format!(
            "total length {} > {MAX_EMAIL_LEN}",
            normalized.len()
        ));
    }

    if reasons.is_empty() {
        Ok(normalized)
    } else {
        Err(TargetError::invalid_email(reasons))
    }
}

/// Normalize a domain name to lower-case ASCII without a trailing dot.
pub fn normalize_domain(domain: &str) -> Result<String, TargetError> {
    let ascii = domain::to_ascii(domain)?;
    let mut reasons = Vec::new();
    domain::check_labels(&ascii, &mut reasons);
    if reasons.is_empty() {
        Ok(ascii)
    } else {
        Err(TargetError::invalid_domain(reasons))
    }
}
