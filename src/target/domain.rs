use super::TargetError;

/// Convert `domain` to its lower-case ASCII form (UTS #46) without a
/// trailing root dot.
pub(crate) fn to_ascii(domain: &str) -> Result<String, TargetError> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(TargetError::EmptyInput);
    }
    idna::domain_to_ascii(trimmed).map_err(TargetError::idna)
}

/// Label checks on an already ASCII domain. Every violation is pushed to
/// `reasons`.
pub(crate) fn check_labels(ascii: &str, reasons: &mut Vec<String>) {
    if ascii.is_empty() {
        reasons.push("domain empty after IDNA conversion".to_string());
        return;
    }

    if ascii.len() > 253 {
        reasons.push(format!("domain length {} > 253", ascii.len()));
    }

    if !ascii.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }

    for label in ascii.split('.') {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
            continue;
        }
        if label.len() > 63 {
            reasons.push(format!("domain label '{label}' length {} > 63", label.len()));
        }
        if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!("domain label '{label}' cannot start/end with '-'"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            reasons.push(format!("domain label '{label}' has invalid chars"));
        }
    }
}
