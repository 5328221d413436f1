//! Email address utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Single `@`, no whitespace, dotted domain with a non-empty label before the last dot
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email regex is valid")
});

/// Normalize an email address into the key used by the signup stores.
///
/// Trims surrounding whitespace and lower-cases the whole address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check whether an address looks deliverable (after normalization)
pub fn is_valid_email(email: &str) -> bool {
    let normalized = normalize_email(email);
    normalized.len() <= 254 && EMAIL_REGEX.is_match(&normalized)
}

/// Mask an email address for logs (e.g., j***@example.com)
pub fn mask_email(email: &str) -> String {
    let normalized = normalize_email(email);
    match normalized.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}
