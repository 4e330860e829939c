//! One-way masking of names and email addresses for logs and responses.

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_EMAIL: &str = "unknown@email.com";
const MALFORMED_EMAIL: &str = "m*@e**.com";

fn mask_segment(segment: &str) -> Option<String> {
    let mut chars = segment.chars();
    let first = chars.next()?;
    let mut masked = String::with_capacity(segment.len());
    masked.push(first);
    masked.extend(chars.map(|_| '*'));
    Some(masked)
}

/// `"Sumit Jha"` becomes `"S**** J**"`. Missing or blank names become `"Unknown"`.
pub fn mask_name(name: Option<&str>) -> String {
    let parts: Vec<String> = name
        .unwrap_or_default()
        .split_whitespace()
        .filter_map(mask_segment)
        .collect();

    if parts.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        parts.join(" ")
    }
}

/// `"sumitjha@gmail.com"` becomes `"s*******@g****.com"`.
///
/// Only the first two domain labels are kept. Anything that does not look like
/// `user@label.label` falls back to a fixed placeholder.
pub fn mask_email(email: Option<&str>) -> String {
    match email {
        Some(email) if !email.trim().is_empty() => {
            try_mask_email(email).unwrap_or_else(|| MALFORMED_EMAIL.to_string())
        }
        _ => UNKNOWN_EMAIL.to_string(),
    }
}

fn try_mask_email(email: &str) -> Option<String> {
    let (username, domain) = email.split_once('@')?;
    if domain.contains('@') {
        return None;
    }

    let mut labels = domain.split('.');
    let host = mask_segment(labels.next()?)?;
    let tld = labels.next()?;
    let username = mask_segment(username)?;

    Some(format!("{username}@{host}.{tld}"))
}
