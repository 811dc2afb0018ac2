//! Converting arbitrary identifiers into legal object names.

/// Longest name allowed for a DNS-1123 subdomain.
pub const MAX_SUBDOMAIN_LENGTH: usize = 253;

/// Make `candidate` a legal DNS-1123 subdomain name.
///
/// Lowercases and replaces every character outside `[a-z0-9.-]` with `-`.
/// Each dot-separated label is then trimmed to start and end alphanumeric,
/// empty labels are dropped, and the result is truncated to
/// [`MAX_SUBDOMAIN_LENGTH`]. Pure and deterministic, but not injective:
/// `Grp_1` and `grp-1` map to the same name.
pub fn safe_subdomain_name(candidate: &str) -> String {
    let mapped: String = candidate
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect();

    let labels: Vec<&str> = mapped
        .split('.')
        .map(|label| label.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|label| !label.is_empty())
        .collect();

    let mut name: String = labels.join(".").chars().take(MAX_SUBDOMAIN_LENGTH).collect();

    // truncation may leave a trailing separator
    while name.ends_with(|c: char| !c.is_ascii_alphanumeric()) {
        name.pop();
    }

    if name.is_empty() {
        name.push('x');
    }
    name
}
