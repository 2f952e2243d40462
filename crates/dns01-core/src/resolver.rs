//! Domain resolution for validation record names
//!
//! Splits `_acme-challenge.sub.example.com` into the registered root domain
//! (`example.com`) and the host record relative to it (`_acme-challenge.sub`).
//!
//! ## Known limitation
//!
//! The root domain is the last two labels of the name. No public-suffix list
//! is consulted, so `_acme-challenge.example.co.uk` resolves to `co.uk`.
//! Zones under multi-label public suffixes are not supported.

use crate::error::{Error, Result};

/// Label prefix of every DNS-01 validation record
pub const ACME_CHALLENGE_PREFIX: &str = "_acme-challenge.";

/// A validation record name split into provider coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// Registered domain the record lives under (e.g. "example.com")
    pub root_domain: String,
    /// Record name relative to `root_domain` (e.g. "_acme-challenge.sub")
    pub host_record: String,
}

/// Get the root domain of a record name
///
/// Strips [`ACME_CHALLENGE_PREFIX`] if present, then keeps the last two
/// dot-separated labels. Names with fewer than two labels are returned as-is.
pub fn root_domain(fqdn: &str) -> String {
    let name = fqdn.strip_prefix(ACME_CHALLENGE_PREFIX).unwrap_or(fqdn);

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() >= 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        name.to_string()
    }
}

/// Get the host record (RR) of `record_name` relative to `root_domain`
///
/// Removes the trailing `.<root_domain>`; if the name does not end with it,
/// the full name is returned unchanged.
pub fn host_record(record_name: &str, root_domain: &str) -> String {
    record_name
        .strip_suffix(root_domain)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(record_name)
        .to_string()
}

/// Resolve a validation record name into root domain and host record
///
/// # Errors
///
/// Returns [`Error::Resolution`] when the name is empty or nothing is left
/// once the challenge prefix is removed.
pub fn resolve(validation_name: &str) -> Result<ResolvedName> {
    if validation_name.trim().is_empty() {
        return Err(Error::resolution("validation record name is empty"));
    }

    let root_domain = root_domain(validation_name);
    if root_domain.is_empty() {
        return Err(Error::resolution(format!(
            "no domain left in validation record name '{}'",
            validation_name
        )));
    }

    let host_record = host_record(validation_name, &root_domain);
    tracing::debug!(
        "Resolved {} -> root domain {}, host record {}",
        validation_name,
        root_domain,
        host_record
    );

    Ok(ResolvedName {
        root_domain,
        host_record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_domain_strips_challenge_prefix() {
        assert_eq!(root_domain("_acme-challenge.sub.example.com"), "example.com");
        assert_eq!(root_domain("_acme-challenge.example.com"), "example.com");
        assert_eq!(root_domain("_acme-challenge.a.b.c.example.org"), "example.org");
    }

    #[test]
    fn test_root_domain_without_prefix() {
        assert_eq!(root_domain("www.example.com"), "example.com");
        assert_eq!(root_domain("example.com"), "example.com");
        assert_eq!(root_domain("localhost"), "localhost");
    }

    #[test]
    fn test_root_domain_single_label_after_prefix() {
        assert_eq!(root_domain("_acme-challenge.com"), "com");
        assert_eq!(root_domain("_acme-challenge."), "");
    }

    #[test]
    fn test_root_domain_multi_label_suffix_is_naive() {
        // Two-label heuristic, no public-suffix list
        assert_eq!(root_domain("_acme-challenge.example.co.uk"), "co.uk");
    }

    #[test]
    fn test_host_record() {
        assert_eq!(
            host_record("_acme-challenge.sub.example.com", "example.com"),
            "_acme-challenge.sub"
        );
        assert_eq!(
            host_record("_acme-challenge.example.com", "example.com"),
            "_acme-challenge"
        );
    }

    #[test]
    fn test_host_record_falls_back_to_full_name() {
        assert_eq!(host_record("_acme-challenge.other.org", "example.com"), "_acme-challenge.other.org");
        // Suffix must sit on a label boundary
        assert_eq!(host_record("notexample.com", "example.com"), "notexample.com");
        assert_eq!(host_record("example.com", "example.com"), "example.com");
    }

    #[test]
    fn test_resolve() {
        let resolved = resolve("_acme-challenge.sub.example.com").unwrap();
        assert_eq!(
            resolved,
            ResolvedName {
                root_domain: "example.com".to_string(),
                host_record: "_acme-challenge.sub".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_rejects_empty_names() {
        assert!(matches!(resolve(""), Err(Error::Resolution(_))));
        assert!(matches!(resolve("   "), Err(Error::Resolution(_))));
        assert!(matches!(resolve("_acme-challenge."), Err(Error::Resolution(_))));
    }
}
