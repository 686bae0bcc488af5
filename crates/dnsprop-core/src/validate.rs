//! Input validation applied before a lookup reaches the resolver engine.

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

use crate::error::{DnspropError, Result};
use crate::types::RecordType;

/// Maximum length of a full domain name in presentation form
pub const MAX_NAME_LEN: usize = 253;

/// Maximum length of a single label
pub const MAX_LABEL_LEN: usize = 63;

/// Validate a domain name and convert it to its ASCII (punycode) form.
///
/// A single trailing dot is accepted and removed.
pub fn validate_domain_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DnspropError::InvalidDomain(
            "domain name cannot be empty".into(),
        ));
    }
    let name = name.strip_suffix('.').unwrap_or(name);

    let ascii = match url::Host::parse(name) {
        Ok(url::Host::Domain(domain)) => domain,
        Ok(host) => host.to_string(),
        Err(e) => return Err(DnspropError::InvalidDomain(format!("{name}: {e}"))),
    };

    if ascii.len() > MAX_NAME_LEN {
        return Err(DnspropError::InvalidDomain(format!(
            "domain name too long: {} characters (max {MAX_NAME_LEN})",
            ascii.len()
        )));
    }

    for label in ascii.split('.') {
        check_label(label)?;
    }

    Ok(ascii)
}

fn check_label(label: &str) -> Result<()> {
    let bytes = label.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return Err(DnspropError::InvalidDomain(
            "domain name cannot have empty labels".into(),
        ));
    };
    if bytes.len() > MAX_LABEL_LEN {
        return Err(DnspropError::InvalidDomain(format!(
            "label '{label}' too long: {} characters (max {MAX_LABEL_LEN})",
            bytes.len()
        )));
    }
    if !first.is_ascii_alphanumeric() {
        return Err(DnspropError::InvalidDomain(format!(
            "label '{label}' must start with letter or digit"
        )));
    }
    if !last.is_ascii_alphanumeric() {
        return Err(DnspropError::InvalidDomain(format!(
            "label '{label}' must end with letter or digit"
        )));
    }
    if let Some(bad) = label
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
    {
        return Err(DnspropError::InvalidDomain(format!(
            "label '{label}' contains invalid character '{bad}'"
        )));
    }
    Ok(())
}

/// Validate a record type mnemonic, case-insensitively.
pub fn validate_record_type(record_type: &str) -> Result<RecordType> {
    let trimmed = record_type.trim();
    if trimmed.is_empty() {
        return Err(DnspropError::UnsupportedRecordType(String::new()));
    }
    trimmed.parse()
}

/// Validate a server list: at most `max` entries, each an IP literal with optional port.
///
/// Blank entries are skipped; [`dedupe_servers`] drops them.
pub fn validate_servers<S: AsRef<str>>(servers: &[S], max: usize) -> Result<()> {
    if servers.len() > max {
        return Err(DnspropError::TooManyServers {
            count: servers.len(),
            max,
        });
    }

    for server in servers {
        let server = server.as_ref().trim();
        if server.is_empty() {
            continue;
        }
        let valid = server.parse::<SocketAddr>().is_ok() || server.parse::<IpAddr>().is_ok();
        if !valid {
            return Err(DnspropError::InvalidServer(server.to_string()));
        }
    }

    Ok(())
}

/// Trim, drop blanks, and remove duplicates while keeping first-seen order.
#[must_use]
pub fn dedupe_servers<S: AsRef<str>>(servers: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    servers
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty() && seen.insert(*s))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_normalizes_names() {
        assert_eq!(validate_domain_name("example.com").unwrap(), "example.com");
        assert_eq!(validate_domain_name(" Example.COM. ").unwrap(), "example.com");
        assert_eq!(
            validate_domain_name("bücher.example").unwrap(),
            "xn--bcher-kva.example"
        );
    }

    #[test]
    fn rejects_bad_names() {
        for bad in ["", "   ", "a..b", "-a.com", "a-.com", "under_score.com", "."] {
            assert!(validate_domain_name(bad).is_err(), "{bad:?} should be rejected");
        }
        let long_label = format!("{}.com", "a".repeat(64));
        assert!(validate_domain_name(&long_label).is_err());
        let long_name = vec!["abcdefghi"; 26].join(".");
        assert!(long_name.len() > MAX_NAME_LEN);
        assert!(validate_domain_name(&long_name).is_err());
    }

    #[test]
    fn record_types() {
        assert_eq!(validate_record_type(" mx ").unwrap(), RecordType::Mx);
        assert!(matches!(
            validate_record_type("PTR"),
            Err(DnspropError::UnsupportedRecordType(t)) if t == "PTR"
        ));
        assert!(validate_record_type("").is_err());
    }

    #[test]
    fn servers() {
        assert!(validate_servers(&["1.1.1.1", "8.8.8.8:53", "[2606:4700::1111]:53", "::1", " "], 50).is_ok());
        assert!(matches!(
            validate_servers(&["dns.google"], 50),
            Err(DnspropError::InvalidServer(_))
        ));
        assert!(matches!(
            validate_servers(&["1.1.1.1", "1.0.0.1"], 1),
            Err(DnspropError::TooManyServers { count: 2, max: 1 })
        ));
    }

    #[test]
    fn dedupe_keeps_order() {
        let servers = dedupe_servers(&["8.8.8.8", " 1.1.1.1", "", "8.8.8.8", "1.1.1.1 "]);
        assert_eq!(servers, vec!["8.8.8.8", "1.1.1.1"]);
    }
}
