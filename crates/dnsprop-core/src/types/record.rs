use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DnspropError;

/// Record types a propagation check can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Canonical name
    Cname,
    /// Text strings
    Txt,
    /// Mail exchanger
    Mx,
    /// Name server
    Ns,
    /// Start of authority
    Soa,
}

impl RecordType {
    /// Every supported type, in display order
    pub const ALL: [Self; 7] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Txt,
        Self::Mx,
        Self::Ns,
        Self::Soa,
    ];

    /// Wire protocol type code
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::A => 1,
            Self::Ns => 2,
            Self::Cname => 5,
            Self::Soa => 6,
            Self::Mx => 15,
            Self::Txt => 16,
            Self::Aaaa => 28,
        }
    }

    /// Canonical upper-case mnemonic
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Soa => "SOA",
        }
    }

    /// Case-insensitive parse; `None` for anything outside the supported set.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }
}

/// Wire type code for a mnemonic, or `0` when unsupported.
#[must_use]
pub fn type_code(s: &str) -> u16 {
    RecordType::parse(s).map_or(0, RecordType::code)
}

impl FromStr for RecordType {
    type Err = DnspropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DnspropError::UnsupportedRecordType(s.trim().to_string()))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resource record value returned by a resolver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Answer {
    /// Rendered value: IP text, target name, joined TXT strings, `"mname rname"` for SOA
    pub value: String,

    /// TTL in seconds as seen on the wire
    pub ttl: u32,
}

impl Answer {
    /// Create an answer
    #[must_use]
    pub fn new(value: impl Into<String>, ttl: u32) -> Self {
        Self {
            value: value.into(),
            ttl,
        }
    }

    /// Compare against a user-supplied value, ignoring case and a trailing dot.
    #[must_use]
    pub fn matches(&self, expected: &str) -> bool {
        let trim = |s: &str| s.trim().trim_end_matches('.').to_ascii_lowercase();
        trim(&self.value) == trim(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_types_have_codes() {
        for t in ["A", "aaaa", "Cname", "TXT", "mx", "NS", "soa"] {
            assert_ne!(type_code(t), 0, "{t} should be supported");
        }
        assert_eq!(type_code("AAAA"), 28);
    }

    #[test]
    fn unsupported_types_map_to_zero() {
        assert_eq!(type_code("PTR"), 0);
        assert_eq!(type_code(""), 0);
        assert!("SRV".parse::<RecordType>().is_err());
    }

    #[test]
    fn answer_matching_ignores_case_and_root_dot() {
        let answer = Answer::new("NS1.Example.com.", 300);
        assert!(answer.matches("ns1.example.com"));
        assert!(!answer.matches("ns2.example.com"));
    }
}
