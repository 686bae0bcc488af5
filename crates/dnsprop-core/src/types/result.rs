use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::Answer;
use crate::geo;
use crate::server::normalize_server;

/// Outcome of one resolver for one query.
///
/// Negative protocol outcomes (`nxdomain`, `servfail`, `noanswer`, other
/// response codes) are valid answers about the name, not failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Status {
    /// NOERROR with at least one usable answer
    Ok,
    /// NOERROR but nothing of the requested type
    NoAnswer,
    /// The name does not exist
    NxDomain,
    /// The resolver failed to answer
    ServFail,
    /// No response before the effective deadline
    Timeout,
    /// Local validation or transport failure
    Error,
    /// Any other response code, lower-cased protocol mnemonic
    Other(String),
}

impl Status {
    /// String form used on the wire and in output
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "ok",
            Self::NoAnswer => "noanswer",
            Self::NxDomain => "nxdomain",
            Self::ServFail => "servfail",
            Self::Timeout => "timeout",
            Self::Error => "error",
            Self::Other(s) => s,
        }
    }

    /// True when a DNS response was actually received
    #[must_use]
    pub const fn is_response(&self) -> bool {
        !matches!(self, Self::Timeout | Self::Error)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ok" => Self::Ok,
            "noanswer" => Self::NoAnswer,
            "nxdomain" => Self::NxDomain,
            "servfail" => Self::ServFail,
            "timeout" => Self::Timeout,
            "error" => Self::Error,
            _ => Self::Other(s),
        }
    }
}

/// The question asked of every resolver in one fan-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// ASCII domain name, trailing dot optional
    pub name: String,
    /// Record type mnemonic; unsupported values yield [`Status::Error`] per server
    pub record_type: String,
    /// Request DNSSEC records (EDNS0 DO bit)
    pub dnssec: bool,
}

impl Lookup {
    /// Create a lookup
    #[must_use]
    pub fn new(name: impl Into<String>, record_type: impl Into<String>, dnssec: bool) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            dnssec,
        }
    }

    /// Cache key of this lookup against one server
    #[must_use]
    pub fn cache_key(&self, server: &str) -> String {
        cache_key(&self.name, &self.record_type, server, self.dnssec)
    }
}

/// Build the cache key `server|name|TYPE|dnssec=0|1`.
///
/// Insensitive to name and type case and to the server's port.
#[must_use]
pub fn cache_key(name: &str, record_type: &str, server: &str, dnssec: bool) -> String {
    format!(
        "{}|{}|{}|dnssec={}",
        normalize_server(server),
        name.to_lowercase(),
        record_type.to_uppercase(),
        u8::from(dnssec)
    )
}

/// One resolver's outcome for one lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveResult {
    /// Server address with the port stripped
    pub server: String,

    /// Directory label or `"unknown"`
    pub region: String,

    /// Approximate latitude, 0 when unknown
    pub latitude: f64,

    /// Approximate longitude, 0 when unknown
    pub longitude: f64,

    /// Terminal status of the exchange
    pub status: Status,

    /// Round-trip time in milliseconds; 0 when no response was received
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rtt_ms: f64,

    /// Parsed answer records, in wire order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<Answer>,

    /// Owner names from the authority section
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authority: Vec<String>,

    /// Authenticated Data bit from the response header
    #[serde(rename = "ad", default, skip_serializing_if = "std::ops::Not::not")]
    pub authenticated_data: bool,

    /// When this result was handed to the caller
    #[serde(with = "rfc3339_seconds")]
    pub when: DateTime<Utc>,

    /// How long the result stays valid for cache readers
    #[serde(skip)]
    pub cache_ttl: Duration,

    /// When the underlying wire exchange happened
    #[serde(skip)]
    pub queried_at: DateTime<Utc>,
}

impl ResolveResult {
    /// Fresh result for `server`, stamped now, with directory data filled in.
    ///
    /// Status starts as [`Status::Error`] until an exchange says otherwise.
    #[must_use]
    pub fn for_server(server: &str) -> Self {
        let now = Utc::now();
        let (latitude, longitude) = geo::coordinates_for(server);
        Self {
            server: normalize_server(server),
            region: geo::region_for(server).to_string(),
            latitude,
            longitude,
            status: Status::Error,
            rtt_ms: 0.0,
            answers: Vec::new(),
            authority: Vec::new(),
            authenticated_data: false,
            when: now,
            cache_ttl: Duration::ZERO,
            queried_at: now,
        }
    }

    /// Whether a cache reader may still serve this result at `now`.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        if self.cache_ttl.is_zero() {
            return false;
        }
        let age = (now - self.queried_at).to_std().unwrap_or(Duration::ZERO);
        age <= self.cache_ttl
    }

    /// Whether a cache reader may still serve this result.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

mod rfc3339_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(when: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&when.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
