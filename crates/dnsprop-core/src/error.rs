use thiserror::Error;

/// Result type alias for dnsprop operations
pub type Result<T> = std::result::Result<T, DnspropError>;

/// Errors raised before any DNS traffic is sent.
///
/// Per-resolver failures are never errors: they are reported through
/// [`crate::Status`] on the individual result.
#[derive(Error, Debug)]
pub enum DnspropError {
    /// Domain name failed syntax or IDNA checks
    #[error("invalid domain name: {0}")]
    InvalidDomain(String),

    /// Record type outside the supported set
    #[error("unsupported record type '{0}' (supported: A, AAAA, CNAME, TXT, MX, NS, SOA)")]
    UnsupportedRecordType(String),

    /// Server is not an IP literal with optional port
    #[error("invalid server address '{0}': must be a valid IPv4 or IPv6 address")]
    InvalidServer(String),

    /// More servers than a single request may fan out to
    #[error("too many servers: {count} (max {max})")]
    TooManyServers {
        /// Servers supplied
        count: usize,
        /// Configured ceiling
        max: usize,
    },

    /// Nothing left to query after deduplication
    #[error("no resolvers configured")]
    NoServers,

    /// Configuration value is missing or out of range
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DnspropError {
    /// Returns true if the error was caused by caller input rather than setup
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDomain(_)
                | Self::UnsupportedRecordType(_)
                | Self::InvalidServer(_)
                | Self::TooManyServers { .. }
                | Self::NoServers
        )
    }
}
