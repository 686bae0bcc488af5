use thiserror::Error;

/// Why a single wire exchange produced no usable response.
///
/// Only used to pick a status; it never leaves the crate.
#[derive(Error, Debug)]
pub(crate) enum ExchangeError {
    /// Effective deadline reached before a response arrived
    #[error("exchange timed out")]
    Timeout,

    /// Socket-level failure
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),

    /// Response bytes could not be decoded
    #[error("protocol error: {0}")]
    Proto(#[from] hickory_proto::ProtoError),

    /// Response decoded but does not belong to our query
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Server string is not an IP literal
    #[error("invalid server address: {0}")]
    InvalidServer(String),
}

impl ExchangeError {
    /// Whether this failure should be reported as a timeout
    pub(crate) fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Io(e) => {
                e.kind() == std::io::ErrorKind::TimedOut
                    || e.to_string().to_lowercase().contains("timeout")
            }
            _ => false,
        }
    }
}

impl From<tokio::time::error::Elapsed> for ExchangeError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_classification() {
        assert!(ExchangeError::Timeout.is_timeout());
        let timed_out = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert!(ExchangeError::Io(timed_out).is_timeout());
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(!ExchangeError::Io(refused).is_timeout());
        assert!(!ExchangeError::Malformed("id".into()).is_timeout());
    }
}
