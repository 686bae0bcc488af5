//! Resolver address handling.
//!
//! Servers are written as `ip`, `ip:port`, or `[v6]:port`. The host part is
//! what identifies a resolver for caching and directory lookups; the port
//! only matters when dialing.

use std::net::{IpAddr, SocketAddr};

/// Standard DNS port used when a server carries none
pub const DNS_PORT: u16 = 53;

/// Strip the port from a server string and canonicalise the address.
///
/// Anything that does not parse as an address is returned trimmed but
/// otherwise untouched.
#[must_use]
pub fn normalize_server(server: &str) -> String {
    let server = server.trim();
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return addr.ip().to_string();
    }
    if let Ok(ip) = server.parse::<IpAddr>() {
        return ip.to_string();
    }
    server.to_string()
}

/// Socket address to dial for a server, defaulting to port 53.
#[must_use]
pub fn socket_addr(server: &str) -> Option<SocketAddr> {
    let server = server.trim();
    server.parse::<SocketAddr>().ok().or_else(|| {
        server
            .parse::<IpAddr>()
            .ok()
            .map(|ip| SocketAddr::new(ip, DNS_PORT))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_port() {
        assert_eq!(normalize_server("8.8.8.8:53"), "8.8.8.8");
        assert_eq!(normalize_server(" 1.1.1.1 "), "1.1.1.1");
        assert_eq!(normalize_server("[2001:4860:4860::8888]:53"), "2001:4860:4860::8888");
        assert_eq!(normalize_server("2001:4860:4860:0::8888"), "2001:4860:4860::8888");
        assert_eq!(normalize_server("not-an-ip"), "not-an-ip");
    }

    #[test]
    fn socket_addr_defaults_port() {
        assert_eq!(socket_addr("9.9.9.9"), Some("9.9.9.9:53".parse().unwrap()));
        assert_eq!(socket_addr("9.9.9.9:5353"), Some("9.9.9.9:5353".parse().unwrap()));
        assert_eq!(socket_addr("::1"), Some("[::1]:53".parse().unwrap()));
        assert_eq!(socket_addr("dns.google"), None);
    }
}
