//! Region and coordinate directory for well-known public resolvers.
//!
//! Coordinates are approximate datacenter or city locations. Anycast
//! providers answer from many sites, so treat them as a label for map
//! placement, not a measurement. Secondary addresses of the same provider are
//! nudged by 0.01 degrees so markers do not overlap.

use crate::server::normalize_server;

/// Region label reported for servers missing from the directory
pub const UNKNOWN_REGION: &str = "unknown";

/// A public resolver with a known location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownResolver {
    /// IP address, no port
    pub address: &'static str,
    /// Human label: city, region, operator
    pub region: &'static str,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

const fn known(
    address: &'static str,
    region: &'static str,
    latitude: f64,
    longitude: f64,
) -> KnownResolver {
    KnownResolver {
        address,
        region,
        latitude,
        longitude,
    }
}

/// All resolvers with a known location, in default query order.
pub static DIRECTORY: &[KnownResolver] = &[
    // North America - US West
    known("1.1.1.1", "San Francisco, CA, Cloudflare", 37.7749, -122.4194),
    known("1.0.0.1", "San Francisco, CA, Cloudflare", 37.7849, -122.4094),
    known("8.8.8.8", "Mountain View, CA, Google", 37.4220, -122.0841),
    known("8.8.4.4", "Mountain View, CA, Google", 37.4320, -122.0741),
    known("9.9.9.9", "Berkeley, CA, Quad9", 37.8715, -122.2730),
    known("149.112.112.112", "Berkeley, CA, Quad9", 37.8815, -122.2630),
    known("208.67.222.222", "San Francisco, CA, OpenDNS", 37.7849, -122.4394),
    known("208.67.220.220", "San Francisco, CA, OpenDNS", 37.7949, -122.4294),
    // North America - US East and Central
    known("156.154.70.1", "Ashburn, VA, Neustar", 39.0438, -77.4874),
    known("156.154.71.1", "Ashburn, VA, Neustar", 39.0538, -77.4774),
    known("4.2.2.1", "Broomfield, CO, Level3", 39.9142, -105.0519),
    known("4.2.2.2", "Broomfield, CO, Level3", 39.9242, -105.0419),
    // North America - Canada
    known("76.76.2.0", "Toronto, ON, ControlD", 43.6532, -79.3832),
    known("76.76.10.0", "Toronto, ON, ControlD", 43.6632, -79.3732),
    // Europe - Western
    known("94.140.14.14", "Limassol, Cyprus, AdGuard", 34.7070, 33.0220),
    known("94.140.15.15", "Limassol, Cyprus, AdGuard", 34.7170, 33.0320),
    known("185.228.168.9", "Amsterdam, Netherlands, CleanBrowsing", 52.3676, 4.9041),
    known("185.228.169.9", "Amsterdam, Netherlands, CleanBrowsing", 52.3776, 4.9141),
    // Europe - Eastern
    known("77.88.8.8", "Moscow, Russia, Yandex", 55.7558, 37.6173),
    known("77.88.8.1", "Moscow, Russia, Yandex", 55.7658, 37.6273),
    // Asia - China
    known("114.114.114.114", "Nanjing, Jiangsu, 114DNS", 32.0603, 118.7969),
    known("114.114.115.115", "Nanjing, Jiangsu, 114DNS", 32.0703, 118.8069),
    known("223.5.5.5", "Hangzhou, Zhejiang, Alibaba DNS", 30.2741, 120.1551),
    known("223.6.6.6", "Hangzhou, Zhejiang, Alibaba DNS", 30.2841, 120.1651),
    known("119.29.29.29", "Shenzhen, Guangdong, DNSPod", 22.5431, 114.0579),
    // Asia - Taiwan
    known("168.95.1.1", "Taipei, Taiwan, HiNet", 25.0330, 121.5654),
    known("168.95.192.1", "Taipei, Taiwan, HiNet", 25.0430, 121.5754),
    // Asia-Pacific
    known("1.1.1.2", "Sydney, NSW, Cloudflare", -33.8688, 151.2093),
    known("1.0.0.2", "Sydney, NSW, Cloudflare", -33.8588, 151.2193),
    // South America
    known("200.221.11.100", "Rio de Janeiro, Brazil, NET", -22.9068, -43.1729),
];

/// Look up a server (port allowed) in the directory.
#[must_use]
pub fn lookup(server: &str) -> Option<&'static KnownResolver> {
    let host = normalize_server(server);
    DIRECTORY.iter().find(|r| r.address == host)
}

/// Region label for a server, or [`UNKNOWN_REGION`].
#[must_use]
pub fn region_for(server: &str) -> &'static str {
    lookup(server).map_or(UNKNOWN_REGION, |r| r.region)
}

/// `(latitude, longitude)` for a server, `(0.0, 0.0)` when unknown.
#[must_use]
pub fn coordinates_for(server: &str) -> (f64, f64) {
    lookup(server).map_or((0.0, 0.0), |r| (r.latitude, r.longitude))
}

/// Every directory address, used when no resolver list is configured.
#[must_use]
pub fn default_resolvers() -> Vec<String> {
    DIRECTORY.iter().map(|r| r.address.to_string()).collect()
}
