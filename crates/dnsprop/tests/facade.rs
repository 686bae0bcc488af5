use std::time::Duration;

use dnsprop::{Dispatcher, Lookup, Readiness, Status};

#[test]
fn validates_before_dispatch() {
    assert_eq!(
        dnsprop::validate::validate_domain_name("Example.COM.").unwrap(),
        "example.com"
    );
    assert!(dnsprop::validate::validate_record_type("PTR").is_err());
    assert_eq!(dnsprop::geo::default_resolvers().len(), 30);
}

#[test]
fn unsupported_type_is_reported_per_server() {
    let servers = vec!["192.0.2.1".to_string(), "192.0.2.2".to_string()];
    let results = tokio_test::block_on(Dispatcher::default().resolve(
        &Lookup::new("example.com", "PTR", false),
        &servers,
        None,
    ));

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.status == Status::Error));
}

#[tokio::test]
async fn invalid_servers_make_probe_degraded() {
    let servers = vec!["not-an-address".to_string()];
    let verdict = dnsprop::readiness(&servers, Duration::from_secs(1), None).await;
    assert_eq!(verdict, Readiness::Degraded);
}
