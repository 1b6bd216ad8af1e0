use lansweep::config::ScanConfig;
use lansweep::detect::{hostname::DnsMdnsResolver, NameResolver};
use std::net::Ipv4Addr;
use std::time::Instant;

#[tokio::test(flavor = "multi_thread")]
async fn test_unresolvable_address_returns_none_within_ceiling() {
    let config = ScanConfig {
        resolve_timeout_ms: 300,
        ..ScanConfig::default()
    };
    let resolver = DnsMdnsResolver::new(&config);

    // TEST-NET-3, never allocated
    let target: Ipv4Addr = "203.0.113.77".parse().unwrap();

    let start = Instant::now();
    let name = resolver.resolve(target).await;
    let elapsed = start.elapsed();

    assert_eq!(name, None);
    assert!(
        elapsed.as_millis() < 2_000,
        "resolution took {:?}, ceiling was 300ms",
        elapsed
    );
}
