use super::NameResolver;
use crate::config::ScanConfig;
use async_trait::async_trait;
use dns_lookup::lookup_addr;
use mdns_sd::{ServiceDaemon, ServiceEvent};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::debug;

/// mDNS-SD service types that usually expose hostnames
const SERVICES: &[&str] = &[
    "_workstation._tcp.local.",
    "_smb._tcp.local.",
    "_airplay._tcp.local.",
    "_ipp._tcp.local.",
];

/// Reverse DNS first, then an mDNS browse matched by address.
///
/// The whole attempt for one host is capped by a single deadline so an
/// unresponsive resolver cannot stall the scan.
pub struct DnsMdnsResolver {
    resolve_timeout: Duration,
}

impl DnsMdnsResolver {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            resolve_timeout: Duration::from_millis(config.resolve_timeout_ms),
        }
    }

    async fn reverse_dns(&self, addr: Ipv4Addr) -> Option<String> {
        let ip = IpAddr::V4(addr);
        let name = tokio::task::spawn_blocking(move || lookup_addr(&ip).ok())
            .await
            .ok()
            .flatten()?;
        // getnameinfo may hand back the numeric form instead of failing
        if name == addr.to_string() {
            return None;
        }
        Some(name)
    }

    async fn mdns_instance(&self, addr: Ipv4Addr, deadline: Instant) -> Option<String> {
        let ip = IpAddr::V4(addr);
        let daemon = ServiceDaemon::new().ok()?;
        let mut candidates = Vec::new();

        for &service in SERVICES {
            let receiver = match daemon.browse(service) {
                Ok(r) => r,
                Err(_) => continue,
            };

            loop {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }

                match timeout(deadline - now, receiver.recv_async()).await {
                    Ok(Ok(ServiceEvent::ServiceResolved(info))) => {
                        if info
                            .get_addresses()
                            .iter()
                            .any(|scoped_ip| *scoped_ip == ip)
                        {
                            let mut hostname = info
                                .get_fullname()
                                .trim_end_matches(service)
                                .trim_end_matches('.');
                            if hostname.is_empty() {
                                hostname = info
                                    .get_hostname()
                                    .trim_end_matches('.')
                                    .trim_end_matches(".local");
                            }
                            candidates.push(hostname.to_string());
                        }
                    }
                    Ok(Ok(_)) => continue,
                    Ok(Err(_)) | Err(_) => break,
                }
            }

            daemon.stop_browse(service).ok();
            if Instant::now() >= deadline {
                break;
            }
        }

        daemon.shutdown().ok();

        candidates
            .iter()
            .filter(|n| !n.eq_ignore_ascii_case("localhost"))
            .min_by_key(|n| n.len())
            .cloned()
    }
}

#[async_trait]
impl NameResolver for DnsMdnsResolver {
    async fn resolve(&self, addr: Ipv4Addr) -> Option<String> {
        let deadline = Instant::now() + self.resolve_timeout;
        let attempt = async {
            if let Some(name) = self.reverse_dns(addr).await {
                return Some(name);
            }
            self.mdns_instance(addr, deadline).await
        };
        match timeout(self.resolve_timeout, attempt).await {
            Ok(name) => name,
            Err(_) => {
                debug!(%addr, "hostname resolution timed out");
                None
            }
        }
    }
}
