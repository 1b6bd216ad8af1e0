use crate::config::ScanConfig;
use crate::detect::{
    hostname::DnsMdnsResolver, mac::ArpCacheSource, port::ConnectScanner, NameResolver,
    NeighborSource, PortProbe, Probe,
};
use crate::errors::ScanError;
use crate::model::{Host, ScanMode, ScanReport};
use crate::net::{ping::IcmpProbe, subnet::Subnet};
use futures::stream::{self, StreamExt};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Cooperative cancellation flag shared between the scan and its caller.
///
/// Completed work is kept; in-flight probes are abandoned when the
/// collector observes the flag.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Orchestrates one scan: enumerate, probe, enrich, optionally port-scan,
/// then sort. All per-scan data lives and dies inside `scan`.
pub struct ScanEngine {
    config: ScanConfig,
    probe: Arc<dyn Probe>,
    neighbors: Arc<dyn NeighborSource>,
    resolver: Arc<dyn NameResolver>,
    ports: Arc<dyn PortProbe>,
}

impl ScanEngine {
    /// Engine with the production probes wired in
    pub fn new(config: ScanConfig) -> Self {
        let probe = Arc::new(IcmpProbe::new(&config));
        let resolver = Arc::new(DnsMdnsResolver::new(&config));
        let ports = Arc::new(ConnectScanner::new(&config));
        Self {
            probe,
            neighbors: Arc::new(ArpCacheSource::new()),
            resolver,
            ports,
            config,
        }
    }

    /// Engine with caller-supplied components
    pub fn with_components(
        config: ScanConfig,
        probe: Arc<dyn Probe>,
        neighbors: Arc<dyn NeighborSource>,
        resolver: Arc<dyn NameResolver>,
        ports: Arc<dyn PortProbe>,
    ) -> Self {
        Self {
            config,
            probe,
            neighbors,
            resolver,
            ports,
        }
    }

    /// Run one scan over `subnet`.
    ///
    /// Only subnet validation fails the call. Per-host failures degrade to
    /// field defaults; cancellation after enumeration returns whatever has
    /// completed, sorted as usual.
    pub async fn scan(
        &self,
        subnet: &Subnet,
        mode: ScanMode,
        cancel: &CancelToken,
    ) -> Result<ScanReport, ScanError> {
        let start = Instant::now();

        if subnet.prefix() < self.config.min_prefix_len {
            return Err(ScanError::SubnetTooLarge {
                prefix: subnet.prefix(),
                min_prefix: self.config.min_prefix_len,
            });
        }
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        let targets: Vec<Ipv4Addr> = subnet.hosts().collect();
        debug!(%subnet, targets = targets.len(), "starting sweep");

        let alive = self.sweep(targets, cancel).await;
        debug!(alive = alive.len(), "sweep complete");

        let mut hosts: Vec<Host> = alive.iter().copied().map(Host::new).collect();

        if !hosts.is_empty() && !cancel.is_cancelled() {
            // Neighbor cache read and hostname resolution proceed in parallel;
            // the table is read exactly once and shared read-only afterwards.
            let (neighbor_table, names) =
                tokio::join!(self.neighbors.read(), self.resolve_names(&alive, cancel));

            for host in &mut hosts {
                host.mac = neighbor_table.get(&host.addr).cloned();
            }
            for (addr, name) in names {
                if let Some(host) = hosts.iter_mut().find(|h| h.addr == addr) {
                    host.hostname = name;
                }
            }
        }

        if mode == ScanMode::Ports && !hosts.is_empty() && !cancel.is_cancelled() {
            for (addr, open_ports) in self.scan_ports(&alive, cancel).await {
                if let Some(host) = hosts.iter_mut().find(|h| h.addr == addr) {
                    host.open_ports = open_ports;
                }
            }
        }

        hosts.sort_by_key(|h| u32::from(h.addr));
        Ok(ScanReport {
            hosts,
            elapsed: start.elapsed(),
        })
    }

    async fn sweep(&self, targets: Vec<Ipv4Addr>, cancel: &CancelToken) -> Vec<Ipv4Addr> {
        let mut results = stream::iter(targets)
            .map(|addr| {
                let probe = Arc::clone(&self.probe);
                async move { (addr, probe.probe(addr).await) }
            })
            .buffer_unordered(self.config.max_concurrent_probes.max(1));

        let mut alive = Vec::new();
        while let Some((addr, reachable)) = results.next().await {
            if reachable {
                alive.push(addr);
            }
            if cancel.is_cancelled() {
                break;
            }
        }
        alive
    }

    async fn resolve_names(
        &self,
        alive: &[Ipv4Addr],
        cancel: &CancelToken,
    ) -> Vec<(Ipv4Addr, Option<String>)> {
        let mut results = stream::iter(alive.iter().copied())
            .map(|addr| {
                let resolver = Arc::clone(&self.resolver);
                async move { (addr, resolver.resolve(addr).await) }
            })
            .buffer_unordered(self.config.max_concurrent_resolves.max(1));

        let mut resolved = Vec::new();
        while let Some(item) = results.next().await {
            resolved.push(item);
            if cancel.is_cancelled() {
                break;
            }
        }
        resolved
    }

    async fn scan_ports(
        &self,
        alive: &[Ipv4Addr],
        cancel: &CancelToken,
    ) -> Vec<(Ipv4Addr, Vec<u16>)> {
        // hosts-in-flight times the per-host connect bound stays within the
        // global probe budget
        let hosts_in_flight = (self.config.max_concurrent_probes
            / self.config.max_concurrent_connects.max(1))
        .max(1);

        let mut results = stream::iter(alive.iter().copied())
            .map(|addr| {
                let ports = Arc::clone(&self.ports);
                async move { (addr, ports.scan(addr).await) }
            })
            .buffer_unordered(hosts_in_flight);

        let mut scanned = Vec::new();
        while let Some(item) = results.next().await {
            scanned.push(item);
            if cancel.is_cancelled() {
                break;
            }
        }
        scanned
    }
}
