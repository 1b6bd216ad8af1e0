use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use serde::Serialize;

/// Mapping from IPv4 address to MAC string, built once per scan from the
/// OS neighbor cache. MACs are lowercase colon-hex with zero-padded octets.
pub type NeighborTable = HashMap<Ipv4Addr, String>;

/// What a scan gathers per host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Reachability + MAC + hostname
    Hosts,
    /// Reachability + MAC + hostname + open TCP ports
    Ports,
}

/// A reachable host and everything the scan learned about it
#[derive(Debug, Clone, Serialize)]
pub struct Host {
    pub addr: Ipv4Addr,
    pub mac: Option<String>,
    pub hostname: Option<String>,
    pub open_ports: Vec<u16>,
}

impl Host {
    pub fn new(addr: Ipv4Addr) -> Self {
        Self {
            addr,
            mac: None,
            hostname: None,
            open_ports: Vec::new(),
        }
    }

    /// Hostname for display, falling back to "unknown"
    pub fn display_hostname(&self) -> &str {
        self.hostname.as_deref().unwrap_or("unknown")
    }
}

/// Final result of one scan invocation, sorted ascending by address
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub hosts: Vec<Host>,
    #[serde(skip)]
    pub elapsed: Duration,
}
