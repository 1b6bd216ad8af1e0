use super::NeighborSource;
use crate::errors::ScanError;
use crate::model::NeighborTable;
use async_trait::async_trait;
use std::net::Ipv4Addr;
use tokio::process::Command;
use tracing::{debug, warn};

/// Reads the OS neighbor (ARP) cache once per scan.
///
/// Tries `ip neigh show`, then `arp -an`, then `/proc/net/arp`. The cache
/// may contain stale entries for hosts that are gone; callers only look up
/// addresses they already found reachable.
pub struct ArpCacheSource;

impl ArpCacheSource {
    pub fn new() -> Self {
        Self
    }

    async fn read_inner(&self) -> Result<NeighborTable, ScanError> {
        if let Some(out) = run_command("ip", &["neigh", "show"]).await {
            let table = parse_ip_neigh(&out);
            if !table.is_empty() {
                return Ok(table);
            }
        }

        if let Some(out) = run_command("arp", &["-an"]).await {
            let table = parse_arp_output(&out);
            if !table.is_empty() {
                return Ok(table);
            }
        }

        match tokio::fs::read_to_string("/proc/net/arp").await {
            Ok(contents) => Ok(parse_proc_arp(&contents)),
            Err(e) => Err(ScanError::NeighborTableUnavailable(format!(
                "no usable neighbor cache source ({})",
                e
            ))),
        }
    }
}

impl Default for ArpCacheSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NeighborSource for ArpCacheSource {
    async fn read(&self) -> NeighborTable {
        match self.read_inner().await {
            Ok(table) => {
                debug!(entries = table.len(), "read neighbor cache");
                table
            }
            Err(e) => {
                warn!("continuing without MAC data: {}", e);
                NeighborTable::new()
            }
        }
    }
}

async fn run_command(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().await.ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `ip neigh show` output:
///
/// ```text
/// 192.168.1.1 dev eth0 lladdr 00:1a:2b:3c:4d:5e REACHABLE
/// 192.168.1.7 dev eth0  FAILED
/// ```
pub fn parse_ip_neigh(output: &str) -> NeighborTable {
    let mut table = NeighborTable::new();
    for line in output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Ok(ip) = parts.first().unwrap_or(&"").parse::<Ipv4Addr>() else {
            continue;
        };
        let Some(pos) = parts.iter().position(|p| *p == "lladdr") else {
            continue;
        };
        if let Some(mac) = parts.get(pos + 1).and_then(|m| normalize_mac(m)) {
            table.insert(ip, mac);
        }
    }
    table
}

/// Parse BSD/macOS `arp -an` output:
///
/// ```text
/// ? (192.168.1.1) at aa:bb:cc:dd:ee:ff on en0 ifscope [ethernet]
/// ? (192.168.1.9) at (incomplete) on en0 ifscope [ethernet]
/// ```
///
/// macOS prints MAC octets without leading zeros ("1:2:3:4:5:6").
pub fn parse_arp_output(output: &str) -> NeighborTable {
    let mut table = NeighborTable::new();
    for line in output.lines() {
        if line.to_lowercase().contains("incomplete") {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(pos) = parts.iter().position(|p| *p == "at") else {
            continue;
        };
        if pos == 0 {
            continue;
        }
        let ip_token = parts[pos - 1].trim_matches(|c| c == '(' || c == ')');
        let Ok(ip) = ip_token.parse::<Ipv4Addr>() else {
            continue;
        };
        if let Some(mac) = parts.get(pos + 1).and_then(|m| normalize_mac(m)) {
            table.insert(ip, mac);
        }
    }
    table
}

/// Parse `/proc/net/arp` (header line first, MAC in the fourth column)
pub fn parse_proc_arp(contents: &str) -> NeighborTable {
    let mut table = NeighborTable::new();
    for line in contents.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 || parts[3] == "00:00:00:00:00:00" {
            continue;
        }
        let Ok(ip) = parts[0].parse::<Ipv4Addr>() else {
            continue;
        };
        if let Some(mac) = normalize_mac(parts[3]) {
            table.insert(ip, mac);
        }
    }
    table
}

/// Normalize a colon-hex MAC to lowercase with zero-padded octets
pub fn normalize_mac(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 6 {
        return None;
    }
    let mut octets = Vec::with_capacity(6);
    for part in parts {
        if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        octets.push(format!("{:0>2}", part.to_lowercase()));
    }
    Some(octets.join(":"))
}
