use crate::config::ScanConfig;
use crate::detect::Probe;
use crate::errors::ScanError;
use async_trait::async_trait;
use network_interface::{Addr, NetworkInterface, NetworkInterfaceConfig};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use surge_ping::ping;
use tokio::time::timeout;

/// Subnet parsing and host-address enumeration
pub mod subnet {
    use super::*;

    /// A parsed IPv4 CIDR. Host bits of the given address are masked off,
    /// so "192.168.1.5/24" and "192.168.1.0/24" denote the same subnet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Subnet {
        network: Ipv4Addr,
        prefix: u8,
    }

    impl Subnet {
        /// Parse CIDR notation ("192.168.1.0/24")
        pub fn parse(text: &str) -> Result<Self, ScanError> {
            let invalid =
                |why: &str| ScanError::InvalidSubnet(text.to_string(), why.to_string());

            let (addr_part, prefix_part) = text
                .split_once('/')
                .ok_or_else(|| invalid("expected CIDR notation (address/prefix)"))?;
            let addr: Ipv4Addr = addr_part
                .parse()
                .map_err(|_| invalid("bad IPv4 address"))?;
            let prefix: u8 = prefix_part
                .parse()
                .map_err(|_| invalid("bad prefix length"))?;
            if prefix > 32 {
                return Err(invalid("prefix length must be in 0..=32"));
            }

            Ok(Self {
                network: Ipv4Addr::from(u32::from(addr) & Self::mask(prefix)),
                prefix,
            })
        }

        pub fn network(&self) -> Ipv4Addr {
            self.network
        }

        pub fn prefix(&self) -> u8 {
            self.prefix
        }

        /// Number of usable host addresses, without enumerating them
        pub fn host_count(&self) -> u64 {
            let size = 1u64 << (32 - self.prefix);
            if self.prefix >= 31 {
                size
            } else {
                size - 2
            }
        }

        /// Iterate the usable host addresses in ascending order.
        ///
        /// For prefixes >= 31 every address is usable; below that the
        /// network and broadcast addresses are excluded.
        pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> {
            let base = u32::from(self.network);
            let top = base | !Self::mask(self.prefix);
            let (first, last) = if self.prefix >= 31 {
                (base, top)
            } else {
                (base + 1, top - 1)
            };
            (first..=last).map(Ipv4Addr::from)
        }

        fn mask(prefix: u8) -> u32 {
            if prefix == 0 {
                0
            } else {
                !((1u32 << (32 - prefix)) - 1)
            }
        }
    }

    impl fmt::Display for Subnet {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}/{}", self.network, self.prefix)
        }
    }
}

/// ICMP reachability probing
pub mod ping {
    use super::*;

    /// One ICMP echo per address, no retries; an address that does not
    /// answer within the timeout is unreachable.
    pub struct IcmpProbe {
        probe_timeout: Duration,
    }

    impl IcmpProbe {
        pub fn new(config: &ScanConfig) -> Self {
            Self {
                probe_timeout: Duration::from_millis(config.probe_timeout_ms),
            }
        }
    }

    #[async_trait]
    impl Probe for IcmpProbe {
        async fn probe(&self, addr: Ipv4Addr) -> bool {
            let payload = [0u8; 56];
            matches!(
                timeout(self.probe_timeout, ping(IpAddr::V4(addr), &payload)).await,
                Ok(Ok((_packet, _rtt)))
            )
        }
    }
}

/// Network interface enumeration
pub mod interface {
    use super::subnet::Subnet;
    use super::*;

    /// Tunnel/VPN/bridge-style and virtual interfaces, skipped everywhere
    const IGNORED_PREFIXES: &[&str] = &[
        "lo", "utun", "ppp", "ipsec", "bridge", "docker", "veth", "tun", "tap",
    ];

    fn is_ignored(name: &str) -> bool {
        let low = name.to_lowercase();
        IGNORED_PREFIXES.iter().any(|p| low.starts_with(p))
    }

    fn subnet_of(iface: &NetworkInterface) -> Option<Subnet> {
        for addr in &iface.addr {
            if let Addr::V4(v4) = addr {
                if v4.ip.is_loopback() || v4.ip.is_unspecified() {
                    continue;
                }
                if let Some(netmask) = v4.netmask {
                    let prefix = u32::from(netmask).count_ones() as u8;
                    return Subnet::parse(&format!("{}/{}", v4.ip, prefix)).ok();
                }
            }
        }
        None
    }

    /// All scannable (interface name, subnet) pairs, one entry per distinct
    /// subnet, in a stable name order
    pub fn available_networks() -> Result<Vec<(String, Subnet)>, ScanError> {
        let mut interfaces = NetworkInterface::show()?;
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));

        let mut seen = Vec::new();
        let mut result = Vec::new();
        for iface in &interfaces {
            if is_ignored(&iface.name) {
                continue;
            }
            if let Some(subnet) = subnet_of(iface) {
                if !seen.contains(&subnet) {
                    seen.push(subnet);
                    result.push((iface.name.clone(), subnet));
                }
            }
        }
        Ok(result)
    }

    /// Resolve an interface name ("en0", "eth0") to its subnet
    pub fn network_for_interface(name: &str) -> Result<Subnet, ScanError> {
        let interfaces = NetworkInterface::show()?;
        for iface in &interfaces {
            if iface.name == name {
                if let Some(subnet) = subnet_of(iface) {
                    return Ok(subnet);
                }
            }
        }
        Err(ScanError::InterfaceCustom(format!(
            "Interface '{}' not found or has no valid IPv4 subnet",
            name
        )))
    }

    /// Print all scannable interfaces and their subnets
    pub fn list_networks() -> Result<(), ScanError> {
        let networks = available_networks()?;
        if networks.is_empty() {
            println!("No interfaces with an IPv4 subnet found.");
            return Ok(());
        }
        println!("Available networks:");
        for (name, subnet) in networks {
            println!("  {:<12} {}", name, subnet);
        }
        Ok(())
    }
}
