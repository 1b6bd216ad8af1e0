use crate::model::NeighborTable;
use async_trait::async_trait;
use std::net::Ipv4Addr;

// Submodule declarations
pub mod hostname;
pub mod mac;
pub mod port;

/// Reachability check for a single address
///
/// "Unreachable" is a normal outcome, not an error; implementations carry
/// their own timeout.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, addr: Ipv4Addr) -> bool;
}

/// One-shot read of the OS IP-to-MAC neighbor cache
///
/// A failed read degrades to an empty table; the scan continues without
/// MAC data.
#[async_trait]
pub trait NeighborSource: Send + Sync {
    async fn read(&self) -> NeighborTable;
}

/// Best-effort hostname lookup for a reachable address
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(&self, addr: Ipv4Addr) -> Option<String>;
}

/// TCP connect scan of one host against a fixed port set
#[async_trait]
pub trait PortProbe: Send + Sync {
    async fn scan(&self, addr: Ipv4Addr) -> Vec<u16>;
}
