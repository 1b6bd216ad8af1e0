use super::PortProbe;
use crate::config::ScanConfig;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// TCP connect scan against the configured port set.
///
/// A connection that succeeds is dropped immediately; refused or timed-out
/// ports are simply closed/filtered. Results keep the port set's order.
pub struct ConnectScanner {
    ports: Vec<u16>,
    connect_timeout: Duration,
    max_concurrent: usize,
}

impl ConnectScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            ports: config.common_ports.clone(),
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            max_concurrent: config.max_concurrent_connects.max(1),
        }
    }
}

#[async_trait]
impl PortProbe for ConnectScanner {
    async fn scan(&self, addr: Ipv4Addr) -> Vec<u16> {
        let connect_timeout = self.connect_timeout;
        let open: HashSet<u16> = stream::iter(self.ports.iter().copied())
            .map(|port| async move {
                match timeout(
                    connect_timeout,
                    TcpStream::connect((IpAddr::V4(addr), port)),
                )
                .await
                {
                    Ok(Ok(stream)) => {
                        drop(stream);
                        Some(port)
                    }
                    _ => None,
                }
            })
            .buffer_unordered(self.max_concurrent)
            .filter_map(|result| async move { result })
            .collect()
            .await;

        self.ports
            .iter()
            .copied()
            .filter(|p| open.contains(p))
            .collect()
    }
}
