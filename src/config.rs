/// Configuration settings for subnet scanning operations
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// TCP ports probed in ports mode, in the order they are reported
    pub common_ports: Vec<u16>,

    /// Timeout in milliseconds for a single reachability probe
    pub probe_timeout_ms: u64,

    /// Timeout in milliseconds for a single TCP connection attempt
    pub connect_timeout_ms: u64,

    /// Ceiling in milliseconds for one host's hostname resolution
    pub resolve_timeout_ms: u64,

    /// Maximum number of concurrent reachability probes
    pub max_concurrent_probes: usize,

    /// Maximum number of concurrent TCP connection attempts per host
    pub max_concurrent_connects: usize,

    /// Maximum number of hosts resolved concurrently
    pub max_concurrent_resolves: usize,

    /// Smallest accepted prefix length; wider subnets are refused
    pub min_prefix_len: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            common_ports: vec![
                21,    // FTP
                22,    // SSH
                23,    // Telnet
                80,    // HTTP
                443,   // HTTPS
                445,   // SMB
                631,   // IPP
                3306,  // MySQL
                3389,  // RDP
                5353,  // mDNS
                8080,  // HTTP-Proxy
                9100,  // JetDirect
                62078, // iOS lockdown
            ],
            probe_timeout_ms: 1_000,
            connect_timeout_ms: 400,
            resolve_timeout_ms: 2_000,
            max_concurrent_probes: 64,
            max_concurrent_connects: 16,
            max_concurrent_resolves: 30,
            min_prefix_len: 16,
        }
    }
}
