use thiserror::Error;

/// Error types for subnet scanning operations
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid subnet '{0}': {1}")]
    InvalidSubnet(String, String),

    #[error("Subnet /{prefix} is too large; the configured cap is /{min_prefix}")]
    SubnetTooLarge { prefix: u8, min_prefix: u8 },

    #[error("Neighbor table unavailable: {0}")]
    NeighborTableUnavailable(String),

    #[error("Network Interface Error: {0}")]
    InterfaceWrapped(#[from] network_interface::Error),

    #[error("Network Interface Error: {0}")]
    InterfaceCustom(String),

    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scan cancelled before any host was discovered")]
    Cancelled,

    #[error("Error: {0}")]
    Other(String),
}
