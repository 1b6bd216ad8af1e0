// ==========================================================
//  lansweep — bounded LAN subnet discovery
// ==========================================================

use lansweep::net::interface;
use lansweep::{table, CancelToken, ScanConfig, ScanEngine, ScanError, ScanMode, Subnet};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ScanError> {
    let raw_args: Vec<String> = std::env::args().collect();
    let mut args = raw_args.iter().skip(1);

    let mut jobs: Option<usize> = None;
    let mut with_ports = false;
    let mut as_json = false;
    let mut positional = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ports" => with_ports = true,
            "--json" => as_json = true,
            "--jobs" | "-j" => jobs = args.next().and_then(|s| s.parse().ok()),
            "--list" => {
                interface::list_networks()?;
                return Ok(());
            }
            "--help" | "-h" => {
                usage();
                return Ok(());
            }
            _ => positional = Some(arg.clone()),
        }
    }

    // Determine target subnet
    let subnet = match positional {
        None => {
            usage();
            println!();
            interface::list_networks()?;
            return Err(ScanError::Other("No network specified".to_string()));
        }
        Some(arg) => {
            if arg.contains('/') {
                Subnet::parse(&arg)?
            } else {
                // Convert interface name to its subnet
                interface::network_for_interface(&arg)?
            }
        }
    };

    let mut config = ScanConfig::default();
    if let Some(j) = jobs {
        config.max_concurrent_probes = j.max(1);
    }
    let mode = if with_ports {
        ScanMode::Ports
    } else {
        ScanMode::Hosts
    };

    // Ctrl-C returns the partial table instead of nothing
    let cancel = CancelToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    if !as_json {
        println!(
            "Scanning {} ({} hosts){}...",
            subnet,
            subnet.host_count(),
            if with_ports { " — port scan" } else { "" }
        );
        println!();
    }

    let engine = ScanEngine::new(config);
    let report = engine.scan(&subnet, mode, &cancel).await?;

    if as_json {
        let json = table::render_json(&report).map_err(|e| ScanError::Other(e.to_string()))?;
        println!("{json}");
        return Ok(());
    }

    if report.hosts.is_empty() {
        println!("No hosts responded.");
    } else {
        println!("{}", table::render(&report, mode));
    }
    println!();
    println!(
        "Done. {} host(s) responded in {:.2}s.",
        report.hosts.len(),
        report.elapsed.as_secs_f64()
    );
    Ok(())
}

fn usage() {
    println!("Usage: lansweep [OPTIONS] <CIDR|INTERFACE>");
    println!("Options:");
    println!("  --ports            scan common TCP ports on reachable hosts");
    println!("  --json             emit results as JSON instead of a table");
    println!("  -j, --jobs <N>     set concurrent probe limit (default: 64)");
    println!("  --list             list scannable interfaces and their subnets");
    println!("  -h, --help         show this help message");
    println!();
    println!("Examples:");
    println!("  lansweep 192.168.1.0/24          # IP, MAC, hostname");
    println!("  lansweep 192.168.1.0/24 --ports  # IP, MAC, open ports");
    println!("  lansweep en0                     # scan the subnet on en0");
}
