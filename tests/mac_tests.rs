use lansweep::detect::mac::{normalize_mac, parse_arp_output, parse_ip_neigh, parse_proc_arp};
use std::net::Ipv4Addr;

fn addr(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

#[test]
fn test_parse_ip_neigh_output() {
    let output = r#"
192.168.125.1 dev eth0 lladdr 00:1a:2b:3c:4d:5e REACHABLE
192.168.125.45 dev eth0 lladdr A8:42:A1:B9:53:23 STALE
192.168.125.99 dev eth0  FAILED
fe80::1 dev eth0 lladdr 00:1a:2b:3c:4d:5e router REACHABLE
"#;

    let table = parse_ip_neigh(output);
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.get(&addr("192.168.125.1")).map(String::as_str),
        Some("00:1a:2b:3c:4d:5e")
    );
    assert_eq!(
        table.get(&addr("192.168.125.45")).map(String::as_str),
        Some("a8:42:a1:b9:53:23")
    );
}

#[test]
fn test_parse_arp_output_macos_format() {
    let output = r#"
? (192.168.1.1) at aa:bb:cc:dd:ee:ff on en0 ifscope [ethernet]
gateway (192.168.1.254) at 0:11:2:33:4:55 on en0 ifscope [ethernet]
? (192.168.1.9) at (incomplete) on en0 ifscope [ethernet]
? (224.0.0.251) at 1:0:5e:0:0:fb on en0 ifscope permanent [ethernet]
"#;

    let table = parse_arp_output(output);
    assert_eq!(
        table.get(&addr("192.168.1.1")).map(String::as_str),
        Some("aa:bb:cc:dd:ee:ff")
    );
    // octets without leading zeros are padded
    assert_eq!(
        table.get(&addr("192.168.1.254")).map(String::as_str),
        Some("00:11:02:33:04:55")
    );
    // incomplete entries are skipped
    assert!(!table.contains_key(&addr("192.168.1.9")));
}

#[test]
fn test_parse_proc_arp() {
    let contents = "\
IP address       HW type     Flags       HW address            Mask     Device
192.168.0.10     0x1         0x2         aa:bb:cc:dd:ee:01     *        eth0
192.168.0.20     0x1         0x0         00:00:00:00:00:00     *        eth0
";

    let table = parse_proc_arp(contents);
    assert_eq!(table.len(), 1);
    assert_eq!(
        table.get(&addr("192.168.0.10")).map(String::as_str),
        Some("aa:bb:cc:dd:ee:01")
    );
}

#[test]
fn test_parse_tolerates_garbage_lines() {
    let output = "complete nonsense\n\nat\n1.2.3.4 at\n";
    assert!(parse_arp_output(output).is_empty());
    assert!(parse_ip_neigh(output).is_empty());
}

#[test]
fn test_normalize_mac() {
    assert_eq!(
        normalize_mac("AA:BB:CC:DD:EE:FF").as_deref(),
        Some("aa:bb:cc:dd:ee:ff")
    );
    assert_eq!(
        normalize_mac("1:2:3:4:5:6").as_deref(),
        Some("01:02:03:04:05:06")
    );
    assert_eq!(normalize_mac("aa:bb:cc:dd:ee"), None);
    assert_eq!(normalize_mac("aa:bb:cc:dd:ee:ff:00"), None);
    assert_eq!(normalize_mac("zz:bb:cc:dd:ee:ff"), None);
    assert_eq!(normalize_mac("aabbccddeeff"), None);
    assert_eq!(normalize_mac(""), None);
}
