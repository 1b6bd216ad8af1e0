use crate::model::{ScanMode, ScanReport};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

/// Render a report as a table: IP | MAC | Hostname in hosts mode,
/// IP | MAC | Open Ports in ports mode
pub fn render(report: &ScanReport, mode: ScanMode) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    match mode {
        ScanMode::Hosts => table.set_header(vec!["IP", "MAC", "Hostname"]),
        ScanMode::Ports => table.set_header(vec!["IP", "MAC", "Open Ports"]),
    };

    for host in &report.hosts {
        let mac = host.mac.clone().unwrap_or_else(|| "—".to_string());
        let last = match mode {
            ScanMode::Hosts => host.display_hostname().to_string(),
            ScanMode::Ports => format_ports(&host.open_ports),
        };
        table.add_row(vec![
            Cell::new(host.addr),
            Cell::new(mac),
            Cell::new(last),
        ]);
    }
    table
}

fn format_ports(ports: &[u16]) -> String {
    if ports.is_empty() {
        "—".to_string()
    } else {
        ports
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    }
}

/// Render the host records as a JSON array, in report order
pub fn render_json(report: &ScanReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&report.hosts)
}
