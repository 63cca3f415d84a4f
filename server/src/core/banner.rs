//! Startup banner

use super::config::AppConfig;
use super::constants::{APP_NAME, APPLICATION_NAME_HEADER};

/// Host shown to the user; wildcard binds are reachable on localhost
fn display_host(host: &str) -> &str {
    match host {
        "0.0.0.0" | "::" | "[::]" => "localhost",
        _ => host,
    }
}

pub fn print_banner(config: &AppConfig, data_dir: &str) {
    let host = display_host(&config.server.host);
    let port = config.server.port;
    const W: usize = 12;

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!(
        "  \x1b[33m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m http://{}:{}/telegraf \x1b[90m({} header)\x1b[0m",
        "Telegraf:", host, port, APPLICATION_NAME_HEADER
    );
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m http://{}:{}/api/v1/health",
        "Health:", host, port
    );
    println!(
        "  \x1b[90m➜  {:<W$} {} ({})\x1b[0m",
        "Reserved:",
        config.ingest.reserved_tags.join(","),
        config.ingest.tag_filter
    );
    println!(
        "  \x1b[90m➜  {:<W$} {}\x1b[0m",
        "Storage:", config.database.backend
    );
    println!("  \x1b[90m➜  {:<W$} {}\x1b[0m", "Data:", data_dir);
    println!();
}
