//! Network address helpers
//!
//! Finds the address other devices on the LAN can reach this host on, and
//! builds the base URL that goes into every file record.

use std::net::IpAddr;

use local_ip_address::{list_afinet_netifas, local_ip};

use crate::config::ServerConfig;

/// Best-guess LAN address of this host.
///
/// Prefers the address of the default route interface, then any other
/// non-loopback IPv4 interface.
pub fn lan_address() -> Option<IpAddr> {
    match local_ip() {
        Ok(ip) if !ip.is_loopback() => return Some(ip),
        Ok(_) => {}
        Err(e) => tracing::debug!("Default route address lookup failed: {}", e),
    }

    match list_afinet_netifas() {
        Ok(interfaces) => interfaces
            .into_iter()
            .map(|(_, ip)| ip)
            .find(|ip| ip.is_ipv4() && !ip.is_loopback()),
        Err(e) => {
            tracing::warn!("Failed to list network interfaces: {}", e);
            None
        }
    }
}

/// Host part advertised to clients: configured override, detected LAN
/// address, or loopback as a last resort.
pub fn advertised_host(config: &ServerConfig) -> String {
    if let Some(host) = &config.public_host {
        return host.clone();
    }

    match lan_address() {
        Some(IpAddr::V6(ip)) => format!("[{}]", ip),
        Some(ip) => ip.to_string(),
        None => {
            tracing::warn!("No LAN address found, advertising loopback");
            "127.0.0.1".to_string()
        }
    }
}

/// Base URL clients use to reach this server, e.g. `http://192.168.1.20:3000`
pub fn public_base_url(host: &str, port: u16) -> String {
    format!("http://{}:{}", host, port)
}

/// Loopback URL shown to the operator
pub fn local_url(port: u16) -> String {
    public_base_url("localhost", port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_base_url() {
        assert_eq!(
            public_base_url("192.168.1.20", 3000),
            "http://192.168.1.20:3000"
        );
        assert_eq!(local_url(8080), "http://localhost:8080");
    }

    #[test]
    fn test_configured_host_wins() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            public_host: Some("laptop.local".to_string()),
        };
        assert_eq!(advertised_host(&config), "laptop.local");
    }

    #[test]
    fn test_lan_address_is_not_loopback() {
        if let Some(ip) = lan_address() {
            assert!(!ip.is_loopback());
        }
    }
}
