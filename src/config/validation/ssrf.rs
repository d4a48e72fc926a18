//! SSRF (Server-Side Request Forgery) protection utilities
//!
//! Webhook targets are screened before registration so the gateway never
//! posts signed payloads to loopback, private or metadata addresses.

use std::net::{IpAddr, Ipv4Addr};
use url::{Host, Url};

/// Hostnames that always resolve inside the deployment
const BLOCKED_HOSTS: [&str; 5] = [
    "localhost",
    "metadata.google.internal",
    "metadata",
    "internal",
    "local",
];

/// Validate a URL against SSRF attacks
///
/// The URL must be well-formed http(s) and must not name a private, loopback,
/// link-local or metadata host, including numeric encodings of such addresses.
pub fn validate_url_against_ssrf(url_str: &str, context: &str) -> Result<(), String> {
    let url =
        Url::parse(url_str).map_err(|e| format!("{} has invalid URL format: {}", context, e))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(format!(
                "{} must use http:// or https:// scheme, got: {}",
                context, scheme
            ));
        }
    }

    let host = url
        .host()
        .ok_or_else(|| format!("{} URL must have a valid host", context))?;

    let blocked_ip = match host {
        Host::Ipv4(ip) => is_private_or_internal_ip(&IpAddr::V4(ip)),
        Host::Ipv6(ip) => is_private_or_internal_ip(&IpAddr::V6(ip)),
        Host::Domain(domain) => {
            let domain = domain.to_lowercase();
            if BLOCKED_HOSTS
                .iter()
                .any(|blocked| domain == *blocked || domain.ends_with(&format!(".{}", blocked)))
            {
                return Err(format!(
                    "{} URL host '{}' is blocked for security reasons (SSRF protection)",
                    context, domain
                ));
            }
            encoded_ipv4(&domain).is_some_and(|ip| is_private_or_internal_ip(&IpAddr::V4(ip)))
        }
    };

    if blocked_ip {
        return Err(format!(
            "{} URL host '{}' is a private/internal IP address (SSRF protection)",
            context,
            url.host_str().unwrap_or_default()
        ));
    }

    Ok(())
}

/// Decimal (`2130706433`) or hex (`0x7f000001`) IPv4 encodings
fn encoded_ipv4(host: &str) -> Option<Ipv4Addr> {
    if let Some(hex) = host.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16).ok().map(Ipv4Addr::from);
    }
    if !host.is_empty() && host.chars().all(|c| c.is_ascii_digit()) {
        return host.parse::<u32>().ok().map(Ipv4Addr::from);
    }
    None
}

/// Check if an IP address is private, internal, or reserved
fn is_private_or_internal_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_loopback()
                || ipv4.is_private()
                // 169.254.0.0/16, includes cloud metadata endpoints
                || ipv4.is_link_local()
                || ipv4.is_broadcast()
                || ipv4.is_documentation()
                || ipv4.is_unspecified()
                // Shared address space (100.64.0.0/10)
                || (ipv4.octets()[0] == 100 && (ipv4.octets()[1] & 0xC0) == 64)
                // Reserved (240.0.0.0/4)
                || ipv4.octets()[0] >= 240
        }
        IpAddr::V6(ipv6) => {
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                // Unique local (fc00::/7)
                || ((ipv6.segments()[0] & 0xfe00) == 0xfc00)
                // Link-local (fe80::/10)
                || ((ipv6.segments()[0] & 0xffc0) == 0xfe80)
                || ipv6
                    .to_ipv4_mapped()
                    .is_some_and(|ipv4| is_private_or_internal_ip(&IpAddr::V4(ipv4)))
        }
    }
}
