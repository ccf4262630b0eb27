/*!
Network / DNS utilities for ipdossier.

This module centralizes:
- IP literal parsing (IPv4 or IPv6) for boundary validation
- Reverse DNS (PTR) lookup, async via trust-dns-resolver
*/

use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use tokio::time::timeout;
use trust_dns_resolver::{
    config::{ResolverConfig, ResolverOpts},
    TokioAsyncResolver,
};

use crate::errors::{IpDossierError, Result};
use crate::record::Evidence;

/// Parse an IP literal (IPv4 or IPv6) into an `IpAddr`.
///
/// This is the outermost boundary validation: it runs before any network
/// call so a malformed subject fails fast.
pub fn parse_ip(s: &str) -> Result<IpAddr> {
    IpAddr::from_str(s.trim()).map_err(|_| IpDossierError::invalid_ip(s.trim()))
}

/// Perform a reverse DNS (PTR) lookup for the subject IP.
///
/// A miss (NXDOMAIN-like conditions, timeout, resolver failure) is not an
/// error at the data-model level: it degrades to `Evidence::Unavailable`.
/// The human-readable "No PTR record found." text belongs to the renderers,
/// not to the adapter.
pub async fn lookup_reverse_dns(ip: IpAddr, dns_timeout: Duration) -> Evidence<String> {
    // Build a resolver each call (acceptable here; one lookup per run).
    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    let fut = resolver.reverse_lookup(ip);
    match timeout(dns_timeout, fut).await {
        Ok(Ok(resp)) => Evidence::from_option(resp.iter().next().map(|n| n.to_utf8())),
        Ok(Err(e)) => {
            log::debug!("reverse DNS lookup for {ip} returned no PTR: {e}");
            Evidence::Unavailable
        }
        Err(_) => {
            log::debug!("reverse DNS lookup for {ip} timed out");
            Evidence::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ip_v4_and_v6() {
        assert!(parse_ip("8.8.8.8").is_ok());
        assert!(parse_ip("2001:4860:4860::8888").is_ok());
        assert!(parse_ip(" 8.8.8.8 ").is_ok());
    }

    #[test]
    fn test_parse_ip_rejects_garbage() {
        for bad in ["", "not.an.ip", "999.1.1.1", "8.8.8", "8.8.8.8.8"] {
            let err = parse_ip(bad).unwrap_err();
            assert!(
                matches!(err, IpDossierError::InvalidIpAddress { .. }),
                "expected InvalidIpAddress for {bad:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_reverse_dns_unreachable_degrades_to_unavailable() {
        // TEST-NET-3 has no PTR delegation; a very short timeout also covers
        // environments without outbound DNS. Either way: Unavailable, no panic.
        let ev = lookup_reverse_dns("203.0.113.9".parse().unwrap(), Duration::from_millis(200)).await;
        assert!(ev.is_unavailable() || ev.as_present().is_some());
    }
}
