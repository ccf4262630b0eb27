//! Registration evidence adapter (WHOIS).
//!
//! Queries the regional registries over canonical WHOIS (TCP 43), starting
//! at ARIN and following `refer:` / `ReferralServer:` referrals up to a
//! bounded depth, then enriches the result with a Team Cymru query for ASN
//! data that plain WHOIS responses often omit.
//!
//! The heterogeneous registry response shapes (ARIN `CIDR:` / `RegDate:`
//! vs RIPE-style `inetnum:` / `created:`) are normalized into one
//! `RegistrationInfo`. Fields absent in the response stay `None`.
//!
//! This adapter never raises to its caller: every network or parse failure
//! is absorbed and re-expressed as `Evidence::Unavailable`.

use std::net::IpAddr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use regex::Regex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::NetworkConfig;
use crate::record::{Evidence, RegistrationInfo};

/// WHOIS TCP port.
const WHOIS_PORT: u16 = 43;

/// First server in the referral chain; ARIN refers out for non-ARIN space.
const INITIAL_WHOIS_SERVER: &str = "whois.arin.net";

/// Perform a basic WHOIS query (over TCP 43) with a timeout.
///
/// Returns the raw textual response.
pub async fn simple_whois(server: &str, query: &str, to: Duration) -> Result<String> {
    // Connect with timeout
    let mut stream = match timeout(to, TcpStream::connect((server, WHOIS_PORT))).await {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => return Err(anyhow!("connect error to {server}: {e}")),
        Err(_) => return Err(anyhow!("connect timeout to {server}")),
    };

    // Send query (canonical WHOIS: "<query>\r\n")
    let line = format!("{query}\r\n");
    timeout(to, stream.write_all(line.as_bytes()))
        .await
        .map_err(|_| anyhow!("write timeout to {server}"))??;

    // Read whole response
    let mut buf = Vec::new();
    timeout(to, stream.read_to_end(&mut buf))
        .await
        .map_err(|_| anyhow!("read timeout from {server}"))??;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Team Cymru ASN information.
#[derive(Debug, Clone)]
pub struct CymruAsnInfo {
    pub asn: u32,
    pub bgp_prefix: String,
    pub country: String,
    pub registry: String,
    pub allocated: String,
    pub as_name: String,
}

/// Query Team Cymru for ASN information about an IP address.
///
/// Format: "AS | IP | BGP Prefix | CC | Registry | Allocated | AS Name"
pub async fn query_cymru_asn(ip: IpAddr, to: Duration) -> Result<CymruAsnInfo> {
    let query = format!(" -v {}", ip);
    let resp = simple_whois("whois.cymru.com", &query, to).await?;

    for line in resp.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("AS") {
            continue; // Skip header line
        }

        let parts: Vec<&str> = line.split('|').map(|s| s.trim()).collect();
        if parts.len() >= 7 {
            if let Ok(asn) = parts[0].parse::<u32>() {
                return Ok(CymruAsnInfo {
                    asn,
                    bgp_prefix: parts[2].to_string(),
                    country: parts[3].to_string(),
                    registry: parts[4].to_uppercase(),
                    allocated: parts[5].to_string(),
                    as_name: parts[6].to_string(),
                });
            }
        }
    }

    Err(anyhow!("No ASN information found in Cymru response"))
}

/// Extract the named registration fields from a raw WHOIS response body.
///
/// Later responses in a referral chain come from the authoritative registry,
/// so values found deeper in the chain overwrite earlier ones.
pub fn parse_whois_fields(resp: &str, info: &mut RegistrationInfo) {
    fn field(resp: &str, pattern: &str) -> Option<String> {
        let re = Regex::new(pattern).expect("static whois field regex");
        re.captures(resp)
            .and_then(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
            .filter(|v| !v.is_empty())
    }

    // Network range start (ARIN "NetRange: a - b", RIPE "inetnum: a - b")
    if let Some(start) = field(resp, r"(?im)^(?:NetRange|inetnum):\s*([0-9a-fA-F.:]+)\s*-") {
        info.ip_address = Some(start);
    }
    if let Some(cidr) = field(resp, r"(?im)^(?:CIDR|route6?):\s*(\S+)") {
        // ARIN may list several CIDRs comma-separated; keep the first.
        info.cidr = Some(cidr.trim_end_matches(',').to_string());
    }
    if let Some(country) = field(resp, r"(?im)^country:\s*(\S+)") {
        info.country = Some(country.to_uppercase());
    }
    if let Some(org) = field(resp, r"(?im)^(?:OrgName|org-name|owner|descr):\s*(.+)$") {
        info.registrar = Some(org);
    }
    if let Some(created) = field(resp, r"(?im)^(?:RegDate|created):\s*(\S+)") {
        info.registration_date = Some(created);
    }
    if let Some(updated) = field(resp, r"(?im)^(?:Updated|last-modified|changed):\s*(\S+)") {
        info.last_updated = Some(updated);
    }
}

/// Find the next WHOIS server in a referral chain, if any.
fn find_referral(resp: &str) -> Option<String> {
    // "refer: whois.ripe.net" OR "ReferralServer: whois://whois.ripe.net"
    let re_refer_plain = Regex::new(r"(?im)^\s*refer:\s*([A-Z0-9._\-]+)\s*$").expect("static");
    let re_referral_server =
        Regex::new(r"(?im)^\s*ReferralServer:\s*whois://([A-Z0-9._\-]+)\s*$").expect("static");

    re_refer_plain
        .captures(resp)
        .and_then(|c| c.get(1).map(|m| m.as_str().to_ascii_lowercase()))
        .or_else(|| {
            re_referral_server
                .captures(resp)
                .and_then(|c| c.get(1).map(|m| m.as_str().to_ascii_lowercase()))
        })
}

/// Registration evidence adapter entry point.
///
/// Walks the WHOIS referral chain and the Team Cymru ASN service, merging
/// whatever fields the registries disclose. Produces `Unavailable` when no
/// server could be reached or nothing usable was extracted.
pub async fn lookup_registration(ip: IpAddr, net: &NetworkConfig) -> Evidence<RegistrationInfo> {
    let mut info = RegistrationInfo::default();
    let mut server = INITIAL_WHOIS_SERVER.to_string();
    let ip_str = ip.to_string();

    for depth in 0..net.max_whois_depth {
        log::debug!("WHOIS(depth={depth}) server={server} query={ip_str}");

        let resp = match simple_whois(&server, &ip_str, net.whois_timeout).await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("WHOIS query to {server} failed: {e}");
                break;
            }
        };

        parse_whois_fields(&resp, &mut info);

        match find_referral(&resp) {
            Some(next) if next != server => {
                log::debug!("  referral to {next}");
                server = next;
            }
            _ => break,
        }
    }

    // ASN enrichment; regular WHOIS responses often omit origin AS data.
    match query_cymru_asn(ip, net.whois_timeout).await {
        Ok(cymru) => {
            info.asn = Some(cymru.asn.to_string());
            info.asn_description = Some(cymru.as_name);
            if info.cidr.is_none() && !cymru.bgp_prefix.is_empty() {
                info.cidr = Some(cymru.bgp_prefix);
            }
            if info.country.is_none() && !cymru.country.is_empty() {
                info.country = Some(cymru.country);
            }
            if info.registrar.is_none() && !cymru.registry.is_empty() {
                info.registrar = Some(cymru.registry);
            }
            if info.registration_date.is_none() && !cymru.allocated.is_empty() {
                info.registration_date = Some(cymru.allocated);
            }
        }
        Err(e) => {
            log::debug!("Cymru ASN query for {ip} failed: {e}");
        }
    }

    if info.is_empty() {
        Evidence::Unavailable
    } else {
        Evidence::Present(info)
    }
}
