//! Report renderers.
//!
//! Pure projections of a `CaseRecord` into a plain-text report and a
//! self-contained HTML report. Neither renderer performs I/O or re-runs
//! lookups; the map fragment is handed in by the caller, and it is only
//! embedded when geolocation evidence is actually present.
//!
//! The two HTML layouts in this tool's lineage (a card layout with header,
//! footer and styled sections, and a minimal pre-block layout) are collapsed
//! into one renderer with a style option.

use serde::Serialize;

use crate::record::{CaseRecord, Evidence};

/// Rendered text shown where a reverse-DNS answer is missing.
pub const NO_PTR_TEXT: &str = "No PTR record found.";

/// Rendered text shown for an evidence category with no answer.
const UNAVAILABLE_TEXT: &str = "unavailable";

/// HTML report layout variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlStyle {
    /// Tabular/card layout with header and footer.
    #[default]
    Card,
    /// Minimal layout with pre-formatted evidence blocks.
    Minimal,
}

/// Render the plain-text report.
///
/// Deterministic for a given record: header lines, one pretty-printed block
/// per evidence category in document order, and a trailing Google Maps link
/// that is omitted entirely when geolocation is unavailable.
pub fn render_text(record: &CaseRecord) -> String {
    let mut report = String::new();

    report.push_str(&format!("Investigator: {}\n", record.investigator));
    report.push_str(&format!("Case Number: {}\n", record.case_number));
    report.push_str(&format!("Timestamp: {}\n", record.timestamp));
    report.push_str(&format!("IP Address: {}\n\n", record.ip_address));

    report.push_str("Whois Analysis:\n");
    report.push_str(&evidence_json(&record.registration));
    report.push_str("\n\n");

    report.push_str("DNS Analysis:\n");
    report.push_str(reverse_dns_text(record));
    report.push_str("\n\n");

    report.push_str("Geolocation Analysis:\n");
    report.push_str(&evidence_json(&record.geolocation));

    if let Some(geo) = record.geolocation.as_present() {
        report.push_str("\n\n");
        report.push_str("Google Maps Link:\n");
        report.push_str(&format!(
            "https://www.google.com/maps?q={},{}",
            geo.latitude, geo.longitude
        ));
    }

    report
}

/// Render the self-contained HTML report.
///
/// `map_fragment` is the external map collaborator's output for the record's
/// coordinates; it is embedded only when geolocation evidence is present.
pub fn render_html(record: &CaseRecord, style: HtmlStyle, map_fragment: Option<&str>) -> String {
    let map_html = if record.geolocation.is_unavailable() {
        None
    } else {
        map_fragment
    };
    match style {
        HtmlStyle::Card => render_html_card(record, map_html),
        HtmlStyle::Minimal => render_html_minimal(record, map_html),
    }
}

fn render_html_card(record: &CaseRecord, map_fragment: Option<&str>) -> String {
    let whois_html = match record.registration.as_present() {
        Some(reg) => key_value_lines(reg).join("<br>\n            "),
        None => UNAVAILABLE_TEXT.to_string(),
    };
    let geo_html = match record.geolocation.as_present() {
        Some(geo) => key_value_lines(geo).join("<br>\n            "),
        None => UNAVAILABLE_TEXT.to_string(),
    };

    let map_section = match map_fragment {
        Some(fragment) => format!(
            "        <h2>Geolocation Map:</h2>\n        <div id=\"map-container\">\n            {fragment}\n        </div>\n"
        ),
        None => String::new(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>IP Analysis Report</title>
    <style>
        body {{ font-family: Arial, sans-serif; }}
        h1, h2 {{ margin-bottom: 0.5em; }}
        pre {{ white-space: pre-wrap; }}
        table {{
            border-collapse: collapse;
            margin-top: 10px;
        }}
        table, th, td {{
            border: 1px solid black;
            padding: 10px;
        }}
        #map-container {{
            width: 800px;
            height: 800px;
            margin: 0 auto;
        }}
        header, footer {{
            background-color: #f1f1f1;
            padding: 20px;
            text-align: center;
        }}
    </style>
</head>
<body>
    <header>
        <h1>IP Analysis Report</h1>
    </header>
    <main>
        <h2>Investigator: {investigator}</h2>
        <h2>Case Number: {case_number}</h2>
        <h2>IP Address: {ip_address}</h2>
        <hr />
        <h2>Whois Analysis:</h2>
        <p>
            {whois_html}
        </p>
        <h2>DNS Analysis:</h2>
        <p>
            {dns_html}
        </p>
        <h2>Geolocation Analysis:</h2>
        <p>
            {geo_html}
        </p>
{map_section}    </main>
    <footer>
        <p>Report generated on {timestamp}</p>
    </footer>
</body>
</html>
"#,
        investigator = html_escape(&record.investigator),
        case_number = html_escape(&record.case_number),
        ip_address = html_escape(&record.ip_address),
        whois_html = whois_html,
        dns_html = html_escape(reverse_dns_text(record)),
        geo_html = geo_html,
        map_section = map_section,
        timestamp = html_escape(&record.timestamp),
    )
}

fn render_html_minimal(record: &CaseRecord, map_fragment: Option<&str>) -> String {
    let map_section = match map_fragment {
        Some(fragment) => format!("    <h2>Geolocation Map:</h2>\n    {fragment}\n"),
        None => String::new(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>IP Analysis Report</title>
    <style>
        body {{ font-family: Arial, sans-serif; }}
        h1, h2 {{ margin-bottom: 0.5em; }}
        pre {{ white-space: pre-wrap; }}
    </style>
</head>
<body>
    <h1>IP Analysis Report</h1>
    <h2>Investigator: {investigator}</h2>
    <h2>Case Number: {case_number}</h2>
    <h2>Timestamp: {timestamp}</h2>
    <h2>IP Address: {ip_address}</h2>

    <h2>Whois Analysis:</h2>
    <pre>{whois_html}</pre>

    <h2>DNS Analysis:</h2>
    <pre>{dns_html}</pre>

    <h2>Geolocation Analysis:</h2>
    <pre>{geo_html}</pre>

{map_section}</body>
</html>
"#,
        investigator = html_escape(&record.investigator),
        case_number = html_escape(&record.case_number),
        timestamp = html_escape(&record.timestamp),
        ip_address = html_escape(&record.ip_address),
        whois_html = html_escape(&evidence_json(&record.registration)),
        dns_html = html_escape(reverse_dns_text(record)),
        geo_html = html_escape(&evidence_json(&record.geolocation)),
        map_section = map_section,
    )
}

/// Pretty-printed JSON for a present evidence value, or the unavailable text.
fn evidence_json<T: Serialize>(evidence: &Evidence<T>) -> String {
    match evidence.as_present() {
        Some(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| UNAVAILABLE_TEXT.to_string())
        }
        None => UNAVAILABLE_TEXT.to_string(),
    }
}

/// Human text for the reverse-DNS slot. The adapter reports a miss as a
/// bare unavailable marker; the sentinel wording exists only here.
fn reverse_dns_text(record: &CaseRecord) -> &str {
    match record.reverse_dns.as_present() {
        Some(name) => name,
        None => NO_PTR_TEXT,
    }
}

/// Flatten a serializable evidence value into "Key name: value" lines,
/// with underscores replaced by spaces and the first letter capitalized.
/// Absent (null) fields are omitted rather than rendered as placeholders.
fn key_value_lines<T: Serialize>(value: &T) -> Vec<String> {
    let json = match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => return vec![],
    };

    json.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(key, v)| {
            let shown = match v {
                serde_json::Value::String(s) => html_escape(s),
                other => html_escape(&other.to_string()),
            };
            format!("{}: {}", prettify_key(key), shown)
        })
        .collect()
}

/// "asn_description" -> "Asn description"
fn prettify_key(key: &str) -> String {
    let mut out = key.to_ascii_lowercase().replace('_', " ");
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    out
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
