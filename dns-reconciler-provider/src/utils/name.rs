//! Domain name normalization
//!
//! Names are compared in one canonical form: lowercase, fully-qualified,
//! without the trailing dot. Hostname *targets* (CNAME, MX, NS, PTR, SRV)
//! keep the trailing dot instead, since that is how they travel on the wire.

/// Strip the trailing dot and lowercase a domain name.
///
/// `"WWW.Example.com."` -> `"www.example.com"`
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Lowercase a hostname target and make it fully-qualified (trailing dot).
///
/// The root name `"."` is kept as-is (SRV "no service" target).
pub fn canonical_target(target: &str) -> String {
    let trimmed = target.trim();
    if trimmed == "." {
        return ".".to_string();
    }
    format!("{}.", normalize_domain_name(trimmed))
}

/// Convert a fully-qualified name into a label relative to the zone.
///
/// - `"www.example.com"` + `"example.com"` -> `"www"`
/// - `"example.com."` + `"example.com"` -> `"@"`
/// - names outside the zone are returned normalized but otherwise untouched
pub fn full_name_to_relative(full_name: &str, zone_name: &str) -> String {
    let full = normalize_domain_name(full_name);
    let zone = normalize_domain_name(zone_name);

    if full == zone {
        "@".to_string()
    } else if let Some(subdomain) = full.strip_suffix(&format!(".{zone}")) {
        subdomain.to_string()
    } else {
        full
    }
}

/// Convert a label into a fully-qualified name (without trailing dot).
///
/// - `"www"` + `"example.com"` -> `"www.example.com"`
/// - `"@"` or `""` + `"example.com"` -> `"example.com"`
/// - `"host.other.org."` (already qualified) -> `"host.other.org"`
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);
    let relative = relative_name.trim();

    if relative == "@" || relative.is_empty() {
        zone
    } else if relative.ends_with('.') {
        normalize_domain_name(relative)
    } else {
        format!("{}.{zone}", relative.to_ascii_lowercase())
    }
}

/// Whether `fqdn` is the zone apex or a name below it.
pub fn is_in_zone(fqdn: &str, zone_name: &str) -> bool {
    let full = normalize_domain_name(fqdn);
    let zone = normalize_domain_name(zone_name);
    full == zone || full.ends_with(&format!(".{zone}"))
}
