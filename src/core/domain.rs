use std::collections::HashSet;

/// Case-fold a roster domain and drop everything up to and including a
/// `www.` marker, so `Foo.www.Example.COM` and `www.example.com` both
/// become `example.com`.
pub fn clean_domain(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    match lowered.rfind("www.") {
        Some(idx) => lowered[idx + 4..].to_string(),
        None => lowered,
    }
}

/// Lowercase a certificate SAN and strip a leading `*.` wildcard label.
pub fn normalize_san(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    lowered
        .strip_prefix("*.")
        .map(str::to_string)
        .unwrap_or(lowered)
}

/// True when the domain contains any configured keyword as a substring.
pub fn matches_keyword(domain: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| domain.contains(kw.as_str()))
}

/// Suffix semantics, not substring: `domain` is whitelisted iff it equals
/// an entry or ends with `.` + entry. `notrealbank.com` must not match
/// the entry `realbank.com`.
pub fn is_whitelisted(domain: &str, whitelist: &HashSet<String>) -> bool {
    whitelist
        .iter()
        .any(|w| domain == w || domain.ends_with(&format!(".{}", w)))
}
