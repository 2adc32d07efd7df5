use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use tracing::{debug, info, warn};

use crate::core::error::RadarError;

const AFFIXES: &[&str] = &["secure", "login", "support", "verify", "update", "pay"];

const HOMOGLYPH_SUBS: &[char] = &['0', '1', 'l', 'i', 'o'];

const SWAP_TLDS: &[&str] = &[
    "com", "net", "org", "co", "io", "info", "biz", "xyz", "top", "online", "site",
];

const VOWEL_SWAPS: &[(char, char)] = &[('a', 'e'), ('e', 'i'), ('i', 'o'), ('o', 'u'), ('u', 'a')];

/// Enumerate lookalike candidates for one registrable domain. The seed
/// itself is never included; the result is sorted and deduplicated.
pub fn permutations(domain: &str) -> Vec<String> {
    let mut out = Vec::new();

    let Some((sld, tld)) = domain.rsplit_once('.') else {
        for affix in AFFIXES {
            out.push(format!("{}-{}", domain, affix));
            out.push(format!("{}-{}", affix, domain));
        }
        out.sort();
        out.dedup();
        return out;
    };

    for affix in AFFIXES {
        out.push(format!("{}-{}.{}", sld, affix, tld));
        out.push(format!("{}{}.{}", sld, affix, tld));
        out.push(format!("{}-{}.{}", affix, sld, tld));
    }

    let chars: Vec<char> = sld.chars().collect();

    // omission
    for i in 0..chars.len() {
        let mut omit = chars.clone();
        omit.remove(i);
        let candidate: String = omit.into_iter().collect();
        if !candidate.is_empty() {
            out.push(format!("{}.{}", candidate, tld));
        }
    }

    // adjacent transposition
    for i in 0..chars.len().saturating_sub(1) {
        let mut swap = chars.clone();
        swap.swap(i, i + 1);
        let candidate: String = swap.into_iter().collect();
        out.push(format!("{}.{}", candidate, tld));
    }

    // repetition
    for i in 0..chars.len() {
        let mut rep = chars.clone();
        rep.insert(i + 1, chars[i]);
        let candidate: String = rep.into_iter().collect();
        out.push(format!("{}.{}", candidate, tld));
    }

    // homoglyph digit/letter substitution
    for i in 0..chars.len() {
        for sub in HOMOGLYPH_SUBS {
            if chars[i] == *sub {
                continue;
            }
            let mut subs = chars.clone();
            subs[i] = *sub;
            let candidate: String = subs.into_iter().collect();
            out.push(format!("{}.{}", candidate, tld));
        }
    }

    // keyboard adjacency
    for i in 0..chars.len() {
        for neighbor in qwerty_neighbors(chars[i]) {
            let mut subs = chars.clone();
            subs[i] = neighbor;
            let candidate: String = subs.iter().collect();
            out.push(format!("{}.{}", candidate, tld));
        }
    }

    // vowel swapping
    for &(from, to) in VOWEL_SWAPS {
        let swapped = sld.replace(from, &to.to_string());
        if swapped != sld {
            out.push(format!("{}.{}", swapped, tld));
        }
    }

    // hyphenation
    for i in 1..sld.len() {
        if sld.is_char_boundary(i) {
            out.push(format!("{}-{}.{}", &sld[..i], &sld[i..], tld));
        }
    }

    // alternate TLDs
    for swap_tld in SWAP_TLDS {
        if *swap_tld != tld {
            out.push(format!("{}.{}", sld, swap_tld));
        }
    }

    out.retain(|c| c.as_str() != domain);
    out.sort();
    out.dedup();
    out
}

fn qwerty_neighbors(key: char) -> Vec<char> {
    let map: &[(char, &str)] = &[
        ('q', "wa"),
        ('w', "qes"),
        ('e', "wrd"),
        ('r', "etf"),
        ('t', "rgy"),
        ('y', "tuh"),
        ('u', "yij"),
        ('i', "uok"),
        ('o', "ipl"),
        ('p', "o"),
        ('a', "qsz"),
        ('s', "awdx"),
        ('d', "sefc"),
        ('f', "drgv"),
        ('g', "fthb"),
        ('h', "gyjn"),
        ('j', "hukm"),
        ('k', "jil"),
        ('l', "ko"),
        ('z', "ax"),
        ('x', "zsc"),
        ('c', "xdv"),
        ('v', "cfb"),
        ('b', "vgn"),
        ('n', "bhm"),
        ('m', "nj"),
    ];
    map.iter()
        .find(|(k, _)| *k == key.to_ascii_lowercase())
        .map(|(_, adj)| adj.chars().collect())
        .unwrap_or_default()
}

/// Resolver-backed registration filter over the permutation engine.
pub struct TyposquatScanner {
    resolver: TokioAsyncResolver,
}

impl TyposquatScanner {
    pub fn from_system_conf() -> Result<Self, RadarError> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| RadarError::Dns(e.to_string()))?;
        Ok(Self { resolver })
    }

    /// Variants of one domain that currently have live DNS records.
    /// Candidates whose lookups fail for reasons other than NXDOMAIN are
    /// skipped individually.
    pub async fn registered_variants(&self, domain: &str) -> Result<Vec<String>, RadarError> {
        let candidates = permutations(domain);
        info!(
            "Scanning {} candidates for '{}' (this may take a while)",
            candidates.len(),
            domain
        );
        let mut registered = Vec::new();
        for candidate in candidates {
            match self.resolver.lookup_ip(candidate.as_str()).await {
                Ok(lookup) => {
                    if lookup.iter().next().is_some() {
                        registered.push(candidate);
                    }
                }
                Err(e) => match e.kind() {
                    ResolveErrorKind::NoRecordsFound { .. } => {}
                    _ => debug!("Lookup failed for {}: {}", candidate, e),
                },
            }
        }
        info!("Found {} registered variations for '{}'", registered.len(), domain);
        Ok(registered)
    }
}

/// Scan every target domain, accumulating unique registered variants. A
/// failed scan drops that one domain, not the run.
pub async fn scan_all(scanner: &TyposquatScanner, domains: &[String]) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for domain in domains {
        match scanner.registered_variants(domain).await {
            Ok(variants) => found.extend(variants),
            Err(e) => warn!("Scan failed for '{}': {}", domain, e),
        }
    }
    found
}

/// Write the accumulated set one per line, sorted. An empty set writes
/// nothing at all, so "no results" never shows up as an empty file.
pub fn write_results(found: &BTreeSet<String>, out: &Path) -> Result<(), RadarError> {
    if found.is_empty() {
        info!("No registered variations found; skipping {}", out.display());
        return Ok(());
    }
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut body = String::new();
    for domain in found {
        body.push_str(domain);
        body.push('\n');
    }
    fs::write(out, body)?;
    info!("Saved {} unique variations to {}", found.len(), out.display());
    Ok(())
}
