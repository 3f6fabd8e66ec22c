//! Registrable-domain extraction from free-form URL lines.
//!
//! Every line goes through the same cleanup (scheme, port, path, IP
//! rejection, host parsing) and is then reduced by a [`DomainStrategy`].
//! Output is always lowercase ASCII (IDN hosts become punycode) and never
//! keeps a `www.` label, so `normalize` is idempotent on its own output.

use crate::domain::ports::DomainStrategy;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use url::Host;

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());
static TAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[:/?#].*$").unwrap());
static IPV4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}(:\d+)?$").unwrap());
static HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+(\.[a-z0-9_-]+)+$").unwrap());
static LABEL_TLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\.)([a-z0-9_](?:[a-z0-9_-]*[a-z0-9_])?\.(?:[a-z]{2,63}|xn--[a-z0-9-]+))$")
        .unwrap()
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum StrategyKind {
    /// Public-suffix list lookup, regex when the lookup cannot place the host
    #[default]
    PublicSuffix,
    /// Last `label.tld` of the host only
    Regex,
}

/// Takes the last `label.tld` pair after dropping a leading `www.`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexStrategy;

impl DomainStrategy for RegexStrategy {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn registrable(&self, host: &str) -> Option<String> {
        let host = host.strip_prefix("www.").unwrap_or(host);
        LABEL_TLD_RE
            .captures(host)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

/// eTLD+1 via the bundled public-suffix list.
///
/// Hosts whose suffix is not in the list, or whose labels the list parser
/// rejects, are handed to the fallback strategy, if one is set. Hosts that
/// *are* a public suffix (`co.uk`) have no registrable domain and yield `None`.
pub struct PublicSuffixStrategy {
    fallback: Option<Box<dyn DomainStrategy>>,
}

impl PublicSuffixStrategy {
    pub fn new() -> Self {
        Self { fallback: None }
    }

    pub fn with_fallback(fallback: Box<dyn DomainStrategy>) -> Self {
        Self {
            fallback: Some(fallback),
        }
    }
}

impl Default for PublicSuffixStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainStrategy for PublicSuffixStrategy {
    fn name(&self) -> &'static str {
        "public_suffix"
    }

    fn registrable(&self, host: &str) -> Option<String> {
        let name = match addr::parse_domain_name(host) {
            Ok(name) if name.has_known_suffix() => name,
            Ok(_) => {
                tracing::debug!("Unknown public suffix for {}, trying fallback", host);
                return self.fallback.as_ref()?.registrable(host);
            }
            // addr rejects labels such as `_dmarc` or `-cdn` that still occur in asset lists
            Err(e) => {
                tracing::debug!("Public suffix lookup rejected {}: {}, trying fallback", host, e);
                return self.fallback.as_ref()?.registrable(host);
            }
        };

        name.root().map(str::to_string)
    }
}

pub struct Normalizer {
    strategy: Box<dyn DomainStrategy>,
}

impl Normalizer {
    pub fn new(strategy: Box<dyn DomainStrategy>) -> Self {
        Self { strategy }
    }

    pub fn from_kind(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::PublicSuffix => Self::new(Box::new(PublicSuffixStrategy::with_fallback(
                Box::new(RegexStrategy),
            ))),
            StrategyKind::Regex => Self::new(Box::new(RegexStrategy)),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Returns the registrable domain for a raw line, or `None` for blanks,
    /// IP addresses and anything that does not parse as a domain.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let without_scheme = SCHEME_RE.replace(trimmed, "");
        if IPV4_RE.is_match(&without_scheme) {
            return None;
        }

        let host_part = TAIL_RE.replace(&without_scheme, "");
        if host_part.is_empty() || IPV4_RE.is_match(&host_part) {
            return None;
        }

        let host = match Host::parse(&host_part) {
            Ok(Host::Domain(domain)) => domain,
            Ok(Host::Ipv4(_)) | Ok(Host::Ipv6(_)) => return None,
            Err(e) => {
                tracing::debug!("Skipping unparsable host {:?}: {}", host_part, e);
                return None;
            }
        };

        let host = host.trim_end_matches('.');
        if !HOST_RE.is_match(host) {
            return None;
        }

        self.strategy.registrable(host)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_kind(StrategyKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both() -> [Normalizer; 2] {
        [
            Normalizer::from_kind(StrategyKind::PublicSuffix),
            Normalizer::from_kind(StrategyKind::Regex),
        ]
    }

    #[test]
    fn test_strips_scheme_path_and_www() {
        for n in both() {
            assert_eq!(
                n.normalize("http://www.Example.com/path?x=1").as_deref(),
                Some("example.com"),
                "strategy {}",
                n.strategy_name()
            );
            assert_eq!(n.normalize("https://example.com:8443/a").as_deref(), Some("example.com"));
            assert_eq!(n.normalize("  example.com  ").as_deref(), Some("example.com"));
        }
    }

    #[test]
    fn test_ip_addresses_are_rejected() {
        for n in both() {
            assert_eq!(n.normalize("192.168.1.1"), None);
            assert_eq!(n.normalize("10.0.0.1:8080"), None);
            assert_eq!(n.normalize("http://127.0.0.1/admin"), None);
            assert_eq!(n.normalize("[::1]:8080"), None);
        }
    }

    #[test]
    fn test_malformed_and_blank_lines() {
        for n in both() {
            assert_eq!(n.normalize(""), None);
            assert_eq!(n.normalize("   "), None);
            assert_eq!(n.normalize("localhost"), None);
            assert_eq!(n.normalize("not a domain"), None);
            assert_eq!(n.normalize("http://"), None);
        }
    }

    #[test]
    fn test_public_suffix_handles_multi_part_suffixes() {
        let n = Normalizer::from_kind(StrategyKind::PublicSuffix);
        assert_eq!(n.normalize("https://shop.example.co.uk/").as_deref(), Some("example.co.uk"));
        assert_eq!(n.normalize("a.b.c.example.com").as_deref(), Some("example.com"));
        assert_eq!(n.normalize("co.uk"), None);
    }

    #[test]
    fn test_unknown_suffix_falls_back_to_regex() {
        let n = Normalizer::from_kind(StrategyKind::PublicSuffix);
        assert_eq!(n.normalize("shop.example.zzzz").as_deref(), Some("example.zzzz"));

        let strict = Normalizer::new(Box::new(PublicSuffixStrategy::new()));
        assert_eq!(strict.normalize("shop.example.zzzz"), None);
    }

    #[test]
    fn test_labels_rejected_by_suffix_parser_fall_back() {
        let n = Normalizer::from_kind(StrategyKind::PublicSuffix);
        assert_eq!(n.normalize("_dmarc.example.com").as_deref(), Some("example.com"));
        assert_eq!(n.normalize("http://my_site.example.com/").as_deref(), Some("example.com"));
        assert_eq!(n.normalize("-bad.example.com").as_deref(), Some("example.com"));

        let strict = Normalizer::new(Box::new(PublicSuffixStrategy::new()));
        assert_eq!(strict.normalize("_dmarc.example.com"), None);
    }

    #[test]
    fn test_regex_strategy_keeps_last_two_labels() {
        let n = Normalizer::from_kind(StrategyKind::Regex);
        assert_eq!(n.normalize("www.example.com").as_deref(), Some("example.com"));
        assert_eq!(n.normalize("api.v2.example.org").as_deref(), Some("example.org"));
        assert_eq!(n.normalize("www.com"), None);
    }

    #[test]
    fn test_idn_hosts_become_punycode() {
        let n = Normalizer::from_kind(StrategyKind::PublicSuffix);
        assert_eq!(n.normalize("http://www.bücher.de/").as_deref(), Some("xn--bcher-kva.de"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "http://www.Example.com/path?x=1",
            "https://shop.example.co.uk/",
            "sub.domain.example.org:8080",
            "WWW.EXAMPLE.NET",
            "http://www.bücher.de/",
        ];
        for n in both() {
            for input in inputs {
                let once = n.normalize(input).expect("input should normalize");
                assert_eq!(n.normalize(&once).as_deref(), Some(once.as_str()));
            }
        }
    }
}
