use std::sync::LazyLock;

use regex::Regex;

/// Host patterns whose streams get routed through the forwarding proxy.
///
/// Each is matched as `https?://<pattern>`; the list order is the
/// application order.
pub const PROXY_DOMAINS: &[&str] = &[
    r"bolee\.eu\.org",
    r"[^/]+\.hinet\.net",
    r"[^/]+\.litv\.4gtv",
    r"[^/]+\.litv\.litv",
    r"[^/]+\.4gtv\.",
    r"[^/]+\.googlevideo\.com",
    r"[^/]+\.tvb\.com(:\d+)?",
];

static PROXY_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PROXY_DOMAINS
        .iter()
        .map(|domain| Regex::new(&format!("https?://{domain}")).unwrap())
        .collect()
});

/// Rewrites upstream stream URLs inside a channel entry so playback goes
/// through a forwarding proxy.
///
/// The proxy base is fixed at construction and prepended to every matched
/// URL as `{base}/{original_url}`.
#[derive(Debug, Clone)]
pub struct ProxyRewriter {
    proxy_base: String,
}

impl ProxyRewriter {
    #[must_use]
    pub fn new(proxy_base: impl Into<String>) -> Self {
        Self {
            proxy_base: proxy_base.into(),
        }
    }

    /// Reads the proxy base from the `PROXY_URL` environment variable, once.
    ///
    /// An unset variable degrades to an empty base: rewritten URLs come out
    /// as `/http://...`, relative-looking but well-formed.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var("PROXY_URL").unwrap_or_default())
    }

    /// Routes every proxied-domain URL in `entry` through the proxy base.
    /// With `enabled` false the entry is returned untouched.
    ///
    /// Patterns are applied one after another over the same text; text
    /// produced by an earlier pattern is not shielded from later ones.
    #[must_use]
    pub fn rewrite(&self, entry: &str, enabled: bool) -> String {
        if !enabled {
            return entry.to_string();
        }

        let replacement = format!("{}/$0", self.proxy_base);
        let mut text = entry.to_string();
        for pattern in PROXY_URL_PATTERNS.iter() {
            text = pattern.replace_all(&text, replacement.as_str()).into_owned();
        }
        text
    }
}
