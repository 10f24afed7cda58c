//! Splitting upstream playlist text into channel entries and merging all
//! sources into the final document.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{error, info};

use crate::fetch::fetch_with_retry;
use crate::rewrite::ProxyRewriter;
use crate::sources::Source;

/// Fixed document header: the playlist marker plus the EPG index players
/// pull programme data from.
pub const PLAYLIST_HEADER: &str = indoc::indoc! {r#"
    #EXTM3U
    #EXTM3U x-tvg-url="https://assets.livednow.com/epg.xml"

"#};

static ENTRY_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#EXTINF").unwrap());

/// Slices raw playlist text into channel-info entries.
///
/// An entry starts at a line-leading `#EXTINF` marker and runs until the
/// next marker or end of input, so property lines between markers
/// (`#EXTVLCOPT:`, `#KODIPROP:`, ...) stay attached to the entry above them.
/// Anything before the first marker, such as a stray `#EXTM3U` header, is
/// dropped.
#[must_use]
pub fn extract_entries(raw: &str) -> Vec<&str> {
    let starts: Vec<usize> = ENTRY_MARKER.find_iter(raw).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(raw.len());
            &raw[start..end]
        })
        .collect()
}

/// Builds the merged playlist document: fixed header, then every source's
/// entries in registry order.
///
/// A source that fails all fetch attempts is logged and skipped; its entries
/// are simply absent from the document and the remaining sources still
/// contribute theirs.
pub async fn build_playlist(
    client: &reqwest::Client,
    sources: &[Source],
    rewriter: &ProxyRewriter,
) -> String {
    let mut text = String::from(PLAYLIST_HEADER);

    for source in sources {
        info!("Fetching playlist from {}: {}", source.name, source.url);
        let raw = match fetch_with_retry(client, &source.url, 3).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error fetching {}: {e:#}", source.name);
                continue;
            }
        };
        info!("Received {} bytes from {}", raw.len(), source.name);

        let entries = extract_entries(&raw);
        info!("Found {} channels in {}", entries.len(), source.name);

        if source.proxied {
            let proxied: Vec<String> = entries
                .iter()
                .map(|entry| rewriter.rewrite(entry, true))
                .collect();
            info!("Applied proxy rewrite to {}", source.name);
            text.push_str(&proxied.join("\n"));
        } else {
            text.push_str(&entries.join("\n"));
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_entries_at_channel_info_markers() {
        let raw = "#EXTM3U\n#EXTINF:-1,Channel A\nhttp://a.test/x\n#EXTVLCOPT:foo\n#EXTINF:-1,Channel B\nhttp://b.test/y\n";

        let entries = extract_entries(raw);

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            "#EXTINF:-1,Channel A\nhttp://a.test/x\n#EXTVLCOPT:foo\n"
        );
        assert_eq!(entries[1], "#EXTINF:-1,Channel B\nhttp://b.test/y\n");
    }

    #[test]
    fn preserves_entry_order() {
        let raw = "#EXTINF:-1,One\nhttp://s.test/1\n#EXTINF:-1,Two\nhttp://s.test/2\n#EXTINF:-1,Three\nhttp://s.test/3\n";

        let names: Vec<&str> = extract_entries(raw)
            .iter()
            .map(|entry| entry.lines().next().unwrap())
            .collect();

        assert_eq!(
            names,
            ["#EXTINF:-1,One", "#EXTINF:-1,Two", "#EXTINF:-1,Three"]
        );
    }

    #[test]
    fn yields_nothing_without_markers() {
        assert!(extract_entries("").is_empty());
        assert!(extract_entries("#EXTM3U\nsome stray line\n").is_empty());
    }

    #[test]
    fn marker_must_start_a_line() {
        let raw = "#EXTINF:-1,A\nhttp://a.test/x?tag=#EXTINF\n";

        assert_eq!(extract_entries(raw).len(), 1);
    }

    #[test]
    fn header_carries_playlist_and_epg_markers() {
        let mut lines = PLAYLIST_HEADER.lines();

        assert_eq!(lines.next(), Some("#EXTM3U"));
        assert_eq!(
            lines.next(),
            Some(r#"#EXTM3U x-tvg-url="https://assets.livednow.com/epg.xml""#)
        );
        assert_eq!(lines.next(), Some(""));
    }
}
