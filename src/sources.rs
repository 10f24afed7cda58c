/// One upstream playlist: display name, absolute URL, and whether its stream
/// URLs get routed through the proxy.
///
/// Registry order is significant: sources are fetched and appended to the
/// merged document in list order.
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub url: String,
    pub proxied: bool,
}

impl Source {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>, proxied: bool) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            proxied,
        }
    }
}

/// The fixed upstream registry.
#[must_use]
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new("央视频", "http://bolee.eu.org:56845/ysp.m3u", false),
        Source::new(
            "MyTVSuper",
            "http://bolee.eu.org:56845/mytvsuper-tivimate.m3u",
            true,
        ),
        Source::new("四季", "http://bolee.eu.org:56845/4gtv.m3u", true),
        Source::new(
            "油管",
            "http://bolee.eu.org:56845/youtube/list/你自己的YouTube播放列表",
            true,
        ),
    ]
}
