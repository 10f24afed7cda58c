//! MyTV SUPER checkout: mints per-channel DRM-protected stream URLs and
//! renders them as playlist entries with embedded clearkey licences.

use std::time::Duration;

use anyhow::{Context, Result, ensure};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::instrument;

pub const CHECKOUT_URL: &str = "https://user-api.mytvsuper.com/v1/channel/checkout";

/// The upstream API refuses non-browser clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.5.2 Safari/605.1.15";

/// Hong Kong residential address; the API geo-blocks everything else.
const HK_FORWARDED_FOR: &str = "210.6.4.148";

/// A channel in the lineup with its clearkey licence.
#[derive(Debug, Clone)]
pub struct DrmChannel {
    /// Network code the checkout API keys on.
    pub code: &'static str,
    pub name: &'static str,
    /// Clearkey licence as `kid:key` hex.
    pub license_key: &'static str,
    pub logo: &'static str,
}

/// Channel lineup, in playlist order.
pub const CHANNEL_LIST: &[DrmChannel] = &[
    DrmChannel {
        code: "J",
        name: "翡翠台",
        license_key: "0958b9c657622c465a6205eb2252b8ed:2d2fd7b1661b1e28de38268872b48480",
        logo: "https://github.com/wanglindl/TVlogo/blob/main/img/TVB1.png?raw=true",
    },
    DrmChannel {
        code: "JUHD",
        name: "翡翠台 4K",
        license_key: "2c045f5adb26d391cc41cd01f00416fa:fc146771a9b096fc4cb57ffe769861be",
        logo: "https://github.com/wanglindl/TVlogo/blob/main/img/TVB1.png?raw=true",
    },
    DrmChannel {
        code: "B",
        name: "TVBplus",
        license_key: "56603b65fa1d7383b6ef0e73b9ae69fa:5d9d8e957d2e45d8189a56fe8665aaaa",
        logo: "https://raw.githubusercontent.com/wanglindl/TVlogo/main/img/TVB3.png",
    },
    DrmChannel {
        code: "P",
        name: "明珠台",
        license_key: "e04facdd91354deee318c674993b74c1:8f97a629de680af93a652c3102b65898",
        logo: "https://github.com/wanglindl/TVlogo/blob/main/img/TVB1.png?raw=true",
    },
    DrmChannel {
        code: "CWIN",
        name: "Super Free",
        license_key: "0737b75ee8906c00bb7bb8f666da72a0:15f515458cdb5107452f943a111cbe89",
        logo: "",
    },
    DrmChannel {
        code: "TVG",
        name: "黄金翡翠台",
        license_key: "8fe3db1a24969694ae3447f26473eb9f:5cce95833568b9e322f17c61387b306f",
        logo: "https://github.com/sparkssssssssss/epg/blob/main/logo/%E9%BB%84%E9%87%91%E7%BF%A1%E7%BF%A0%E5%8F%B0.png?raw=true",
    },
    DrmChannel {
        code: "C",
        name: "无线新闻台",
        license_key: "90a0bd01d9f6cbb39839cd9b68fc26bc:51546d1f2af0547f0e961995b60a32a1",
        logo: "https://raw.githubusercontent.com/wanglindl/TVlogo/main/img/TVB4.png",
    },
    DrmChannel {
        code: "CTVE",
        name: "娱乐新闻台",
        license_key: "6fa0e47750b5e2fb6adf9b9a0ac431a3:a256220e6c2beaa82f4ca5fba4ec1f95",
        logo: "https://github.com/sparkssssssssss/epg/blob/main/logo/%E5%A8%B1%E4%B9%90%E6%96%B0%E9%97%BB%E5%8F%B0.png?raw=true",
    },
    DrmChannel {
        code: "PCC",
        name: "凤凰卫视中文台",
        license_key: "7bca0771ba9205edb5d467ce2fdf0162:eb19c7e3cea34dc90645e33f983b15ab",
        logo: "https://raw.githubusercontent.com/wanglindl/TVlogo/main/img/Phoenix1.png",
    },
    DrmChannel {
        code: "PIN",
        name: "凤凰卫视资讯台",
        license_key: "83f7d313adfc0a5b978b9efa0421ce25:ecdc8065a46287bfb58e9f765e4eec2b",
        logo: "https://raw.githubusercontent.com/wanglindl/TVlogo/main/img/Phoenix2.png",
    },
    DrmChannel {
        code: "PHK",
        name: "凤凰卫视香港台",
        license_key: "cde62e1056eb3615dab7a3efd83f5eb4:b8685fbecf772e64154630829cf330a3",
        logo: "https://raw.githubusercontent.com/wanglindl/TVlogo/main/img/Phoenix3.png",
    },
    DrmChannel {
        code: "EVT1",
        name: "myTV SUPER直播足球1台",
        license_key: "e8ca7903e25450d85cb32b3057948522:d5db5c03608f5f6c8a382c6abcb829e4",
        logo: "",
    },
];

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutResponse {
    pub profiles: Vec<StreamProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamProfile {
    pub quality: String,
    pub streaming_path: String,
}

#[must_use]
pub fn init_checkout_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Unable to build HTTP client")
}

/// Mints a playable stream URL for `channel` via the checkout API.
///
/// # Errors
/// Errors on network failure, a non-success response, or a lineup without a
/// high quality profile.
#[instrument(skip(client, api_token))]
pub async fn checkout_stream_url(
    client: &reqwest::Client,
    api_token: &str,
    channel: &str,
) -> Result<String> {
    let req = client
        .get(CHECKOUT_URL)
        .query(&[("platform", "android_tv"), ("network_code", channel)])
        .header(AUTHORIZATION, format!("Bearer {api_token}"))
        .header("Accept", "application/json")
        .header("Accept-Language", "zh-CN,zh-Hans;q=0.9")
        .header("Origin", "https://www.mytvsuper.com")
        .header("Referer", "https://www.mytvsuper.com/")
        .header("X-Forwarded-For", HK_FORWARDED_FOR)
        .send()
        .await
        .context("Requesting channel checkout")?;
    ensure!(
        req.status().is_success(),
        "Checkout failed with status {}",
        req.status()
    );

    let res = req
        .json::<CheckoutResponse>()
        .await
        .context("Parsing checkout response")?;

    select_stream_path(res).context("No high quality profile in checkout response")
}

/// Picks the high quality profile and strips the per-session `&p=` token the
/// API appends to the path.
fn select_stream_path(res: CheckoutResponse) -> Option<String> {
    let profile = res.profiles.into_iter().find(|p| p.quality == "high")?;

    let path = match profile.streaming_path.split_once("&p=") {
        Some((base, _)) => base.to_string(),
        None => profile.streaming_path,
    };

    if path.is_empty() { None } else { Some(path) }
}

/// Renders one playlist block: EXTINF metadata, the clearkey properties a
/// player needs for MPEG-DASH playback, then the stream URL.
#[must_use]
pub fn format_channel_entry(channel: &DrmChannel, stream_url: &str) -> String {
    indoc::formatdoc! {r#"
        #EXTINF:-1 tvg-id="{code}" tvg-logo="{logo}",{name}
        #KODIPROP:inputstream.adaptive.manifest_type=mpd
        #KODIPROP:inputstream.adaptive.license_type=clearkey
        #KODIPROP:inputstream.adaptive.license_key={license}
        {url}
    "#,
        code = channel.code,
        logo = channel.logo,
        name = channel.name,
        license = channel.license_key,
        url = stream_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> CheckoutResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn selects_the_high_quality_profile() {
        let res = response(
            r#"{"profiles": [
                {"quality": "low", "streaming_path": "https://cdn.test/low.mpd"},
                {"quality": "high", "streaming_path": "https://cdn.test/high.mpd"}
            ]}"#,
        );

        assert_eq!(
            select_stream_path(res).unwrap(),
            "https://cdn.test/high.mpd"
        );
    }

    #[test]
    fn strips_the_session_token_suffix() {
        let res = response(
            r#"{"profiles": [
                {"quality": "high", "streaming_path": "https://cdn.test/high.mpd?x=1&p=abcdef"}
            ]}"#,
        );

        assert_eq!(
            select_stream_path(res).unwrap(),
            "https://cdn.test/high.mpd?x=1"
        );
    }

    #[test]
    fn rejects_a_lineup_without_high_profile() {
        let res = response(
            r#"{"profiles": [{"quality": "mid", "streaming_path": "https://cdn.test/mid.mpd"}]}"#,
        );

        assert!(select_stream_path(res).is_none());
    }

    #[test]
    fn rejects_an_empty_streaming_path() {
        let res = response(r#"{"profiles": [{"quality": "high", "streaming_path": ""}]}"#);

        assert!(select_stream_path(res).is_none());
    }

    #[test]
    fn formats_a_full_drm_entry() {
        let channel = &CHANNEL_LIST[0];

        let entry = format_channel_entry(channel, "https://cdn.test/j.mpd");

        assert!(entry.starts_with(r#"#EXTINF:-1 tvg-id="J" "#));
        assert!(entry.contains(",翡翠台\n"));
        assert!(entry.contains("#KODIPROP:inputstream.adaptive.manifest_type=mpd\n"));
        assert!(entry.contains("#KODIPROP:inputstream.adaptive.license_type=clearkey\n"));
        assert!(entry.contains(&format!(
            "#KODIPROP:inputstream.adaptive.license_key={}\n",
            channel.license_key
        )));
        assert!(entry.ends_with("https://cdn.test/j.mpd\n"));
    }
}
