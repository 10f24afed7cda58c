use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use m3u_magpie::mytv::{
    CHANNEL_LIST, checkout_stream_url, format_channel_entry, init_checkout_client,
};
use tracing::{info, warn};

/// Mints DRM-protected stream URLs for the MyTV SUPER lineup and writes them
/// as a playlist with embedded clearkey licences
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path the generated playlist is written to
    #[arg(short, long, default_value = "mytvfree.m3u")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let api_token = std::env::var("MYTV_TOKEN").expect("env MYTV_TOKEN not provided");

    let client = init_checkout_client();

    let mut playlist = String::from("#EXTM3U\n");
    let mut written = 0;
    for channel in CHANNEL_LIST {
        info!("Checking out stream for {} ({})", channel.name, channel.code);
        match checkout_stream_url(&client, &api_token, channel.code).await {
            Ok(url) => {
                playlist.push_str(&format_channel_entry(channel, &url));
                written += 1;
            }
            Err(e) => warn!("Skipping {}: {e:#}", channel.code),
        }
    }

    tokio::fs::write(&args.output, &playlist)
        .await
        .with_context(|| format!("Writing playlist to {:?}", args.output))?;
    info!(
        "Wrote {written} of {} channels to {:?}",
        CHANNEL_LIST.len(),
        args.output
    );

    Ok(())
}
