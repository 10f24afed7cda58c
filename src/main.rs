#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use m3u_magpie::fetch::init_http_client;
use m3u_magpie::playlist::build_playlist;
use m3u_magpie::rewrite::ProxyRewriter;
use m3u_magpie::sources::default_sources;
use tracing::info;

/// Aggregates the upstream IPTV playlist registry into a single merged
/// playlist, routing restricted streams through a forwarding proxy
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path the merged playlist is written to
    #[arg(short, long, default_value = "playlist.m3u")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let client = init_http_client();
    let rewriter = ProxyRewriter::from_env();
    let sources = default_sources();

    let playlist = build_playlist(&client, &sources, &rewriter).await;

    tokio::fs::write(&args.output, &playlist)
        .await
        .with_context(|| format!("Writing playlist to {:?}", args.output))?;
    info!("Playlist updated successfully");

    if std::env::var("TEST_MODE").is_ok_and(|v| v == "true") {
        println!("Test mode: Playlist content:");
        println!("{playlist}");
    }

    Ok(())
}
