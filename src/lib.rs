#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

//! Playlist aggregation and MyTV SUPER checkout plumbing shared by the
//! `m3u-magpie` and `mytv-checkout` binaries.

pub mod fetch;
pub mod mytv;
pub mod playlist;
pub mod rewrite;
pub mod sources;
