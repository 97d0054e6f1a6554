pub mod cache;
mod client;
mod error;
mod limiter;
mod quality;
mod r#static;
mod token;
mod torrent;


pub use cache::{CachedSearch, MemoryCache, SharedTorrentCache, TorrentCache};
pub use client::rarbg::{RarbgClient, RarbgConfig};
pub use client::MagnetFinder;
pub use error::{Error, ErrorKind};
pub use quality::Quality;
pub use torrent::Torrent;
