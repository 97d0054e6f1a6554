use getset::Getters;
use serde::{Deserialize, Serialize};

use crate::quality::Quality;
use crate::r#static::MAGNET_INFO_HASH;

/// A normalized search hit pointing at a single torrent swarm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct Torrent {
    name: String,
    quality: Quality,
    info_hash: String,
    magnet: String,
    size: u64,
    seeders: u64,
}

impl Torrent {
    pub fn new(
        name: String,
        quality: Quality,
        info_hash: String,
        magnet: String,
        size: u64,
        seeders: u64,
    ) -> Self {
        Self {
            name,
            quality,
            info_hash,
            magnet,
            size,
            seeders,
        }
    }
}

/// Extracts the lowercased info hash from a magnet URI. Hashes that are not
/// exactly 40 characters are rejected.
pub fn info_hash_from_magnet(magnet: &str) -> Option<String> {
    let captures = MAGNET_INFO_HASH.captures(magnet)?;
    let hash = captures[1].to_ascii_lowercase();
    (hash.len() == 40).then_some(hash)
}
