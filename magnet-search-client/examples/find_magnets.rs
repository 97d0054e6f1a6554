use std::sync::Arc;

use magnet_search_client::{MagnetFinder, MemoryCache, RarbgClient, RarbgConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let imdb_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tt0120338".to_string());

    let client = RarbgClient::new(RarbgConfig::default(), Arc::new(MemoryCache::default()))?;
    let torrents = client.find_movie(&imdb_id).await?;

    println!("Found {} torrents for {}", torrents.len(), imdb_id);
    for torrent in torrents {
        println!(
            "{} [{}] seeders={} size={} {}",
            torrent.name(),
            torrent.quality(),
            torrent.seeders(),
            torrent.size(),
            torrent.info_hash(),
        );
    }
    Ok(())
}
