pub mod rarbg;

use async_trait::async_trait;

use crate::error::Error;
use crate::torrent::Torrent;

/// A magnet-link source queryable by IMDb ID.
#[async_trait]
pub trait MagnetFinder {
    /// Looks up magnet links for a movie.
    async fn find_movie(&self, imdb_id: &str) -> Result<Vec<Torrent>, Error>;

    /// Looks up magnet links for a single episode.
    async fn find_episode(
        &self,
        imdb_id: &str,
        season: u32,
        episode: u32,
    ) -> Result<Vec<Torrent>, Error>;
}
