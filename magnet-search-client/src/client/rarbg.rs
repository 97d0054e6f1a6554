use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use surf::{Client, StatusCode};
use tokio::sync::RwLock;
use utils::query_params::{url_with_params, QueryParams};
use utils::surf_logging::SurfLogging;

use crate::cache::SharedTorrentCache;
use crate::client::MagnetFinder;
use crate::error::{Error, ErrorKind};
use crate::limiter::RequestGate;
use crate::quality::Quality;
use crate::token::SessionToken;
use crate::torrent::{info_hash_from_magnet, Torrent};

/// Application identity sent with every upstream request.
const APP_ID: &str = "magnet-search-client";
/// The upstream bans clients that talk faster than this.
const REQUEST_INTERVAL: Duration = Duration::from_secs(2);
/// Cache keys carry the indexer name, so queries routed through other
/// indexers sharing a store never collide.
const CACHE_KEY_SUFFIX: &str = "-RARBG";
const API_PATH: &str = "/pubapi_v2.php";
const USER_AGENT: &str = "curl/7.47.0";

/// Connection settings for [`RarbgClient`]; fixed at construction.
#[derive(Clone, Debug)]
pub struct RarbgConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// How long a stored result list is served before a full re-fetch.
    pub cache_age: chrono::Duration,
}

impl Default for RarbgConfig {
    fn default() -> Self {
        Self {
            base_url: "https://torrentapi.org".to_string(),
            timeout: Duration::from_secs(5),
            cache_age: chrono::Duration::hours(24),
        }
    }
}

/// Client for the RARBG torrent API: finds magnet links for movies and
/// episodes by IMDb ID, caches result lists, and throttles every upstream
/// call through one shared gate.
///
/// Cloning is cheap; clones share the session token, the request gate and
/// the cache handle.
#[derive(Clone)]
pub struct RarbgClient {
    http: Client,
    base_url: String,
    cache: SharedTorrentCache,
    cache_age: chrono::Duration,
    token: Arc<RwLock<SessionToken>>,
    gate: Arc<RequestGate>,
}

impl RarbgClient {
    pub fn new(config: RarbgConfig, cache: SharedTorrentCache) -> Result<Self, Error> {
        let http: Client = surf::Config::new()
            .set_timeout(Some(config.timeout))
            .try_into()
            .map_err(|err| ErrorKind::Config(format!("couldn't build HTTP client: {err}")))?;

        Ok(Self {
            http: http.with(SurfLogging),
            base_url: config.base_url,
            cache,
            cache_age: config.cache_age,
            token: Arc::new(RwLock::new(SessionToken::default())),
            gate: Arc::new(RequestGate::new(REQUEST_INTERVAL)),
        })
    }

    async fn find(&self, id: &str, params: QueryParams) -> Result<Vec<Torrent>, Error> {
        let cache_key = format!("{id}{CACHE_KEY_SUFFIX}");
        match self.cache.get(&cache_key) {
            Ok(Some(entry)) if entry.is_fresh(self.cache_age) => {
                log::debug!("Returning cached torrents for {}", cache_key);
                return Ok(entry.torrents);
            }
            Ok(_) => {}
            Err(err) => log::error!("Cache lookup for {} failed: {}", cache_key, err),
        }

        if let Err(err) = self.ensure_token().await {
            // An upstream auth hiccup degrades to "no results"; only search
            // failures are surfaced.
            log::error!("couldn't refresh token: {}", err);
            return Ok(vec![]);
        }

        let torrents = self.search(params).await?;

        if let Err(err) = self.cache.set(&cache_key, &torrents) {
            log::error!("couldn't cache torrents for {}: {}", cache_key, err);
        }
        Ok(torrents)
    }

    /// Issues the rate-limited search request and extracts the result list.
    async fn search(&self, params: QueryParams) -> Result<Vec<Torrent>, Error> {
        let permit = self.gate.acquire().await;

        let token = self.token.read().await.value().to_string();
        let query = QueryParams::new()
            .push("app_id", APP_ID)
            .push("mode", "search")
            .push("sort", "seeders")
            .push("format", "json_extended")
            .push("ranked", "0")
            .push("token", token)
            .merge(params);
        let url = url_with_params(&self.base_url, API_PATH, &query)
            .map_err(|err| ErrorKind::Config(err.to_string()))?;

        let mut res = self
            .http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "*/*")
            .await?;
        if res.status() != StatusCode::Ok {
            return Err(ErrorKind::Status(res.status()).into());
        }
        let body = res.body_string().await?;
        drop(permit);

        Ok(extract_torrents(&body))
    }

    async fn ensure_token(&self) -> Result<(), Error> {
        // Advisory fast path; the check under the gate is authoritative.
        if self.token.read().await.is_valid() {
            return Ok(());
        }
        self.refresh_token().await
    }

    async fn refresh_token(&self) -> Result<(), Error> {
        let permit = self.gate.acquire().await;
        // Another caller may have refreshed while this one waited.
        if self.token.read().await.is_valid() {
            return Ok(());
        }

        let params = QueryParams::new()
            .push("app_id", APP_ID)
            .push("get_token", "get_token");
        let url = url_with_params(&self.base_url, API_PATH, &params)
            .map_err(|err| ErrorKind::Config(err.to_string()))?;

        let mut res = self
            .http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "*/*")
            .await?;
        if res.status() != StatusCode::Ok {
            return Err(ErrorKind::Status(res.status()).into());
        }
        let body = res.body_string().await?;
        drop(permit);

        let payload: Value = serde_json::from_str(&body).map_err(ErrorKind::Decode)?;
        let value = payload
            .get("token")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if value.is_empty() {
            return Err(ErrorKind::EmptyToken.into());
        }

        *self.token.write().await = SessionToken::issue(value.to_string());
        log::debug!("Refreshed upstream session token");
        Ok(())
    }
}

#[async_trait]
impl MagnetFinder for RarbgClient {
    async fn find_movie(&self, imdb_id: &str) -> Result<Vec<Torrent>, Error> {
        let params = QueryParams::new().push("search_imdb", imdb_id);
        self.find(imdb_id, params).await
    }

    async fn find_episode(
        &self,
        imdb_id: &str,
        season: u32,
        episode: u32,
    ) -> Result<Vec<Torrent>, Error> {
        // The query identity keeps the raw numbers; only the search string
        // is zero-padded.
        let id = format!("{imdb_id}:{season}:{episode}");
        let params = QueryParams::new()
            .push("search_imdb", imdb_id)
            .push("search_string", format!("S{season:02}E{episode:02}"));
        self.find(&id, params).await
    }
}

/// Pulls the recognized torrent entries out of a raw search payload. A
/// missing or empty `torrent_results` array means no results, not a failure.
fn extract_torrents(body: &str) -> Vec<Torrent> {
    let payload: Value = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(err) => {
            log::debug!("Unparseable search payload: {}", err);
            return vec![];
        }
    };

    payload
        .get("torrent_results")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(extract_entry).collect())
        .unwrap_or_default()
}

/// One upstream entry becomes one [`Torrent`], or nothing when the title
/// carries no recognized quality marker or the magnet hash is malformed.
fn extract_entry(entry: &Value) -> Option<Torrent> {
    let name = entry.get("title")?.as_str()?.to_string();
    let quality = Quality::from_release_name(&name)?;
    let magnet = entry.get("download")?.as_str()?.to_string();
    let info_hash = info_hash_from_magnet(&magnet)?;
    let size = entry.get("size").and_then(Value::as_u64).unwrap_or_default();
    let seeders = entry
        .get("seeders")
        .and_then(Value::as_u64)
        .unwrap_or_default();

    Some(Torrent::new(name, quality, info_hash, magnet, size, seeders))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_entries_in_upstream_order() {
        let body = serde_json::json!({
            "torrent_results": [
                {
                    "title": "Movie.Name.2020.2160p.WEB",
                    "download": "magnet:?xt=urn:btih:ABCDEF0123456789ABCDEF0123456789ABCDEF01&tr=x",
                    "size": 4_294_967_296u64,
                    "seeders": 12
                },
                {
                    "title": "Movie.Name.2020.1080p.WEB",
                    "download": "magnet:?xt=urn:btih:abcdef0123456789abcdef0123456789abcdef02&tr=x",
                    "size": 2_147_483_648u64,
                    "seeders": 120
                }
            ]
        })
        .to_string();

        let torrents = extract_torrents(&body);
        assert_eq!(torrents.len(), 2);
        assert_eq!(*torrents[0].quality(), Quality::P2160);
        assert_eq!(
            torrents[0].info_hash(),
            "abcdef0123456789abcdef0123456789abcdef01"
        );
        assert_eq!(*torrents[1].seeders(), 120);
    }

    #[test]
    fn drops_entries_without_quality_marker() {
        let body = serde_json::json!({
            "torrent_results": [{
                "title": "Movie.Name.480p",
                "download": "magnet:?xt=urn:btih:abcdef0123456789abcdef0123456789abcdef01&tr=x",
                "seeders": 50
            }]
        })
        .to_string();

        assert!(extract_torrents(&body).is_empty());
    }

    #[test]
    fn drops_entries_with_malformed_hash() {
        let body = serde_json::json!({
            "torrent_results": [{
                "title": "Movie.Name.2020.1080p.WEB",
                // 38 hex chars.
                "download": "magnet:?xt=urn:btih:ABCDEF0123456789ABCDEF0123456789ABCDEF&tr=x",
                "seeders": 50
            }]
        })
        .to_string();

        assert!(extract_torrents(&body).is_empty());
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let body = serde_json::json!({
            "torrent_results": [{
                "title": "Movie.Name.2020.720p.WEB",
                "download": "magnet:?xt=urn:btih:abcdef0123456789abcdef0123456789abcdef01"
            }]
        })
        .to_string();

        let torrents = extract_torrents(&body);
        assert_eq!(torrents.len(), 1);
        assert_eq!(*torrents[0].size(), 0);
        assert_eq!(*torrents[0].seeders(), 0);
    }

    #[test]
    fn payload_without_results_yields_empty_list() {
        assert!(extract_torrents(r#"{"error":"No results found","error_code":20}"#).is_empty());
        assert!(extract_torrents(r#"{"torrent_results":[]}"#).is_empty());
        assert!(extract_torrents("gateway timeout").is_empty());
    }
}
