mod error;
mod meta;


use std::time::Duration;

use serde_json::Value;
use surf::{Client, StatusCode};
use utils::query_params::{url_with_params, QueryParams};
use utils::surf_logging::SurfLogging;

pub use error::{Error, ErrorKind};
pub use meta::Meta;

const KIND_MOVIE: &str = "movie";
const KIND_EPISODE: &str = "episode";

/// Connection settings for [`MediaInfoClient`]; fixed at construction.
#[derive(Clone, Debug)]
pub struct MediaInfoConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for MediaInfoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.omdbapi.com/".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Metadata lookup client resolving IMDb IDs to titles, years and
/// season/episode numbers.
#[derive(Clone)]
pub struct MediaInfoClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl MediaInfoClient {
    pub fn new(config: MediaInfoConfig, api_key: String) -> Result<Self, Error> {
        let http: Client = surf::Config::new()
            .set_timeout(Some(config.timeout))
            .try_into()
            .map_err(|err| ErrorKind::Config(format!("couldn't build HTTP client: {err}")))?;

        Ok(Self {
            http: http.with(SurfLogging),
            base_url: config.base_url,
            api_key,
        })
    }

    pub async fn get_movie(&self, id: &str) -> Result<Meta, Error> {
        self.request_meta(KIND_MOVIE, id).await
    }

    pub async fn get_episode(&self, id: &str) -> Result<Meta, Error> {
        self.request_meta(KIND_EPISODE, id).await
    }

    async fn request_meta(&self, kind: &str, id: &str) -> Result<Meta, Error> {
        let params = QueryParams::new()
            .push("i", id)
            .push("type", kind)
            .push("apikey", self.api_key.as_str());
        let url = url_with_params(&self.base_url, "/", &params)
            .map_err(|err| ErrorKind::Config(err.to_string()))?;

        let mut res = self.http.get(url).await?;
        if res.status() != StatusCode::Ok {
            return Err(ErrorKind::Status(res.status()).into());
        }
        let body = res.body_string().await?;

        let payload: Value = serde_json::from_str(&body).map_err(ErrorKind::Decode)?;
        if payload.get("Response").and_then(Value::as_str) == Some("False") {
            let reason = payload
                .get("Error")
                .and_then(Value::as_str)
                .unwrap_or("unknown reason")
                .to_string();
            log::debug!("Lookup for {} came back empty: {}", id, reason);
            return Err(ErrorKind::Lookup(reason).into());
        }

        Ok(serde_json::from_value(payload).map_err(ErrorKind::Decode)?)
    }
}
