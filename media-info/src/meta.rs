use getset::Getters;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};

lazy_static! {
    // Series years arrive as ranges such as "2011–2019"; the first run of
    // four digits is the year that matters.
    static ref LEADING_YEAR: Regex = Regex::new(r"^\d{4}").unwrap();
}

/// Metadata record for a movie or a single episode. Season and episode are
/// zero for movies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Getters)]
#[get = "pub"]
pub struct Meta {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default, deserialize_with = "leading_year")]
    year: u32,
    #[serde(rename = "Season", default, deserialize_with = "lenient_u32")]
    season: u32,
    #[serde(rename = "Episode", default, deserialize_with = "lenient_u32")]
    episode: u32,
}

// The API stringifies every number and uses "N/A" for absent values; both
// fall back to zero rather than failing the whole record.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_default())
}

fn leading_year<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(LEADING_YEAR
        .find(&raw)
        .and_then(|year| year.as_str().parse().ok())
        .unwrap_or_default())
}
