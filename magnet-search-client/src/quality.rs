use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Video quality markers recognized in release names. Entries matching none
/// of them are dropped during extraction, never defaulted.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Quality {
    #[serde(rename = "720p")]
    #[strum(serialize = "720p")]
    P720,
    #[serde(rename = "1080p")]
    #[strum(serialize = "1080p")]
    P1080,
    #[serde(rename = "2160p")]
    #[strum(serialize = "2160p")]
    P2160,
}

impl Quality {
    /// Classifies a release name by marker substring, 720p first, then
    /// 1080p, then 2160p.
    pub fn from_release_name(name: &str) -> Option<Self> {
        if name.contains("720p") {
            Some(Quality::P720)
        } else if name.contains("1080p") {
            Some(Quality::P1080)
        } else if name.contains("2160p") {
            Some(Quality::P2160)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn classifies_recognized_markers() {
        assert_eq!(
            Quality::from_release_name("Movie.Name.2020.1080p.WEB"),
            Some(Quality::P1080)
        );
        assert_eq!(
            Quality::from_release_name("Show.S01E01.2160p.WEB"),
            Some(Quality::P2160)
        );
    }

    #[test]
    fn unrecognized_markers_classify_to_none() {
        assert_eq!(Quality::from_release_name("Movie.Name.480p"), None);
        assert_eq!(Quality::from_release_name(""), None);
    }

    #[test]
    fn first_marker_in_priority_order_wins() {
        assert_eq!(
            Quality::from_release_name("Pack.720p.and.1080p"),
            Some(Quality::P720)
        );
    }

    #[test]
    fn round_trips_through_wire_name() {
        assert_eq!(Quality::P720.to_string(), "720p");
        assert_eq!(Quality::from_str("2160p").ok(), Some(Quality::P2160));
    }
}
