use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Info-hash run inside a magnet URI: hex digits after `btih:`, ended by
    /// an optional `&`.
    pub(crate) static ref MAGNET_INFO_HASH: Regex =
        Regex::new("btih:([0-9a-fA-F]+)&?").unwrap();
}
