use std::fmt;

use multimap::MultiMap;
use url::form_urlencoded::Serializer;
use url::Url;

/// Multi-valued query-string builder; repeated keys accumulate values in
/// insertion order.
#[derive(Clone, Debug, Default)]
pub struct QueryParams {
    params: MultiMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn merge(mut self, other: QueryParams) -> Self {
        for (key, values) in other.params {
            for value in values {
                self.params.insert(key.clone(), value);
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut query = Serializer::new(String::new());
        for (key, values) in self.params.iter_all() {
            for value in values {
                query.append_pair(key, value);
            }
        }
        f.write_str(&query.finish())
    }
}

/// Joins `path` onto `base` and attaches the rendered query string.
pub fn url_with_params(
    base: &str,
    path: &str,
    params: &QueryParams,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?.join(path)?;
    if !params.is_empty() {
        url.set_query(Some(&params.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_encoded_pairs() {
        let params = QueryParams::new()
            .push("mode", "search")
            .push("search_string", "S03 E01&x");

        let rendered = params.to_string();
        assert!(rendered.contains("mode=search"));
        assert!(rendered.contains("search_string=S03+E01%26x"));
    }

    #[test]
    fn repeated_keys_keep_all_values() {
        let params = QueryParams::new()
            .push("tr", "udp://a")
            .merge(QueryParams::new().push("tr", "udp://b"));

        let rendered = params.to_string();
        assert!(rendered.contains("tr=udp%3A%2F%2Fa"));
        assert!(rendered.contains("tr=udp%3A%2F%2Fb"));
    }

    #[test]
    fn joins_path_onto_base() {
        let params = QueryParams::new().push("get_token", "get_token");
        let url = url_with_params("http://127.0.0.1:5000", "/pubapi_v2.php", &params)
            .expect("valid URL");

        assert_eq!(url.path(), "/pubapi_v2.php");
        assert_eq!(url.query(), Some("get_token=get_token"));
    }

    #[test]
    fn empty_params_leave_no_query() {
        let url = url_with_params("https://example.org/", "/api", &QueryParams::new())
            .expect("valid URL");
        assert_eq!(url.query(), None);
    }
}
