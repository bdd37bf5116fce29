//! Request URL construction.

use tracing::warn;

/// A query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Rendered as one `key=value` pair per element.
    List(Vec<String>),
    /// Omitted from the query.
    None,
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        QueryValue::List(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::None, Into::into)
    }
}

/// Builds REST URLs relative to a server base URL.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base_url: String,
}

impl UrlBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `<base>/api<path>?<query>`.
    ///
    /// The query lists `fields`, `$skip`, `$top` and then `extra` in order.
    /// Keys and values are percent-encoded, `None` values are dropped and
    /// lists repeat their key.
    pub fn build_url(
        &self,
        path: &str,
        fields: Option<&str>,
        offset: Option<i64>,
        count: Option<i64>,
        extra: &[(&str, QueryValue)],
    ) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(fields) = fields {
            pairs.push(("fields", fields.to_string()));
        }
        if let Some(offset) = offset {
            pairs.push(("$skip", offset.to_string()));
        }
        if let Some(count) = count {
            pairs.push(("$top", count.to_string()));
        }
        for (key, value) in extra {
            let key = *key;
            match value {
                QueryValue::Str(s) => pairs.push((key, s.clone())),
                QueryValue::Int(i) => pairs.push((key, i.to_string())),
                QueryValue::Bool(b) => pairs.push((key, b.to_string())),
                QueryValue::List(items) => {
                    pairs.extend(items.iter().map(|item| (key, item.clone())))
                }
                QueryValue::None => {}
            }
        }

        let mut url = format!("{}/api{}", self.base_url, path);
        if !pairs.is_empty() {
            let query = pairs
                .iter()
                .map(|(key, value)| {
                    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
                })
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// `<base><path>`, e.g. for [`Issue::url`](crate::model::Issue::url).
    pub fn get_absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Normalize a base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');

    // Plain HTTP is fine for local servers
    if !url.starts_with("https://") && !url.contains("localhost") {
        warn!("URL does not use HTTPS: {}. The token is sent in clear text.", url);
    }

    url.to_string()
}
