use reqwest::Url;

use super::param::Param;
use crate::error::QueryError;

const API_KEY: &str = "apikey";

/// Build a request URL from `base` and `params`.
///
/// The base URL's own query string is replaced. Parameters with an empty
/// value are left out, and the rest are sorted by name (repeated names keep
/// their relative order) so the same inputs always give the same URL.
pub fn encode_url(base: &str, params: &[Param]) -> Result<Url, QueryError> {
    let mut url = Url::parse(base).map_err(|e| QueryError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(QueryError::InvalidUrl {
            url: base.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    let mut pairs: Vec<&Param> = params.iter().filter(|p| !p.value.is_empty()).collect();
    pairs.sort_by(|a, b| a.name.cmp(&b.name));

    url.set_query(None);
    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        for param in pairs {
            query.append_pair(&param.name, &param.value);
        }
    }

    Ok(url)
}

/// [`encode_url`] for a flat `key, value, ...` list. An odd-length list is
/// rejected.
pub fn encode_url_pairs<S: AsRef<str>>(base: &str, flat: &[S]) -> Result<Url, QueryError> {
    let params = Param::from_pairs(flat)?;
    encode_url(base, &params)
}

/// Copy of `url` with the API key masked, for logging.
pub fn redact_api_key(url: &Url) -> Url {
    let mut redacted = url.clone();
    if !url.query_pairs().any(|(k, _)| k == API_KEY) {
        return redacted;
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == API_KEY {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}
