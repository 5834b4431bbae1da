//! Product identifier extraction

use crate::types::Product;
use regex::Regex;
use serde_json::Value;
use url::Url;

/// Explicit identifier fields, highest priority first
const ID_FIELDS: [&str; 3] = ["ID", "Id", "id"];
/// Detail URL query parameters that may carry the identifier
const ID_QUERY_PARAMS: [&str; 3] = ["itemID", "id", "productID"];
const MIN_PATH_ID_LEN: usize = 6;

lazy_static::lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"\d{6,}").unwrap();
}

/// Stable identifier of a product, used to join listings with click statistics
///
/// Tries the explicit id fields, then a numeric id query parameter of the
/// detail URL, then the last long numeric path segment. When the detail URL
/// cannot be parsed at all, the first run of six or more digits in it is used.
pub fn identity_of(product: &Product) -> Option<String> {
    if let Some(id) = ID_FIELDS
        .iter()
        .filter_map(|field| product.get(field).and_then(scalar_text))
        .map(|raw| raw.trim().to_string())
        .find(|id| !id.is_empty())
    {
        return Some(id);
    }

    let raw_url = product.detail_url()?;
    match Url::parse(raw_url) {
        Ok(url) => id_from_url(&url),
        Err(_) => DIGIT_RUN.find(raw_url).map(|m| m.as_str().to_string()),
    }
}

fn id_from_url(url: &Url) -> Option<String> {
    for param in ID_QUERY_PARAMS {
        let value = url
            .query_pairs()
            .find(|(key, _)| key == param)
            .map(|(_, value)| value.into_owned());
        if let Some(value) = value.filter(|v| is_all_digits(v)) {
            return Some(value);
        }
    }

    // Opaque paths (`shop:item/1234567`) have no segments but still split on '/'
    url.path()
        .rsplit('/')
        .find(|seg| seg.len() >= MIN_PATH_ID_LEN && is_all_digits(seg))
        .map(str::to_string)
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
