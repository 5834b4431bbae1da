use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Price / badge text shown on the listing
pub(crate) const PRICE_FIELD: &str = "spbt";
/// Product image URL
pub(crate) const IMAGE_FIELD: &str = "ztURL";
/// Product detail page URL, also the key used to de-duplicate hot lists
pub(crate) const DETAIL_URL_FIELD: &str = "spURL";
/// Click count stamped onto products selected for the hot list
pub(crate) const HOT_CLICKS_FIELD: &str = "hotClicks";

/// A product record as returned by the catalog source
///
/// The record is kept as an opaque JSON object so that fields the client does
/// not know about survive the round trip to callers unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product(Map<String, Value>);

impl Product {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw field access
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Detail page URL (`spURL`), if present as a non-empty string
    pub fn detail_url(&self) -> Option<&str> {
        self.0
            .get(DETAIL_URL_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Click count attached by the hot aggregation
    pub fn hot_clicks(&self) -> Option<f64> {
        self.0.get(HOT_CLICKS_FIELD).and_then(Value::as_f64)
    }

    /// A product is listable only when price, image and detail URL are all set
    pub fn is_valid(&self) -> bool {
        [PRICE_FIELD, IMAGE_FIELD, DETAIL_URL_FIELD]
            .iter()
            .all(|field| self.0.get(*field).is_some_and(is_truthy))
    }

    /// Copy of this product carrying a `hotClicks` attribute
    pub fn with_hot_clicks(&self, clicks: f64) -> Self {
        let mut fields = self.0.clone();
        fields.insert(HOT_CLICKS_FIELD.to_string(), clicks_to_json(clicks));
        Self(fields)
    }
}

/// Diagnostic snapshot of the cache store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheInfo {
    pub size: usize,
    pub keys: Vec<String>,
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Whole click counts stay integers in the JSON output
fn clicks_to_json(clicks: f64) -> Value {
    if clicks.fract() == 0.0 && clicks.abs() < i64::MAX as f64 {
        Value::Number(Number::from(clicks as i64))
    } else {
        Number::from_f64(clicks).map_or(Value::from(0), Value::Number)
    }
}
