//! Client configuration

use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://ffbuy.example.com/api/category";
const DEFAULT_STATS_BASE_URL: &str = "https://webga4.lu10221.workers.dev";
const DEFAULT_FALLBACK_CATEGORY: &str = "Hot";
const DEFAULT_CATEGORIES: [&str; 6] = [
    "Hot",
    "Clothing",
    "Shoes",
    "Bags",
    "Accessories",
    "Electronics",
];

/// Configuration for a [`ProductService`](crate::ProductService)
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL category endpoints are appended to
    pub base_url: String,
    /// Base URL of the click statistics service
    pub stats_base_url: String,
    /// Deadline for each individual request attempt
    pub timeout: Duration,
    /// Retries after the first attempt
    pub retry_count: u32,
    /// Backoff unit; retry `n` waits `retry_delay * n`
    pub retry_delay: Duration,
    pub cache: CacheConfig,
    /// Every category endpoint known to the catalog (may include "hot")
    pub categories: Vec<String>,
    /// Category fetched directly when the hot list cannot be built
    pub fallback_category: String,
    pub stats_query: StatsQuery,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stats_base_url: DEFAULT_STATS_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            retry_count: 3,
            retry_delay: Duration::from_secs(1),
            cache: CacheConfig::default(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            fallback_category: DEFAULT_FALLBACK_CATEGORY.to_string(),
            stats_query: StatsQuery::default(),
        }
    }
}

/// Cache store limits
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl: Duration,
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(5 * 60),
            max_size: 50,
        }
    }
}

/// Parameters of the `field_stats` query used to rank hot products
#[derive(Debug, Clone, PartialEq)]
pub struct StatsQuery {
    pub event: String,
    pub field: String,
    pub unique: bool,
    pub days: u32,
    pub site_id: String,
}

impl Default for StatsQuery {
    fn default() -> Self {
        Self {
            event: "agent_click".to_string(),
            field: "product_id".to_string(),
            unique: false,
            days: 7,
            site_id: "ffbuy".to_string(),
        }
    }
}

impl StatsQuery {
    /// Full statistics URL under `base`
    pub fn url(&self, base: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("event", &self.event)
            .append_pair("field", &self.field)
            .append_pair("unique", if self.unique { "true" } else { "false" })
            .append_pair("days", &self.days.to_string())
            .append_pair("site_id", &self.site_id)
            .finish();
        format!("{}/api/field_stats?{}", base.trim_end_matches('/'), query)
    }
}
