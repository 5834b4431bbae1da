//! Environment configuration

use catalog_client::CatalogConfig;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3005;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub catalog: CatalogConfig,
}

/// Load configuration from process environment variables
pub fn load_config() -> ServiceConfig {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration through `var`; unset or unparseable values keep their defaults
pub fn load_config_from(var: impl Fn(&str) -> Option<String>) -> ServiceConfig {
    let defaults = CatalogConfig::default();
    let parsed = |key: &str| var(key).and_then(|s| s.trim().parse::<u64>().ok());

    let port = var("PORT")
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let mut catalog = CatalogConfig {
        base_url: var("CATALOG_BASE_URL").unwrap_or(defaults.base_url),
        stats_base_url: var("CATALOG_STATS_URL").unwrap_or(defaults.stats_base_url),
        timeout: parsed("CATALOG_TIMEOUT_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout),
        retry_count: parsed("CATALOG_RETRY_COUNT")
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(defaults.retry_count),
        retry_delay: parsed("CATALOG_RETRY_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry_delay),
        cache: defaults.cache,
        categories: var("CATALOG_CATEGORIES")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|c| !c.is_empty())
            .unwrap_or(defaults.categories),
        fallback_category: var("CATALOG_FALLBACK_CATEGORY")
            .unwrap_or(defaults.fallback_category),
        stats_query: defaults.stats_query,
    };

    if let Some(enabled) = var("CATALOG_CACHE_ENABLED").and_then(|s| parse_bool(&s)) {
        catalog.cache.enabled = enabled;
    }
    if let Some(ttl) = parsed("CATALOG_CACHE_TTL_SECS") {
        catalog.cache.ttl = Duration::from_secs(ttl);
    }
    if let Some(max_size) = parsed("CATALOG_CACHE_MAX_SIZE") {
        catalog.cache.max_size = max_size as usize;
    }

    ServiceConfig { port, catalog }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
