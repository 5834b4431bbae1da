//! Product service: cached category fetches and the click-ranked hot list

use crate::cache::CacheStore;
use crate::config::CatalogConfig;
use crate::error::{FetchError, Result};
use crate::fetcher::RetryingFetcher;
use crate::hot::{rank_hot_products, ClickStats};
use crate::transport::{HttpTransport, Transport};
use crate::types::{CacheInfo, Product};
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// Endpoint name that selects the click-ranked list instead of a category
pub const HOT_ENDPOINT: &str = "hot";
const HOT_CACHE_KEY: &str = "__hot_stats_products__";

/// Maps a category endpoint name to the URL its listing is fetched from
pub trait CategoryUrlResolver: Send + Sync {
    fn category_url(&self, endpoint: &str) -> String;
}

/// `<base_url>/<percent-encoded endpoint>`
pub struct BaseUrlResolver {
    base_url: String,
}

impl BaseUrlResolver {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl CategoryUrlResolver for BaseUrlResolver {
    fn category_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(endpoint))
    }
}

/// Catalog access with retry, caching and hot-list aggregation
pub struct ProductService {
    config: CatalogConfig,
    fetcher: RetryingFetcher,
    cache: CacheStore,
    urls: Arc<dyn CategoryUrlResolver>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl ProductService {
    /// Create a service talking HTTP through `reqwest`
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a service on top of a custom transport
    pub fn with_transport(config: CatalogConfig, transport: Arc<dyn Transport>) -> Self {
        let fetcher = RetryingFetcher::new(
            transport,
            config.timeout,
            config.retry_count,
            config.retry_delay,
        );
        let cache = CacheStore::new(&config.cache);
        let urls = Arc::new(BaseUrlResolver::new(&config.base_url));

        Self {
            config,
            fetcher,
            cache,
            urls,
            rng: Mutex::new(Box::new(StdRng::from_entropy())),
        }
    }

    /// Replace the random source used for hot-list selection and shuffling
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    /// Replace how category endpoints map to URLs
    pub fn with_url_resolver(mut self, urls: Arc<dyn CategoryUrlResolver>) -> Self {
        self.urls = urls;
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Products for `endpoint`; `"hot"` (any case) returns the click-ranked list
    pub async fn fetch_products(&self, endpoint: &str) -> Result<Arc<Vec<Product>>> {
        if endpoint.eq_ignore_ascii_case(HOT_ENDPOINT) {
            return self.fetch_hot().await;
        }
        self.fetch_category(endpoint).await
    }

    /// Cached fetch of a single category
    async fn fetch_category(&self, endpoint: &str) -> Result<Arc<Vec<Product>>> {
        if let Some(cached) = self.cache.get(endpoint).await {
            debug!(endpoint, "Using cached products");
            return Ok(cached);
        }

        match self.fetch_category_raw(endpoint).await {
            Ok(products) => {
                let products = Arc::new(products);
                self.cache.insert(endpoint, products.clone()).await;
                Ok(products)
            }
            Err(e) => {
                error!(endpoint, error = %e, "Failed to fetch products");
                Err(e.into())
            }
        }
    }

    /// Fetch and validate one category, bypassing the cache and hot routing
    pub async fn fetch_category_raw(
        &self,
        endpoint: &str,
    ) -> std::result::Result<Vec<Product>, FetchError> {
        let url = self.urls.category_url(endpoint);
        let body = self.fetcher.fetch_json(&url).await?;

        let Value::Array(items) = body else {
            return Err(FetchError::Decode(format!(
                "expected a product array from {url}"
            )));
        };

        let total = items.len();
        let products: Vec<Product> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(fields) => Some(Product::new(fields)),
                _ => None,
            })
            .filter(Product::is_valid)
            .collect();

        debug!(endpoint, total, valid = products.len(), "Fetched category");
        Ok(products)
    }

    /// Products ranked by recent click statistics across every category
    ///
    /// Falls back to the configured fallback category when nothing can be
    /// ranked or when building the list fails.
    pub async fn fetch_hot(&self) -> Result<Arc<Vec<Product>>> {
        if let Some(cached) = self.cache.get(HOT_CACHE_KEY).await {
            debug!("Using cached hot products");
            return Ok(cached);
        }

        let outcome = match self.build_hot().await {
            Ok(ranked) if ranked.is_empty() => {
                warn!(
                    fallback = %self.config.fallback_category,
                    "No products matched click statistics, using fallback category"
                );
                self.fetch_category_raw(&self.config.fallback_category).await
            }
            other => other,
        };

        match outcome {
            Ok(products) => {
                let products = Arc::new(products);
                self.cache.insert(HOT_CACHE_KEY, products.clone()).await;
                Ok(products)
            }
            Err(e) => {
                error!(error = %e, "Failed to build hot products");
                match self.fetch_category_raw(&self.config.fallback_category).await {
                    Ok(products) => Ok(Arc::new(products)),
                    Err(fallback) => {
                        error!(error = %fallback, "Hot fallback category failed");
                        Err(e.into())
                    }
                }
            }
        }
    }

    async fn build_hot(&self) -> std::result::Result<Vec<Product>, FetchError> {
        let stats_url = self
            .config
            .stats_query
            .url(&self.config.stats_base_url);
        let stats = ClickStats::from_response(&self.fetcher.fetch_json(&stats_url).await?);

        let endpoints: Vec<&str> = self
            .config
            .categories
            .iter()
            .map(String::as_str)
            .filter(|ep| !ep.eq_ignore_ascii_case(HOT_ENDPOINT))
            .collect();

        let lists = join_all(endpoints.iter().map(|ep| async move {
            match self.fetch_category(ep).await {
                Ok(products) => products,
                Err(e) => {
                    warn!(endpoint = *ep, error = %e, "Skipping category for hot products");
                    Arc::new(Vec::new())
                }
            }
        }))
        .await;

        let combined: Vec<Product> = lists
            .iter()
            .flat_map(|list| list.iter().cloned())
            .collect();

        let ranked = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rank_hot_products(&combined, &stats, &mut **rng)
        };

        info!(
            stats = stats.len(),
            categories = endpoints.len(),
            combined = combined.len(),
            ranked = ranked.len(),
            "Built hot products"
        );
        Ok(ranked)
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    pub async fn cache_info(&self) -> CacheInfo {
        self.cache.info().await
    }
}
