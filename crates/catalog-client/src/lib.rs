//! Product Catalog Client
//!
//! Fetches category product listings from a remote HTTP source with bounded
//! retry and a TTL/size-bounded in-memory cache, and builds a "hot" list by
//! joining click statistics against every category feed.
//!
//! # Example
//!
//! ```no_run
//! use catalog_client::{CatalogConfig, ProductService};
//!
//! # async fn example() -> Result<(), catalog_client::CatalogError> {
//! let service = ProductService::new(CatalogConfig::default());
//!
//! let shoes = service.fetch_products("Shoes").await?;
//! println!("{} shoes", shoes.len());
//!
//! // "hot" is ranked by recent click statistics
//! let hot = service.fetch_products("hot").await?;
//! for product in hot.iter().take(5) {
//!     println!("{:?} {:?}", product.detail_url(), product.hot_clicks());
//! }
//!
//! println!("{:?}", service.cache_info().await);
//! # Ok(())
//! # }
//! ```

mod cache;
mod config;
mod error;
mod fetcher;
mod hot;
mod identity;
mod service;
mod transport;
mod types;

#[cfg(test)]
mod test_support;

pub use cache::CacheStore;
pub use config::{CacheConfig, CatalogConfig, StatsQuery};
pub use error::{CatalogError, FetchError, Result};
pub use fetcher::RetryingFetcher;
pub use hot::{rank_hot_products, ClickStats};
pub use identity::identity_of;
pub use service::{BaseUrlResolver, CategoryUrlResolver, ProductService, HOT_ENDPOINT};
pub use transport::{HttpTransport, Transport};
pub use types::{CacheInfo, Product};
