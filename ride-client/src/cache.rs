//! Caching layer for reference listings.
//!
//! Vendor and emergency listings change rarely, so repeated lookups within
//! the TTL are served from memory. Trips, bookings and fuel estimates always
//! go to the backend.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::api::{ApiError, EmergencyService, EmergencyType, RideClient, Vendor, VendorType};

type VendorEntry = Arc<Vec<Vendor>>;
type EmergencyEntry = Arc<Vec<EmergencyService>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per listing.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 64,
        }
    }
}

/// Ride client with cached vendor and emergency listings.
pub struct CachedRideClient {
    client: RideClient,
    vendors: MokaCache<Option<VendorType>, VendorEntry>,
    emergency: MokaCache<Option<EmergencyType>, EmergencyEntry>,
}

impl CachedRideClient {
    /// Create a new cached client.
    pub fn new(client: RideClient, config: &CacheConfig) -> Self {
        Self {
            client,
            vendors: MokaCache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build(),
            emergency: MokaCache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build(),
        }
    }

    /// Vendors of one type (or all), using the cache if available.
    pub async fn vendors(&self, vendor_type: Option<VendorType>) -> Result<VendorEntry, ApiError> {
        if let Some(cached) = self.vendors.get(&vendor_type).await {
            tracing::debug!(?vendor_type, "vendor listing served from cache");
            return Ok(cached);
        }

        let entry = Arc::new(self.client.vendors(vendor_type).await?);
        self.vendors.insert(vendor_type, entry.clone()).await;
        Ok(entry)
    }

    /// Emergency services of one type (or all), using the cache if available.
    pub async fn emergency_services(
        &self,
        service_type: Option<EmergencyType>,
    ) -> Result<EmergencyEntry, ApiError> {
        if let Some(cached) = self.emergency.get(&service_type).await {
            tracing::debug!(?service_type, "emergency listing served from cache");
            return Ok(cached);
        }

        let entry = Arc::new(self.client.emergency_services(service_type).await?);
        self.emergency.insert(service_type, entry.clone()).await;
        Ok(entry)
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &RideClient {
        &self.client
    }

    /// Number of cached listings.
    pub fn cache_entry_count(&self) -> u64 {
        self.vendors.entry_count() + self.emergency.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.vendors.invalidate_all();
        self.emergency.invalidate_all();
    }
}
