//! Born 2 Ride REST client.
//!
//! Thin async wrappers over the backend endpoints. Every call is one HTTP
//! request; failures are logged and handed back to the caller unchanged.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{
    ApiOverview, Booking, DEFAULT_FUEL_PRICE, EmergencyService, EmergencyType, FuelEstimate,
    FuelRequest, NewBooking, NewTrip, Trip, VehicleType, Vendor, VendorSource, VendorType,
};

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Port the backend listens on.
pub const DEFAULT_PORT: u16 = 8000;

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix, without a trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Config for a backend on `host` at the default port.
    pub fn for_host(host: &str) -> Self {
        Self {
            base_url: format!("http://{host}:{DEFAULT_PORT}/api"),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::for_host(DEFAULT_HOST)
    }
}

/// Optional filters for the vendor listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorFilter {
    pub vendor_type: Option<VendorType>,
    pub is_open: Option<bool>,
    pub source: Option<VendorSource>,
}

impl VendorFilter {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(t) = self.vendor_type {
            query.push(("type", t.as_str().to_string()));
        }
        if let Some(open) = self.is_open {
            query.push(("is_open", open.to_string()));
        }
        if let Some(source) = self.source {
            query.push(("source", source.as_str().to_string()));
        }
        query
    }
}

/// Born 2 Ride API client.
#[derive(Debug, Clone)]
pub struct RideClient {
    http: reqwest::Client,
    base_url: String,
}

impl RideClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::info!(%base_url, "Born 2 Ride API client initialized");

        Ok(Self { http, base_url })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request against `endpoint` (e.g. `/trips/`).
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.get_with_query(endpoint, &[]).await
    }

    /// Make a POST request with `data` as the JSON body.
    pub async fn post<B, T>(&self, endpoint: &str, data: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "POST");

        let result = execute(self.http.post(&url).json(data)).await;

        if let Err(e) = &result {
            tracing::error!(error = %e, %url, "API POST Error");
        }
        result
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, ?query, "GET");

        let result = execute(self.http.get(&url).query(query)).await;

        if let Err(e) = &result {
            tracing::error!(error = %e, %url, "API GET Error");
        }
        result
    }

    // Trips

    /// Create a new trip. The backend fills in the fuel figures.
    pub async fn create_trip(&self, trip: &NewTrip) -> Result<Trip, ApiError> {
        self.post("/trips/", trip).await
    }

    /// Get all trips, newest first.
    pub async fn trips(&self) -> Result<Vec<Trip>, ApiError> {
        self.get("/trips/").await
    }

    /// Get a specific trip by ID.
    pub async fn trip(&self, trip_id: u64) -> Result<Trip, ApiError> {
        self.get(&format!("/trips/{trip_id}/")).await
    }

    // Fuel

    /// Calculate fuel cost for a distance.
    ///
    /// `fuel_price` is INR per litre and defaults to [`DEFAULT_FUEL_PRICE`].
    pub async fn calculate_fuel(
        &self,
        distance_km: f64,
        vehicle_type: VehicleType,
        fuel_price: Option<f64>,
    ) -> Result<FuelEstimate, ApiError> {
        let body = FuelRequest {
            distance_km,
            vehicle_type,
            fuel_price: fuel_price.unwrap_or(DEFAULT_FUEL_PRICE),
        };
        self.post("/calculate-fuel/", &body).await
    }

    // Vendors

    /// Get vendors, optionally only those of one type.
    pub async fn vendors(&self, vendor_type: Option<VendorType>) -> Result<Vec<Vendor>, ApiError> {
        self.get(&vendors_endpoint(vendor_type)).await
    }

    pub async fn food_vendors(&self) -> Result<Vec<Vendor>, ApiError> {
        self.vendors(Some(VendorType::Food)).await
    }

    pub async fn hotels(&self) -> Result<Vec<Vendor>, ApiError> {
        self.vendors(Some(VendorType::Hotel)).await
    }

    pub async fn workshops(&self) -> Result<Vec<Vendor>, ApiError> {
        self.vendors(Some(VendorType::Workshop)).await
    }

    /// Get vendors matching every filter that is set.
    pub async fn search_vendors(&self, filter: &VendorFilter) -> Result<Vec<Vendor>, ApiError> {
        self.get_with_query("/vendors/", &filter.query()).await
    }

    /// Get a single vendor by ID.
    pub async fn vendor(&self, vendor_id: u64) -> Result<Vendor, ApiError> {
        self.get(&format!("/vendors/{vendor_id}/")).await
    }

    // Emergency services

    /// Get emergency services, optionally only those of one type.
    pub async fn emergency_services(
        &self,
        service_type: Option<EmergencyType>,
    ) -> Result<Vec<EmergencyService>, ApiError> {
        self.get(&emergency_endpoint(service_type)).await
    }

    pub async fn police_stations(&self) -> Result<Vec<EmergencyService>, ApiError> {
        self.emergency_services(Some(EmergencyType::Police)).await
    }

    pub async fn hospitals(&self) -> Result<Vec<EmergencyService>, ApiError> {
        self.emergency_services(Some(EmergencyType::Hospital)).await
    }

    pub async fn ambulances(&self) -> Result<Vec<EmergencyService>, ApiError> {
        self.emergency_services(Some(EmergencyType::Ambulance)).await
    }

    pub async fn fire_stations(&self) -> Result<Vec<EmergencyService>, ApiError> {
        self.emergency_services(Some(EmergencyType::Fire)).await
    }

    pub async fn roadside_assistance(&self) -> Result<Vec<EmergencyService>, ApiError> {
        self.emergency_services(Some(EmergencyType::Roadside)).await
    }

    /// Get a single emergency service by ID.
    pub async fn emergency_service(&self, service_id: u64) -> Result<EmergencyService, ApiError> {
        self.get(&format!("/emergency/{service_id}/")).await
    }

    // Bookings

    pub async fn bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get("/bookings/").await
    }

    /// Book a hotel room or workshop slot.
    ///
    /// Fails with status 400 when a hotel has no rooms left and 404 when the
    /// vendor does not exist.
    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        self.post("/bookings/", booking).await
    }

    /// Describe the API root.
    pub async fn overview(&self) -> Result<ApiOverview, ApiError> {
        self.get("/").await
    }
}

/// Endpoint for the vendor listing, filtered by type when given.
pub fn vendors_endpoint(vendor_type: Option<VendorType>) -> String {
    match vendor_type {
        Some(t) => format!("/vendors/?type={t}"),
        None => "/vendors/".to_string(),
    }
}

/// Endpoint for the emergency listing, filtered by type when given.
pub fn emergency_endpoint(service_type: Option<EmergencyType>) -> String {
    match service_type {
        Some(t) => format!("/emergency/?type={t}"),
        None => "/emergency/".to_string(),
    }
}

/// Send a request and turn the response into `T`.
///
/// Non-2xx statuses become [`ApiError::Status`].
async fn execute<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| ApiError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}
