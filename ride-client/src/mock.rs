//! In-memory Born 2 Ride backend.
//!
//! Serves the same REST surface as the real backend from memory, seeded
//! with a small set of vendors and emergency services along NH-44. Used by
//! the test suite and by `born2ride mock-server` for working offline.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

use crate::api::{
    Booking, BookingStatus, EmergencyService, EmergencyType, FuelRequest, NewBooking, NewTrip,
    Trip, Vendor, VendorSource, VendorType,
};
use crate::fuel;

#[derive(Debug, Default)]
struct Store {
    trips: Vec<Trip>,
    vendors: Vec<Vendor>,
    emergency: Vec<EmergencyService>,
    bookings: Vec<Booking>,
    requests: usize,
    content_types: Vec<Option<String>>,
    fail_next: Option<u16>,
}

impl Store {
    fn next_id<T>(items: &[T]) -> u64 {
        items.len() as u64 + 1
    }
}

/// Mock backend holding all records in memory.
///
/// Clones share the same store, so a test can keep a handle to inspect
/// state after handing the backend to the server task.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    store: Arc<RwLock<Store>>,
}

impl MockBackend {
    /// An empty backend with no vendors or emergency services.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A backend seeded with sample vendors and emergency services.
    pub fn seeded() -> Self {
        let store = Store {
            vendors: seed_vendors(),
            emergency: seed_emergency(),
            ..Store::default()
        };
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Build the router, with every endpoint under `/api/`.
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/", get(overview))
            .route("/api/trips/", get(list_trips).post(create_trip))
            .route("/api/trips/:id/", get(get_trip))
            .route("/api/calculate-fuel/", post(calculate_fuel))
            .route("/api/vendors/", get(list_vendors))
            .route("/api/vendors/:id/", get(get_vendor))
            .route("/api/emergency/", get(list_emergency))
            .route("/api/emergency/:id/", get(get_emergency))
            .route("/api/bookings/", get(list_bookings).post(create_booking))
            .layer(middleware::from_fn_with_state(self.clone(), track))
            .with_state(self)
    }

    /// Bind to an ephemeral local port and serve in the background.
    pub async fn spawn(self) -> std::io::Result<SocketAddr> {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        let app = self.router();

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock backend stopped");
            }
        });

        Ok(addr)
    }

    /// Serve on `addr` until the process exits.
    pub async fn serve(self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "mock backend listening");
        axum::serve(listener, self.router()).await
    }

    /// Number of requests served so far.
    pub async fn request_count(&self) -> usize {
        self.store.read().await.requests
    }

    /// `Content-Type` of each request served so far, in order.
    pub async fn content_types(&self) -> Vec<Option<String>> {
        self.store.read().await.content_types.clone()
    }

    /// Make the next request fail with `status`.
    pub async fn fail_next(&self, status: u16) {
        self.store.write().await.fail_next = Some(status);
    }

    /// Rooms left at a vendor, if it exists.
    pub async fn rooms_available(&self, vendor_id: u64) -> Option<i64> {
        let store = self.store.read().await;
        store
            .vendors
            .iter()
            .find(|v| v.id == vendor_id)
            .map(|v| v.rooms_available)
    }
}

/// Count requests and apply any injected failure.
async fn track(State(backend): State<MockBackend>, request: Request, next: Next) -> Response {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let injected = {
        let mut store = backend.store.write().await;
        store.requests += 1;
        store.content_types.push(content_type);
        store.fail_next.take()
    };

    if let Some(status) = injected {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({ "detail": "injected failure" }))).into_response();
    }

    tracing::debug!(method = %request.method(), uri = %request.uri(), "mock request");
    next.run(request).await
}

/// Error responses in the backend's JSON shape.
#[derive(Debug)]
enum MockError {
    BadRequest(String),
    NotFound,
    VendorNotFound,
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        match self {
            MockError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            MockError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
            }
            MockError::VendorNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Vendor not found" })),
            )
                .into_response(),
        }
    }
}

impl From<JsonRejection> for MockError {
    fn from(rejection: JsonRejection) -> Self {
        MockError::BadRequest(rejection.body_text())
    }
}

async fn overview() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to Born 2 Ride API",
        "version": "1.0.0",
        "endpoints": {
            "vendors": "/api/vendors/",
            "vendors_by_type": "/api/vendors/?type=food|hotel|workshop",
            "bookings": "/api/bookings/",
            "emergency_services": "/api/emergency/",
            "trips": "/api/trips/",
            "calculate_fuel": "/api/calculate-fuel/",
        }
    }))
}

async fn list_trips(State(backend): State<MockBackend>) -> Json<Vec<Trip>> {
    let store = backend.store.read().await;
    // Newest first
    Json(store.trips.iter().rev().cloned().collect())
}

async fn create_trip(
    State(backend): State<MockBackend>,
    payload: Result<Json<NewTrip>, JsonRejection>,
) -> Result<(StatusCode, Json<Trip>), MockError> {
    let Json(new) = payload?;
    let estimate = fuel::estimate(new.distance_km, new.vehicle_type, None);

    let mut store = backend.store.write().await;
    let trip = Trip {
        id: Store::next_id(&store.trips),
        origin: new.origin,
        destination: new.destination,
        origin_lat: new.origin_lat,
        origin_lng: new.origin_lng,
        dest_lat: new.dest_lat,
        dest_lng: new.dest_lng,
        distance_km: new.distance_km,
        vehicle_type: new.vehicle_type,
        fuel_cost: estimate.total_fuel_cost,
        fuel_liters: estimate.fuel_liters,
        stops_visited: new.stops_visited,
        created_at: Utc::now(),
    };
    store.trips.push(trip.clone());

    Ok((StatusCode::CREATED, Json(trip)))
}

async fn get_trip(
    State(backend): State<MockBackend>,
    Path(id): Path<u64>,
) -> Result<Json<Trip>, MockError> {
    let store = backend.store.read().await;
    store
        .trips
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .map(Json)
        .ok_or(MockError::NotFound)
}

async fn calculate_fuel(
    payload: Result<Json<FuelRequest>, JsonRejection>,
) -> Result<Json<crate::api::FuelEstimate>, MockError> {
    let Json(req) = payload?;
    if req.distance_km < 0.0 || req.fuel_price < 0.0 {
        return Err(MockError::BadRequest(
            "distance_km and fuel_price must not be negative".to_string(),
        ));
    }

    Ok(Json(fuel::estimate(
        req.distance_km,
        req.vehicle_type,
        Some(req.fuel_price),
    )))
}

#[derive(Debug, Deserialize)]
struct VendorQuery {
    #[serde(rename = "type")]
    vendor_type: Option<String>,
    is_open: Option<String>,
    source: Option<String>,
}

async fn list_vendors(
    State(backend): State<MockBackend>,
    Query(query): Query<VendorQuery>,
) -> Json<Vec<Vendor>> {
    let store = backend.store.read().await;

    let mut vendors: Vec<Vendor> = store
        .vendors
        .iter()
        .filter(|v| {
            query
                .vendor_type
                .as_deref()
                .is_none_or(|t| t.is_empty() || v.vendor_type.as_str() == t)
        })
        .filter(|v| {
            query
                .is_open
                .as_deref()
                .is_none_or(|open| v.is_open == open.eq_ignore_ascii_case("true"))
        })
        .filter(|v| {
            query
                .source
                .as_deref()
                .is_none_or(|s| s.is_empty() || v.source.as_str() == s)
        })
        .cloned()
        .collect();

    vendors.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    Json(vendors)
}

async fn get_vendor(
    State(backend): State<MockBackend>,
    Path(id): Path<u64>,
) -> Result<Json<Vendor>, MockError> {
    let store = backend.store.read().await;
    store
        .vendors
        .iter()
        .find(|v| v.id == id)
        .cloned()
        .map(Json)
        .ok_or(MockError::NotFound)
}

#[derive(Debug, Deserialize)]
struct EmergencyQuery {
    #[serde(rename = "type")]
    service_type: Option<String>,
}

async fn list_emergency(
    State(backend): State<MockBackend>,
    Query(query): Query<EmergencyQuery>,
) -> Json<Vec<EmergencyService>> {
    let store = backend.store.read().await;

    let mut services: Vec<EmergencyService> = store
        .emergency
        .iter()
        .filter(|s| {
            query
                .service_type
                .as_deref()
                .is_none_or(|t| t.is_empty() || s.service_type.as_str() == t)
        })
        .cloned()
        .collect();

    services.sort_by(|a, b| {
        a.service_type
            .as_str()
            .cmp(b.service_type.as_str())
            .then_with(|| a.name.cmp(&b.name))
    });
    Json(services)
}

async fn get_emergency(
    State(backend): State<MockBackend>,
    Path(id): Path<u64>,
) -> Result<Json<EmergencyService>, MockError> {
    let store = backend.store.read().await;
    store
        .emergency
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .map(Json)
        .ok_or(MockError::NotFound)
}

async fn list_bookings(State(backend): State<MockBackend>) -> Json<Vec<Booking>> {
    Json(backend.store.read().await.bookings.clone())
}

async fn create_booking(
    State(backend): State<MockBackend>,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), MockError> {
    let Json(new) = payload?;
    let mut store = backend.store.write().await;

    let vendor = store
        .vendors
        .iter_mut()
        .find(|v| v.id == new.vendor)
        .ok_or(MockError::VendorNotFound)?;

    if vendor.vendor_type == VendorType::Hotel {
        if vendor.rooms_available <= 0 {
            return Err(MockError::BadRequest("No rooms available".to_string()));
        }
        vendor.rooms_available -= 1;
    }
    let vendor_name = vendor.name.clone();

    let booking = Booking {
        id: Store::next_id(&store.bookings),
        vendor: new.vendor,
        vendor_name,
        customer_name: new.customer_name,
        phone: new.phone,
        check_in: new.check_in,
        check_out: new.check_out,
        total_price: new.total_price,
        status: BookingStatus::Pending,
        created_at: Utc::now(),
    };
    store.bookings.push(booking.clone());

    Ok((StatusCode::CREATED, Json(booking)))
}

struct SeedVendor {
    name: &'static str,
    vendor_type: VendorType,
    address: &'static str,
    latitude: f64,
    longitude: f64,
    rating: f64,
    phone: &'static str,
    price_range: &'static str,
    is_open: bool,
    rooms_available: i64,
    base_price: f64,
    source: VendorSource,
}

fn seed_vendors() -> Vec<Vendor> {
    let seeds = [
        SeedVendor {
            name: "Highway Dhaba",
            vendor_type: VendorType::Food,
            address: "NH-44, Km 125, Near Toll Plaza",
            latitude: 13.0827,
            longitude: 80.2707,
            rating: 4.5,
            phone: "+91 98765 43210",
            price_range: "₹₹",
            is_open: true,
            rooms_available: 0,
            base_price: 0.0,
            source: VendorSource::Direct,
        },
        SeedVendor {
            name: "South Indian Tiffin Center",
            vendor_type: VendorType::Food,
            address: "Main Road, Opposite Bus Stand",
            latitude: 13.0750,
            longitude: 80.2650,
            rating: 4.7,
            phone: "+91 98765 43212",
            price_range: "₹",
            is_open: true,
            rooms_available: 0,
            base_price: 0.0,
            source: VendorSource::Direct,
        },
        SeedVendor {
            name: "Highway Rest Inn",
            vendor_type: VendorType::Hotel,
            address: "NH-44, Km 130, Beside Petrol Pump",
            latitude: 13.0850,
            longitude: 80.2750,
            rating: 4.0,
            phone: "+91 98765 43220",
            price_range: "₹₹",
            is_open: true,
            rooms_available: 2,
            base_price: 1200.0,
            source: VendorSource::Mmt,
        },
        SeedVendor {
            name: "Budget Stay",
            vendor_type: VendorType::Hotel,
            address: "Station Road, Near Railway Crossing",
            latitude: 13.0800,
            longitude: 80.2680,
            rating: 3.8,
            phone: "+91 98765 43222",
            price_range: "₹",
            is_open: false,
            rooms_available: 0,
            base_price: 600.0,
            source: VendorSource::Goibibo,
        },
        SeedVendor {
            name: "Quick Puncture Repair",
            vendor_type: VendorType::Workshop,
            address: "NH-44, Km 128",
            latitude: 13.0880,
            longitude: 80.2780,
            rating: 4.6,
            phone: "+91 98765 43230",
            price_range: "₹",
            is_open: true,
            rooms_available: 0,
            base_price: 150.0,
            source: VendorSource::Direct,
        },
    ];

    seeds
        .into_iter()
        .zip(1..)
        .map(|(s, id)| Vendor {
            id,
            name: s.name.to_string(),
            vendor_type: s.vendor_type,
            vendor_type_display: match s.vendor_type {
                VendorType::Food => "Food & Restaurant",
                VendorType::Hotel => "Hotel & Lodge",
                VendorType::Workshop => "Puncture & Workshop",
            }
            .to_string(),
            description: String::new(),
            address: s.address.to_string(),
            latitude: s.latitude,
            longitude: s.longitude,
            rating: s.rating,
            phone: s.phone.to_string(),
            image_url: String::new(),
            is_open: s.is_open,
            price_range: s.price_range.to_string(),
            timing: "9:00 AM - 9:00 PM".to_string(),
            rooms_available: s.rooms_available,
            base_price: s.base_price,
            source: s.source,
            source_display: s.source.label().to_string(),
            availability_status: "Available".to_string(),
        })
        .collect()
}

fn seed_emergency() -> Vec<EmergencyService> {
    let seeds = [
        ("Highway Police Control Room", EmergencyType::Police, "100", 13.0860, 80.2760),
        ("Traffic Police Helpline", EmergencyType::Police, "103", 13.0840, 80.2740),
        ("Government General Hospital", EmergencyType::Hospital, "+91 44 2530 5000", 13.0890, 80.2790),
        ("108 Ambulance Service", EmergencyType::Ambulance, "108", 13.0870, 80.2770),
        ("Fire and Rescue Station", EmergencyType::Fire, "101", 13.0910, 80.2810),
        ("NHAI Highway Helpline", EmergencyType::Roadside, "1033", 13.0830, 80.2720),
    ];

    seeds
        .into_iter()
        .zip(1..)
        .map(|((name, service_type, phone, latitude, longitude), id)| EmergencyService {
            id,
            name: name.to_string(),
            service_type,
            service_type_display: service_type.label().to_string(),
            phone: phone.to_string(),
            address: "NH-44".to_string(),
            latitude,
            longitude,
            is_24x7: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_cover_every_type() {
        let vendors = seed_vendors();
        for t in [VendorType::Food, VendorType::Hotel, VendorType::Workshop] {
            assert!(vendors.iter().any(|v| v.vendor_type == t));
        }

        let emergency = seed_emergency();
        for t in [
            EmergencyType::Police,
            EmergencyType::Hospital,
            EmergencyType::Ambulance,
            EmergencyType::Fire,
            EmergencyType::Roadside,
        ] {
            assert!(emergency.iter().any(|s| s.service_type == t));
        }
    }

    #[test]
    fn seed_ids_are_sequential() {
        let ids: Vec<u64> = seed_vendors().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn source_labels_match_backend_choices() {
        let vendors = seed_vendors();
        let inn = vendors.iter().find(|v| v.name == "Highway Rest Inn").unwrap();
        assert_eq!(inn.source_display, "MakeMyTrip");
        let dhaba = vendors.iter().find(|v| v.name == "Highway Dhaba").unwrap();
        assert_eq!(dhaba.source_display, "Direct");
    }

    #[tokio::test]
    async fn empty_backend_has_no_records() {
        let backend = MockBackend::empty();
        assert_eq!(backend.request_count().await, 0);
        assert_eq!(backend.rooms_available(1).await, None);
        assert!(backend.content_types().await.is_empty());
    }
}
