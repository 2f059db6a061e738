//! Client tests against the in-memory backend.

use super::*;
use crate::mock::MockBackend;

async fn start(backend: &MockBackend) -> RideClient {
    let addr = backend.clone().spawn().await.unwrap();
    let config = ApiConfig::default().with_base_url(format!("http://{addr}/api"));
    RideClient::new(config).unwrap()
}

async fn seeded() -> (MockBackend, RideClient) {
    let backend = MockBackend::seeded();
    let client = start(&backend).await;
    (backend, client)
}

#[tokio::test]
async fn overview_lists_endpoints() {
    let (_, client) = seeded().await;

    let overview = client.overview().await.unwrap();
    assert_eq!(overview.version, "1.0.0");
    assert_eq!(overview.endpoints["trips"], "/api/trips/");
}

#[tokio::test]
async fn create_then_fetch_trip() {
    let (_, client) = seeded().await;

    let new = NewTrip::new("Chennai", "Vellore", 135.0, VehicleType::Bike)
        .with_origin_coords(13.0827, 80.2707)
        .with_dest_coords(12.9165, 79.1325);
    let created = client.create_trip(&new).await.unwrap();

    assert_eq!(created.id, 1);
    assert_eq!(created.fuel_liters, 3.0);
    assert_eq!(created.fuel_cost, 312.0);
    assert_eq!(created.dest_lat, 12.9165);

    let fetched = client.trip(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn trips_are_listed_newest_first() {
    let (_, client) = seeded().await;

    client
        .create_trip(&NewTrip::new("A", "B", 10.0, VehicleType::Car))
        .await
        .unwrap();
    client
        .create_trip(&NewTrip::new("B", "C", 20.0, VehicleType::Car))
        .await
        .unwrap();

    let trips = client.trips().await.unwrap();
    let origins: Vec<&str> = trips.iter().map(|t| t.origin.as_str()).collect();
    assert_eq!(origins, vec!["B", "A"]);
}

#[tokio::test]
async fn trip_distance_has_no_minimum() {
    let (_, client) = seeded().await;

    let trip = client
        .create_trip(&NewTrip::new("A", "B", -10.0, VehicleType::Car))
        .await
        .unwrap();
    assert_eq!(trip.distance_km, -10.0);
}

#[tokio::test]
async fn every_request_sends_json_content_type() {
    let (backend, client) = seeded().await;

    client.trips().await.unwrap();
    client
        .calculate_fuel(45.0, VehicleType::Bike, None)
        .await
        .unwrap();

    let json = Some("application/json".to_string());
    assert_eq!(backend.content_types().await, vec![json.clone(), json]);
}

#[tokio::test]
async fn missing_trip_surfaces_status() {
    let (_, client) = seeded().await;

    let err = client.trip(42).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
    assert_eq!(err.to_string(), "HTTP error! status: 404");
}

#[tokio::test]
async fn calculate_fuel_uses_default_price() {
    let (_, client) = seeded().await;

    let est = client
        .calculate_fuel(150.0, VehicleType::Car, None)
        .await
        .unwrap();
    assert_eq!(est.fuel_price_per_liter, DEFAULT_FUEL_PRICE);
    assert_eq!(est.mileage_kmpl, 15.0);
    assert_eq!(est.fuel_liters, 10.0);
    assert_eq!(est.total_fuel_cost, 1040.0);

    let est = client
        .calculate_fuel(90.0, VehicleType::Bike, Some(110.0))
        .await
        .unwrap();
    assert_eq!(est.total_fuel_cost, 220.0);
}

#[tokio::test]
async fn negative_distance_is_rejected() {
    let (_, client) = seeded().await;

    let err = client
        .calculate_fuel(-5.0, VehicleType::Bike, None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn vendors_filter_by_type() {
    let (_, client) = seeded().await;

    let all = client.vendors(None).await.unwrap();
    assert_eq!(all.len(), 5);
    // Highest rated first
    assert_eq!(all[0].name, "South Indian Tiffin Center");

    let food = client.food_vendors().await.unwrap();
    assert!(!food.is_empty());
    assert!(food.iter().all(|v| v.vendor_type == VendorType::Food));

    let hotels = client.hotels().await.unwrap();
    assert!(hotels.iter().all(|v| v.vendor_type == VendorType::Hotel));

    let workshops = client.workshops().await.unwrap();
    assert_eq!(workshops.len(), 1);
}

#[tokio::test]
async fn search_vendors_combines_filters() {
    let (_, client) = seeded().await;

    let filter = VendorFilter {
        vendor_type: Some(VendorType::Hotel),
        is_open: Some(true),
        source: None,
    };
    let open_hotels = client.search_vendors(&filter).await.unwrap();
    assert_eq!(open_hotels.len(), 1);
    assert_eq!(open_hotels[0].name, "Highway Rest Inn");

    let filter = VendorFilter {
        source: Some(VendorSource::Goibibo),
        ..VendorFilter::default()
    };
    let goibibo = client.search_vendors(&filter).await.unwrap();
    assert_eq!(goibibo.len(), 1);
    assert!(!goibibo[0].is_open);

    let vendor = client.vendor(goibibo[0].id).await.unwrap();
    assert_eq!(vendor, goibibo[0]);
}

#[tokio::test]
async fn emergency_services_filter_by_type() {
    let (_, client) = seeded().await;

    let all = client.emergency_services(None).await.unwrap();
    assert_eq!(all.len(), 6);

    let police = client.police_stations().await.unwrap();
    assert_eq!(police.len(), 2);
    assert!(police.iter().all(|s| s.service_type == EmergencyType::Police));

    assert_eq!(client.hospitals().await.unwrap().len(), 1);
    assert_eq!(client.ambulances().await.unwrap().len(), 1);
    assert_eq!(client.fire_stations().await.unwrap().len(), 1);
    assert_eq!(client.roadside_assistance().await.unwrap()[0].phone, "1033");

    let first = client.emergency_service(police[0].id).await.unwrap();
    assert_eq!(first, police[0]);
}

#[tokio::test]
async fn booking_a_hotel_takes_a_room() {
    let (backend, client) = seeded().await;
    let hotel = client
        .hotels()
        .await
        .unwrap()
        .into_iter()
        .find(|v| v.rooms_available > 0)
        .unwrap();
    let rooms_before = hotel.rooms_available;

    let booking = client
        .create_booking(&NewBooking {
            vendor: hotel.id,
            customer_name: "Asha".to_string(),
            phone: "+91 90000 00000".to_string(),
            check_in: None,
            check_out: None,
            total_price: hotel.base_price,
        })
        .await
        .unwrap();

    assert_eq!(booking.vendor_name, hotel.name);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(
        backend.rooms_available(hotel.id).await,
        Some(rooms_before - 1)
    );
    assert_eq!(client.bookings().await.unwrap(), vec![booking]);
}

#[tokio::test]
async fn booking_full_hotel_fails() {
    let (_, client) = seeded().await;
    let full = client
        .hotels()
        .await
        .unwrap()
        .into_iter()
        .find(|v| v.rooms_available == 0)
        .unwrap();

    let err = client
        .create_booking(&NewBooking {
            vendor: full.id,
            customer_name: "Ravi".to_string(),
            phone: "1".to_string(),
            check_in: None,
            check_out: None,
            total_price: 500.0,
        })
        .await
        .unwrap_err();

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("No rooms available"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn booking_unknown_vendor_is_not_found() {
    let (_, client) = seeded().await;

    let err = client
        .create_booking(&NewBooking {
            vendor: 999,
            customer_name: "Ravi".to_string(),
            phone: "1".to_string(),
            check_in: None,
            check_out: None,
            total_price: 500.0,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn server_errors_are_returned_unchanged() {
    let (backend, client) = seeded().await;

    backend.fail_next(500).await;
    let err = client.trips().await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    // No retry happened
    assert_eq!(backend.request_count().await, 1);
}

#[tokio::test]
async fn raw_get_decodes_any_json() {
    let (_, client) = seeded().await;

    let value: serde_json::Value = client.get("/vendors/?type=workshop").await.unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(1));

    let value: serde_json::Value = client
        .post(
            "/calculate-fuel/",
            &serde_json::json!({ "distance_km": 45, "vehicle_type": "bike" }),
        )
        .await
        .unwrap();
    assert_eq!(value["fuel_price_per_liter"], 104.0);
}

#[tokio::test]
async fn wrong_shape_is_a_json_error() {
    let (_, client) = seeded().await;

    // The overview is an object, not a list of trips
    let err = client.get::<Vec<Trip>>("/").await.unwrap_err();
    assert!(matches!(err, ApiError::Json { .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ApiConfig::default()
        .with_base_url(format!("http://{addr}/api"))
        .with_timeout(2);
    let client = RideClient::new(config).unwrap();

    let err = client.trips().await.unwrap_err();
    assert!(err.is_connection());
}
