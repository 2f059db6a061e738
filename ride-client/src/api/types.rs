//! JSON records exchanged with the Born 2 Ride backend.
//!
//! These mirror the backend serializers. Read-only fields the backend
//! derives (display labels, timestamps) are `#[serde(default)]` so that
//! partial payloads still decode.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Default fuel price in INR per litre, used when the caller gives none.
pub const DEFAULT_FUEL_PRICE: f64 = 104.0;

/// Error returned when parsing an unknown type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {value:?}")]
pub struct UnknownKind {
    what: &'static str,
    value: String,
}

/// Implement `FromStr` by matching against each variant's `as_str`.
macro_rules! parse_by_name {
    ($ty:ty, $what:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = UnknownKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| UnknownKind {
                        what: $what,
                        value: s.to_string(),
                    })
            }
        }
    };
}

parse_by_name!(VehicleType, "vehicle type", [VehicleType::Bike, VehicleType::Car]);
parse_by_name!(
    VendorType,
    "vendor type",
    [VendorType::Food, VendorType::Hotel, VendorType::Workshop]
);
parse_by_name!(
    EmergencyType,
    "emergency type",
    [
        EmergencyType::Police,
        EmergencyType::Hospital,
        EmergencyType::Ambulance,
        EmergencyType::Fire,
        EmergencyType::Roadside,
    ]
);
parse_by_name!(
    VendorSource,
    "vendor source",
    [
        VendorSource::Direct,
        VendorSource::Goibibo,
        VendorSource::Mmt,
        VendorSource::Yatra,
        VendorSource::Booking,
    ]
);

/// Vehicle a trip is made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Bike,
    Car,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Bike => "bike",
            VehicleType::Car => "car",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of roadside vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorType {
    Food,
    Hotel,
    Workshop,
}

impl VendorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorType::Food => "food",
            VendorType::Hotel => "hotel",
            VendorType::Workshop => "workshop",
        }
    }
}

impl fmt::Display for VendorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of emergency service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyType {
    Police,
    Hospital,
    Ambulance,
    Fire,
    Roadside,
}

impl EmergencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyType::Police => "police",
            EmergencyType::Hospital => "hospital",
            EmergencyType::Ambulance => "ambulance",
            EmergencyType::Fire => "fire",
            EmergencyType::Roadside => "roadside",
        }
    }

    /// Human-readable label, as the backend displays it.
    pub fn label(&self) -> &'static str {
        match self {
            EmergencyType::Police => "Police Station",
            EmergencyType::Hospital => "Hospital",
            EmergencyType::Ambulance => "Ambulance Service",
            EmergencyType::Fire => "Fire Station",
            EmergencyType::Roadside => "Roadside Assistance",
        }
    }
}

impl fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a vendor listing came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorSource {
    #[default]
    Direct,
    Goibibo,
    Mmt,
    Yatra,
    Booking,
}

impl VendorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorSource::Direct => "direct",
            VendorSource::Goibibo => "goibibo",
            VendorSource::Mmt => "mmt",
            VendorSource::Yatra => "yatra",
            VendorSource::Booking => "booking",
        }
    }

    /// Name of the listing site as the backend displays it.
    pub fn label(&self) -> &'static str {
        match self {
            VendorSource::Direct => "Direct",
            VendorSource::Goibibo => "Goibibo",
            VendorSource::Mmt => "MakeMyTrip",
            VendorSource::Yatra => "Yatra",
            VendorSource::Booking => "Booking.com",
        }
    }
}

impl fmt::Display for VendorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// A saved trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: u64,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub origin_lat: f64,
    #[serde(default)]
    pub origin_lng: f64,
    #[serde(default)]
    pub dest_lat: f64,
    #[serde(default)]
    pub dest_lng: f64,
    pub distance_km: f64,
    pub vehicle_type: VehicleType,
    pub fuel_cost: f64,
    #[serde(default)]
    pub fuel_liters: f64,
    #[serde(default)]
    pub stops_visited: Vec<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a trip. Fuel figures are computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrip {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub origin_lat: f64,
    #[serde(default)]
    pub origin_lng: f64,
    #[serde(default)]
    pub dest_lat: f64,
    #[serde(default)]
    pub dest_lng: f64,
    pub distance_km: f64,
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub stops_visited: Vec<Map<String, Value>>,
}

impl NewTrip {
    /// A trip with no coordinates or stops.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        distance_km: f64,
        vehicle_type: VehicleType,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            origin_lat: 0.0,
            origin_lng: 0.0,
            dest_lat: 0.0,
            dest_lng: 0.0,
            distance_km,
            vehicle_type,
            stops_visited: Vec::new(),
        }
    }

    pub fn with_origin_coords(mut self, lat: f64, lng: f64) -> Self {
        self.origin_lat = lat;
        self.origin_lng = lng;
        self
    }

    pub fn with_dest_coords(mut self, lat: f64, lng: f64) -> Self {
        self.dest_lat = lat;
        self.dest_lng = lng;
        self
    }

    pub fn with_stops(mut self, stops: Vec<Map<String, Value>>) -> Self {
        self.stops_visited = stops;
        self
    }
}

/// Body of a fuel calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelRequest {
    pub distance_km: f64,
    pub vehicle_type: VehicleType,
    #[serde(default = "default_fuel_price")]
    pub fuel_price: f64,
}

fn default_fuel_price() -> f64 {
    DEFAULT_FUEL_PRICE
}

/// Fuel cost estimate for a distance and vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelEstimate {
    pub distance_km: f64,
    pub vehicle_type: VehicleType,
    pub mileage_kmpl: f64,
    pub fuel_liters: f64,
    pub fuel_price_per_liter: f64,
    pub total_fuel_cost: f64,
}

/// A food stop, hotel or workshop along the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: u64,
    pub name: String,
    pub vendor_type: VendorType,
    #[serde(default)]
    pub vendor_type_display: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
    pub phone: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "default_true")]
    pub is_open: bool,
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub timing: String,
    #[serde(default)]
    pub rooms_available: i64,
    #[serde(default, deserialize_with = "decimal")]
    pub base_price: f64,
    #[serde(default)]
    pub source: VendorSource,
    #[serde(default)]
    pub source_display: String,
    #[serde(default)]
    pub availability_status: String,
}

fn default_true() -> bool {
    true
}

/// Police, hospital, ambulance, fire or roadside help.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyService {
    pub id: u64,
    pub name: String,
    pub service_type: EmergencyType,
    #[serde(default)]
    pub service_type_display: String,
    pub phone: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_true")]
    pub is_24x7: bool,
}

/// A hotel or workshop booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: u64,
    pub vendor: u64,
    #[serde(default)]
    pub vendor_name: String,
    pub customer_name: String,
    pub phone: String,
    #[serde(default)]
    pub check_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check_out: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "decimal")]
    pub total_price: f64,
    #[serde(default)]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub vendor: u64,
    pub customer_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "decimal")]
    pub total_price: f64,
}

/// Response of the API root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiOverview {
    pub message: String,
    pub version: String,
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

/// Accept a decimal encoded either as a JSON number or as a string.
///
/// The backend serializes `DecimalField`s as strings (`"1500.00"`).
fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid decimal: {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_decodes_string_decimal() {
        let json = r#"{
            "id": 4,
            "name": "Highway Rest Inn",
            "vendor_type": "hotel",
            "vendor_type_display": "Hotel & Lodge",
            "address": "NH-44, Km 130",
            "latitude": 13.085,
            "longitude": 80.275,
            "rating": 4.0,
            "phone": "+91 98765 43220",
            "base_price": "1500.00",
            "rooms_available": 3,
            "source": "mmt"
        }"#;

        let vendor: Vendor = serde_json::from_str(json).unwrap();
        assert_eq!(vendor.vendor_type, VendorType::Hotel);
        assert_eq!(vendor.base_price, 1500.0);
        assert_eq!(vendor.source, VendorSource::Mmt);
        assert!(vendor.is_open);
    }

    #[test]
    fn vendor_decodes_numeric_decimal() {
        let json = r#"{
            "id": 1, "name": "Dhaba", "vendor_type": "food", "address": "NH-44",
            "latitude": 0, "longitude": 0, "rating": 4.5, "phone": "1",
            "base_price": 250
        }"#;
        let vendor: Vendor = serde_json::from_str(json).unwrap();
        assert_eq!(vendor.base_price, 250.0);
        assert_eq!(vendor.source, VendorSource::Direct);
    }

    #[test]
    fn bad_decimal_is_rejected() {
        let json = r#"{
            "id": 1, "vendor": 2, "customer_name": "A", "phone": "1",
            "total_price": "lots", "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let err = serde_json::from_str::<Booking>(json).unwrap_err();
        assert!(err.to_string().contains("invalid decimal"));
    }

    #[test]
    fn trip_decodes_backend_timestamp() {
        let json = r#"{
            "id": 7,
            "origin": "Chennai",
            "destination": "Bengaluru",
            "distance_km": 346.0,
            "vehicle_type": "bike",
            "fuel_cost": 799.64,
            "fuel_liters": 7.69,
            "stops_visited": [{"name": "Highway Dhaba"}],
            "created_at": "2025-02-10T08:15:30.123456Z"
        }"#;

        let trip: Trip = serde_json::from_str(json).unwrap();
        assert_eq!(trip.vehicle_type, VehicleType::Bike);
        assert_eq!(trip.stops_visited.len(), 1);
        assert_eq!(trip.stops_visited[0]["name"], "Highway Dhaba");
        assert_eq!(trip.origin_lat, 0.0);
    }

    #[test]
    fn new_trip_serializes_defaults() {
        let trip = NewTrip::new("Chennai", "Vellore", 140.0, VehicleType::Car)
            .with_origin_coords(13.08, 80.27);
        let body = serde_json::to_value(&trip).unwrap();

        assert_eq!(body["vehicle_type"], "car");
        assert_eq!(body["origin_lat"], 13.08);
        assert_eq!(body["dest_lat"], 0.0);
        assert_eq!(body["stops_visited"], serde_json::json!([]));
    }

    #[test]
    fn new_booking_omits_missing_dates() {
        let booking = NewBooking {
            vendor: 3,
            customer_name: "Asha".into(),
            phone: "+91 90000 00000".into(),
            check_in: None,
            check_out: None,
            total_price: 1200.0,
        };
        let body = serde_json::to_value(&booking).unwrap();
        assert!(body.get("check_in").is_none());
        assert_eq!(body["total_price"], 1200.0);
    }

    #[test]
    fn parse_type_names() {
        assert_eq!("bike".parse::<VehicleType>(), Ok(VehicleType::Bike));
        assert_eq!(" Hotel ".parse::<VendorType>(), Ok(VendorType::Hotel));
        assert_eq!("fire".parse::<EmergencyType>(), Ok(EmergencyType::Fire));
        assert_eq!("MMT".parse::<VendorSource>(), Ok(VendorSource::Mmt));

        let err = "truck".parse::<VehicleType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown vehicle type: \"truck\"");
    }

    #[test]
    fn source_labels() {
        assert_eq!(VendorSource::Mmt.label(), "MakeMyTrip");
        assert_eq!(VendorSource::Booking.label(), "Booking.com");
        assert_eq!(VendorSource::default().label(), "Direct");
    }

    #[test]
    fn enum_labels() {
        assert_eq!(VendorType::Workshop.to_string(), "workshop");
        assert_eq!(EmergencyType::Roadside.as_str(), "roadside");
        assert_eq!(EmergencyType::Ambulance.label(), "Ambulance Service");
        assert_eq!(VehicleType::Bike.to_string(), "bike");
        assert_eq!(VendorSource::Booking.to_string(), "booking");
    }
}
