//! Born 2 Ride backend client.
//!
//! Wraps the REST surface of the Born 2 Ride backend:
//! - `/trips/` and `/trips/{id}/` for saved trips
//! - `/calculate-fuel/` for fuel cost estimates
//! - `/vendors/` and `/emergency/`, both filterable with `?type=`
//! - `/bookings/` for hotel and workshop bookings
//!
//! All bodies are JSON. Any non-2xx response is an error.

mod client;
mod error;
mod types;

#[cfg(test)]
mod client_tests;

pub use client::{
    ApiConfig, DEFAULT_HOST, DEFAULT_PORT, RideClient, VendorFilter, emergency_endpoint,
    vendors_endpoint,
};
pub use error::ApiError;
pub use types::{
    ApiOverview, Booking, BookingStatus, DEFAULT_FUEL_PRICE, EmergencyService, EmergencyType,
    FuelEstimate, FuelRequest, NewBooking, NewTrip, Trip, UnknownKind, VehicleType, Vendor,
    VendorSource, VendorType,
};
