//! Fuel cost estimation.
//!
//! The same formula the backend applies when it saves a trip, so estimates
//! can be shown without a round-trip.

use crate::api::{DEFAULT_FUEL_PRICE, FuelEstimate, VehicleType};

/// Average bike mileage (km per litre).
pub const BIKE_MILEAGE_KMPL: f64 = 45.0;

/// Average car mileage (km per litre).
pub const CAR_MILEAGE_KMPL: f64 = 15.0;

/// Mileage for a vehicle type.
pub fn mileage(vehicle_type: VehicleType) -> f64 {
    match vehicle_type {
        VehicleType::Bike => BIKE_MILEAGE_KMPL,
        VehicleType::Car => CAR_MILEAGE_KMPL,
    }
}

/// Estimate fuel needed and its cost.
///
/// Litres and total cost are rounded to two decimal places.
/// `fuel_price` defaults to [`DEFAULT_FUEL_PRICE`] INR per litre.
pub fn estimate(
    distance_km: f64,
    vehicle_type: VehicleType,
    fuel_price: Option<f64>,
) -> FuelEstimate {
    let fuel_price = fuel_price.unwrap_or(DEFAULT_FUEL_PRICE);
    let mileage_kmpl = mileage(vehicle_type);
    let liters = distance_km / mileage_kmpl;

    FuelEstimate {
        distance_km,
        vehicle_type,
        mileage_kmpl,
        fuel_liters: round2(liters),
        fuel_price_per_liter: fuel_price,
        total_fuel_cost: round2(liters * fuel_price),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
