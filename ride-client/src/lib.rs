//! Born 2 Ride client.
//!
//! Talks to the Born 2 Ride trip planning backend: trips, fuel estimates,
//! roadside vendors, emergency services and bookings. Also keeps the trip
//! being planned as a local draft, formats figures for riders, and turns
//! unhandled failures into toast notifications.

pub mod api;
pub mod cache;
pub mod config;
pub mod draft;
pub mod format;
pub mod fuel;
pub mod mock;
pub mod notify;
pub mod report;
