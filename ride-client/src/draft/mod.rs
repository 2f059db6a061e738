//! Local trip draft.
//!
//! The trip being planned is kept as a free-form JSON object under a single
//! fixed key, so it survives between runs before it is submitted with
//! `RideClient::create_trip`. There is no schema: whatever was last written
//! is what is read back.

mod error;
mod store;

pub use error::DraftError;
pub use store::{LocalStore, StoreConfig};

use serde_json::{Map, Value};

/// A trip draft: arbitrary fields such as distance, stops or fuel cost.
pub type Draft = Map<String, Value>;

/// Key the draft is stored under.
pub const TRIP_KEY: &str = "born2ride_trip";

/// Field holding the list of stops.
pub const STOPS_FIELD: &str = "stops";

/// Trip draft persisted in a [`LocalStore`].
#[derive(Debug, Clone)]
pub struct TripStorage {
    store: LocalStore,
}

impl TripStorage {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Save the draft, replacing whatever was there.
    pub fn save(&self, draft: &Draft) -> Result<(), DraftError> {
        let text = serde_json::to_string(draft).map_err(|e| corrupt(e.to_string()))?;
        self.store.set_item(TRIP_KEY, text)
    }

    /// Get the current draft, if one is stored.
    ///
    /// A stored JSON `null` reads as no draft.
    pub fn get(&self) -> Result<Option<Draft>, DraftError> {
        let Some(text) = self.store.get_item(TRIP_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str(&text).map_err(|e| corrupt(e.to_string()))? {
            Value::Null => Ok(None),
            Value::Object(draft) => Ok(Some(draft)),
            other => Err(corrupt(format!("expected an object, found {other}"))),
        }
    }

    /// Clear the draft.
    pub fn clear(&self) -> Result<(), DraftError> {
        self.store.remove_item(TRIP_KEY)
    }

    /// Merge `updates` over the current draft and save the result.
    ///
    /// The merge is shallow: each top-level field in `updates` replaces the
    /// draft's field of the same name. Returns the merged draft.
    pub fn update(&self, updates: Draft) -> Result<Draft, DraftError> {
        let mut draft = self.get()?.unwrap_or_default();
        draft.extend(updates);
        self.save(&draft)?;
        Ok(draft)
    }

    /// Append a stop to the draft's `stops` list.
    ///
    /// Starts a new draft and/or a new list when either is missing.
    pub fn add_stop(&self, stop: Value) -> Result<(), DraftError> {
        let mut draft = self.get()?.unwrap_or_default();

        let stops = draft
            .entry(STOPS_FIELD)
            .or_insert_with(|| Value::Array(Vec::new()));
        if stops.is_null() {
            *stops = Value::Array(Vec::new());
        }
        let Value::Array(list) = stops else {
            return Err(DraftError::StopsNotList);
        };
        list.push(stop);

        tracing::debug!(stops = list.len(), "stop added to trip draft");
        self.save(&draft)
    }
}

fn corrupt(message: String) -> DraftError {
    DraftError::Corrupt {
        location: format!("key {TRIP_KEY}"),
        message,
    }
}
