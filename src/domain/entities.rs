use serde::{Deserialize, Serialize};

/// One commodity-at-mandi price observation from the government registry.
///
/// Created in bulk when the catalog loads; the whole set is replaced on
/// reload, individual records are never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub state: String,
    pub district: String,
    pub mandi: String,
    pub commodity: String,
    /// Price of the largest traded batch; treated as the transaction price.
    pub modal_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub arrival_date: String,
}

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Per-km transport rate for a vehicle class, in currency units.
/// Unknown classes are a validation failure, not a default.
pub fn vehicle_rate(vehicle: &str) -> Option<f64> {
    match vehicle {
        "Tractor" => Some(15.0),
        "Tata Ace" => Some(20.0),
        "Truck" => Some(35.0),
        _ => None,
    }
}

/// User input for one ranking request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleQuery {
    pub commodity: String,
    /// Sale volume in quintals.
    pub quantity: f64,
    pub vehicle: String,
    /// Where the trip starts (the farm).
    pub origin: Coordinates,
}

/// Driving route returned by the routing service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub distance_km: f64,
    /// GeoJSON line geometry exactly as the provider returned it.
    pub geometry: serde_json::Value,
}

/// One sale candidate after accurate re-scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedMandi {
    pub mandi: String,
    pub state: String,
    pub district: String,
    /// Driving distance in km, rounded to 2 decimal places.
    pub distance_km: f64,
    /// Net profit in whole currency units.
    pub profit: i64,
    pub revenue: i64,
    pub transport_cost: i64,
    pub handling_cost: i64,
    /// Modal price per unit at this mandi.
    pub price: f64,
    pub coordinates: Coordinates,
    /// Route geometry from the farm to this mandi.
    pub route: serde_json::Value,
}

/// Full response for one ranking request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedResult {
    pub best_mandi: String,
    /// Candidates in descending net-profit order.
    pub results: Vec<RankedMandi>,
    /// Route geometry of the best candidate, surfaced for convenience.
    pub route: serde_json::Value,
    pub origin: Coordinates,
    pub commodity: String,
    pub quantity: f64,
    pub vehicle: String,
    pub total_mandis_processed: usize,
    pub data_source: &'static str,
}
