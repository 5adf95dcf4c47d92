#![allow(dead_code)]

//! Shared harness for the ranking pipeline tests: scripted providers that
//! never touch the network, plus catalog and engine builders.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use mandi_scout::{
    Coordinates, GeocodeError, Geocoder, LocationResolver, PriceCatalog, PriceRecord,
    ProfitRankingEngine, RouteError, RouteProvider, RouteResult, RouteSource,
};

/// Geocoder that never matches; tests that stay on the static table use it.
pub struct NoGeocoder;

#[async_trait]
impl Geocoder for NoGeocoder {
    async fn lookup(&self, _query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(None)
    }
}

/// Route source with scripted per-destination distances. Destinations without
/// a script entry fail with `NoRoute`.
pub struct ScriptedRouter {
    distances: HashMap<String, f64>,
    calls: AtomicUsize,
}

impl ScriptedRouter {
    pub fn new() -> Self {
        Self {
            distances: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_distance(mut self, destination: Coordinates, km: f64) -> Self {
        self.distances.insert(dest_key(destination), km);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn dest_key(destination: Coordinates) -> String {
    format!("{:.4},{:.4}", destination.lat, destination.lng)
}

#[async_trait]
impl RouteSource for ScriptedRouter {
    async fn driving_route(
        &self,
        _origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteResult, RouteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.distances.get(&dest_key(destination)) {
            Some(&km) => Ok(RouteResult {
                distance_km: km,
                geometry: line_geometry(),
            }),
            None => Err(RouteError::NoRoute),
        }
    }
}

/// Route source that always fails, as a router outage would.
pub struct DeadRouter;

#[async_trait]
impl RouteSource for DeadRouter {
    async fn driving_route(
        &self,
        _origin: Coordinates,
        _destination: Coordinates,
    ) -> Result<RouteResult, RouteError> {
        Err(RouteError::NoRoute)
    }
}

pub fn line_geometry() -> serde_json::Value {
    json!({"type": "LineString", "coordinates": []})
}

pub fn price_record(mandi: &str, state: &str, commodity: &str, modal_price: f64) -> PriceRecord {
    PriceRecord {
        state: state.into(),
        district: state.into(),
        mandi: mandi.into(),
        commodity: commodity.into(),
        modal_price,
        min_price: (modal_price - 200.0).max(0.0),
        max_price: modal_price + 200.0,
        arrival_date: "01/08/2026".into(),
    }
}

pub async fn engine_with(
    records: Vec<PriceRecord>,
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn RouteSource>,
) -> ProfitRankingEngine {
    let catalog = Arc::new(PriceCatalog::new());
    catalog.replace(records).await;
    ProfitRankingEngine::new(
        catalog,
        Arc::new(LocationResolver::new(geocoder)),
        Arc::new(RouteProvider::new(router)),
    )
}
