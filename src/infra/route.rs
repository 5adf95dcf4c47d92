//! Accurate driving distances from an OSRM-style routing service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{Coordinates, RouteResult};

const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org/";
const USER_AGENT: &str = "mandi-scout/0.1.0";

/// Per-call budget; a slow router drops one candidate, not the request.
const ROUTE_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no route found")]
    NoRoute,
}

/// Source of best driving routes between two points.
#[async_trait]
pub trait RouteSource: Send + Sync {
    async fn driving_route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteResult, RouteError>;
}

pub struct OsrmClient {
    http: Client,
    base_url: Url,
}

impl OsrmClient {
    pub fn new() -> Result<Self, RouteError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base: &str) -> Result<Self, RouteError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, base_url })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    geometry: serde_json::Value,
}

#[async_trait]
impl RouteSource for OsrmClient {
    async fn driving_route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteResult, RouteError> {
        // OSRM wants lng,lat pairs.
        let path = format!(
            "route/v1/driving/{},{};{},{}",
            origin.lng, origin.lat, destination.lng, destination.lat
        );
        let mut url = self.base_url.join(&path)?;
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson");

        let response = self
            .http
            .get(url)
            .timeout(ROUTE_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let body: OsrmResponse = response.json().await?;

        let route = body.routes.into_iter().next().ok_or(RouteError::NoRoute)?;
        Ok(RouteResult {
            distance_km: route.distance / 1000.0,
            geometry: route.geometry,
        })
    }
}

/// Canonical origin-then-destination cache key; lookup and store must agree
/// on the order or every call misses.
fn route_key(origin: Coordinates, destination: Coordinates) -> String {
    format!(
        "{},{}_{},{}",
        origin.lat, origin.lng, destination.lat, destination.lng
    )
}

/// Memoizing front for a [`RouteSource`].
///
/// Failures are neither cached nor retried; the caller drops the affected
/// candidate and the next request gets a fresh attempt.
pub struct RouteProvider {
    source: Arc<dyn RouteSource>,
    cache: Mutex<HashMap<String, RouteResult>>,
}

impl RouteProvider {
    pub fn new(source: Arc<dyn RouteSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn fetch(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteResult, RouteError> {
        let key = route_key(origin, destination);
        if let Some(route) = self.cache.lock().await.get(&key) {
            return Ok(route.clone());
        }

        let route = self.source.driving_route(origin, destination).await?;
        self.cache.lock().await.insert(key, route.clone());
        Ok(route)
    }
}
