//! Mandi location resolution: static reference table first, then external
//! geocoding, memoized for the life of the process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::Coordinates;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";
const USER_AGENT: &str = "mandi-scout/0.1.0";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Best-effort free-text forward geocoding.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Coordinates of the first match for the query, if any.
    async fn lookup(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Nominatim-style geocoding client.
pub struct NominatimClient {
    http: Client,
    base_url: Url,
}

impl NominatimClient {
    pub fn new() -> Result<Self, GeocodeError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base: &str) -> Result<Self, GeocodeError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, base_url })
    }
}

// Nominatim returns lat/lon as strings.
#[derive(Debug, Deserialize)]
struct PlaceDto {
    lat: String,
    lon: String,
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn lookup(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let mut url = self.base_url.join("search")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query)
            .append_pair("limit", "1");

        let response = self.http.get(url).send().await?.error_for_status()?;
        let places: Vec<PlaceDto> = response.json().await?;

        Ok(places.first().and_then(|place| {
            let lat = place.lat.parse().ok()?;
            let lng = place.lon.parse().ok()?;
            Some(Coordinates::new(lat, lng))
        }))
    }
}

/// Reference coordinates for well-known mandi towns (lower-case keys).
/// A mandi whose own name is unknown falls back to its state's entry.
fn static_coordinates(name: &str) -> Option<Coordinates> {
    let (lat, lng) = match name {
        "azadpur" => (28.7041, 77.1025),
        "sonipat" => (28.9931, 77.0151),
        "gurgaon" => (28.4595, 77.0266),
        "noida" => (28.5355, 77.3910),
        "faridabad" => (28.4089, 77.3178),
        "ghaziabad" => (28.6692, 77.4538),
        "delhi" => (28.6139, 77.2090),
        _ => return None,
    };
    Some(Coordinates::new(lat, lng))
}

/// Resolves a mandi's display name into coordinates.
///
/// Every success is cached under the composite `"{mandi}-{district}-{state}"`
/// key and never invalidated; entries that would go stale in the real world
/// are accepted as-is.
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    cache: Mutex<HashMap<String, Coordinates>>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            geocoder,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolution order: cache, static mandi entry, static state entry, then
    /// a geocode of `"{district}, {state}, India"`. `None` means the caller
    /// should exclude this mandi, not abort the request.
    pub async fn resolve(&self, mandi: &str, district: &str, state: &str) -> Option<Coordinates> {
        let key = format!("{mandi}-{district}-{state}");
        if let Some(coords) = self.cache.lock().await.get(&key) {
            return Some(*coords);
        }

        if let Some(coords) = static_coordinates(&mandi.to_lowercase())
            .or_else(|| static_coordinates(&state.to_lowercase()))
        {
            self.cache.lock().await.insert(key, coords);
            return Some(coords);
        }

        let query = format!("{district}, {state}, India");
        match self.geocoder.lookup(&query).await {
            Ok(Some(coords)) => {
                debug!(%query, lat = coords.lat, lng = coords.lng, "geocoded mandi");
                self.cache.lock().await.insert(key, coords);
                Some(coords)
            }
            Ok(None) => {
                warn!(%query, "geocoder returned no results");
                None
            }
            Err(error) => {
                warn!(%query, %error, "geocoding failed");
                None
            }
        }
    }
}
