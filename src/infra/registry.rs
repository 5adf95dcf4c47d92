//! Client for the government agricultural price registry.
//!
//! One bulk page of records is fetched at startup and normalized into
//! [`PriceRecord`]s. The registry is a black box that may fail outright
//! (network, auth, quota); the loader degrades to an empty catalog instead of
//! crashing, and the engine reports that lazily as not-ready.

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{PriceCatalog, PriceRecord};

// Daily mandi price dataset on data.gov.in.
const DEFAULT_BASE_URL: &str =
    "https://api.data.gov.in/resource/9ef84268-d588-465a-a308-a864a43d0070";
const PAGE_LIMIT: u32 = 500;
const USER_AGENT: &str = "mandi-scout/0.1.0";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct RegistryClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl RegistryClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, RegistryError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base: &str, api_key: impl Into<String>) -> Result<Self, RegistryError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Fetch one bulk page of price records, in registry order.
    pub async fn fetch_records(&self) -> Result<Vec<PriceRecord>, RegistryError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("api-key", &self.api_key)
            .append_pair("offset", "0")
            .append_pair("limit", &PAGE_LIMIT.to_string())
            .append_pair("format", "json");

        let response = self.http.get(url).send().await?.error_for_status()?;
        let envelope: RegistryEnvelope = response.json().await?;
        Ok(envelope
            .records
            .into_iter()
            .map(PriceRecord::from)
            .collect())
    }
}

/// Load the catalog once at startup. A registry failure leaves it empty.
pub async fn load_catalog(catalog: &PriceCatalog, client: &RegistryClient) {
    match client.fetch_records().await {
        Ok(records) => {
            info!(count = records.len(), "mandi price data loaded");
            catalog.replace(records).await;
        }
        Err(error) => {
            warn!(%error, "failed to load mandi price data; catalog stays empty");
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegistryEnvelope {
    #[serde(default)]
    records: Vec<PriceRecordDto>,
}

#[derive(Debug, Deserialize)]
struct PriceRecordDto {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    district: Option<String>,
    #[serde(default)]
    market: Option<String>,
    #[serde(default)]
    commodity: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    modal_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    min_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    max_price: f64,
    #[serde(default)]
    arrival_date: Option<String>,
}

impl From<PriceRecordDto> for PriceRecord {
    fn from(dto: PriceRecordDto) -> Self {
        Self {
            state: dto.state.unwrap_or_default(),
            district: dto.district.unwrap_or_default(),
            mandi: dto.market.unwrap_or_default(),
            commodity: dto.commodity.unwrap_or_default(),
            modal_price: dto.modal_price,
            min_price: dto.min_price,
            max_price: dto.max_price,
            arrival_date: dto.arrival_date.unwrap_or_default(),
        }
    }
}

/// The registry serves numeric fields inconsistently as numbers, strings, or
/// null; anything unusable normalizes to 0.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct NumberOrString;

    impl<'de> serde::de::Visitor<'de> for NumberOrString {
        type Value = f64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number, a numeric string, or null")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.trim().parse().unwrap_or(0.0))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0.0)
        }

    }

    deserializer.deserialize_any(NumberOrString)
}
