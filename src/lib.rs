//! mandi-scout — ranks agricultural markets (mandis) by net sale profit.
//!
//! The pipeline is a two-phase funnel: a cheap haversine estimate over every
//! price-matching mandi picks a small shortlist, which is then re-scored with
//! real driving distances from the OSRM routing service. Every external
//! dependency (price registry, geocoder, router) is memoized in-process and
//! degrades gracefully when it fails.

pub mod domain;
pub mod engine;
pub mod infra;

pub use domain::{
    haversine_km, vehicle_rate, Coordinates, PriceCatalog, PriceRecord, RankedMandi, RankedResult,
    RouteResult, SaleQuery,
};
pub use engine::{ProfitRankingEngine, RankingError, HANDLING_COST, SHORTLIST_LIMIT};
pub use infra::{
    load_catalog, GeocodeError, Geocoder, LocationResolver, NominatimClient, OsrmClient,
    RegistryClient, RegistryError, RouteError, RouteProvider, RouteSource,
};
