//! Domain logic for mandi profit ranking lives here.

pub mod catalog;
pub mod entities;
pub mod geo;

pub use catalog::PriceCatalog;
pub use entities::{
    vehicle_rate, Coordinates, PriceRecord, RankedMandi, RankedResult, RouteResult, SaleQuery,
};
pub use geo::haversine_km;
