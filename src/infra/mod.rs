//! Clients for the external services the ranking pipeline depends on.

pub mod geocode;
pub mod registry;
pub mod route;

pub use geocode::{GeocodeError, Geocoder, LocationResolver, NominatimClient};
pub use registry::{load_catalog, RegistryClient, RegistryError};
pub use route::{OsrmClient, RouteError, RouteProvider, RouteSource};
