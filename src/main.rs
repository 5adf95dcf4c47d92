use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mandi_scout::{
    load_catalog, Coordinates, LocationResolver, NominatimClient, OsrmClient, PriceCatalog,
    ProfitRankingEngine, RegistryClient, RouteProvider, SaleQuery,
};

/// Rank mandis by net sale profit for one commodity lot.
#[derive(Debug, Parser)]
#[command(name = "mandi-scout", version)]
struct Cli {
    /// Commodity to sell, e.g. "Onion".
    #[arg(long)]
    commodity: String,

    /// Sale volume in quintals.
    #[arg(long)]
    quantity: f64,

    /// Vehicle class: Tractor, Tata Ace or Truck.
    #[arg(long, default_value = "Tractor")]
    vehicle: String,

    /// Farm latitude in decimal degrees.
    #[arg(long)]
    lat: f64,

    /// Farm longitude in decimal degrees.
    #[arg(long)]
    lng: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let api_key = std::env::var("MANDI_REGISTRY_API_KEY")
        .context("MANDI_REGISTRY_API_KEY must be set (see .env)")?;
    let registry = match std::env::var("MANDI_REGISTRY_URL") {
        Ok(base) => RegistryClient::with_base_url(&base, api_key)?,
        Err(_) => RegistryClient::new(api_key)?,
    };
    let geocoder = match std::env::var("NOMINATIM_BASE_URL") {
        Ok(base) => NominatimClient::with_base_url(&base)?,
        Err(_) => NominatimClient::new()?,
    };
    let router = match std::env::var("OSRM_BASE_URL") {
        Ok(base) => OsrmClient::with_base_url(&base)?,
        Err(_) => OsrmClient::new()?,
    };

    let catalog = Arc::new(PriceCatalog::new());
    load_catalog(&catalog, &registry).await;

    let engine = ProfitRankingEngine::new(
        catalog,
        Arc::new(LocationResolver::new(Arc::new(geocoder))),
        Arc::new(RouteProvider::new(Arc::new(router))),
    );

    let query = SaleQuery {
        commodity: cli.commodity,
        quantity: cli.quantity,
        vehicle: cli.vehicle,
        origin: Coordinates::new(cli.lat, cli.lng),
    };

    let ranked = engine.rank(&query).await?;

    println!("Best mandi: {}", ranked.best_mandi);
    println!();
    println!(
        "{:<20} {:<16} {:>10} {:>12} {:>12}",
        "Mandi", "District", "Dist (km)", "Revenue", "Net profit"
    );
    for entry in &ranked.results {
        println!(
            "{:<20} {:<16} {:>10.2} {:>12} {:>12}",
            entry.mandi, entry.district, entry.distance_km, entry.revenue, entry.profit
        );
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
