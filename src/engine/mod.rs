//! The profit ranking pipeline: a coarse haversine funnel feeding an accurate
//! routing-based re-score.
//!
//! The two phases bound the number of expensive routing calls: the cheap
//! haversine proxy scores every price-matching mandi, and only the top
//! [`SHORTLIST_LIMIT`] candidates are re-scored with real driving distances.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{
    geo, vehicle_rate, Coordinates, PriceCatalog, PriceRecord, RankedMandi, RankedResult,
    RouteResult, SaleQuery,
};
use crate::infra::{LocationResolver, RouteProvider};

/// Fixed per-transaction overhead, independent of distance and quantity.
pub const HANDLING_COST: f64 = 500.0;

/// How many coarse candidates are promoted to accurate routing.
pub const SHORTLIST_LIMIT: usize = 5;

const DATA_SOURCE: &str = "Government API (cached + hybrid routing)";

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("{0}")]
    Validation(String),
    #[error("mandi price data not loaded yet")]
    NotReady,
    #[error("no mandis found for {0}")]
    NoMatch(String),
    #[error("{0}")]
    Estimation(&'static str),
}

struct CoarseCandidate {
    record: PriceRecord,
    coordinates: Coordinates,
    estimated_profit: f64,
}

pub struct ProfitRankingEngine {
    catalog: Arc<PriceCatalog>,
    resolver: Arc<LocationResolver>,
    routes: Arc<RouteProvider>,
}

impl ProfitRankingEngine {
    pub fn new(
        catalog: Arc<PriceCatalog>,
        resolver: Arc<LocationResolver>,
        routes: Arc<RouteProvider>,
    ) -> Self {
        Self {
            catalog,
            resolver,
            routes,
        }
    }

    /// Rank all mandis selling the queried commodity by net profit.
    ///
    /// Per-mandi upstream failures (geocoding, routing) exclude that mandi
    /// only; the whole request fails only when a stage is left with nothing.
    pub async fn rank(&self, query: &SaleQuery) -> Result<RankedResult, RankingError> {
        let started = Instant::now();
        let rate = validate(query)?;

        let records = self.catalog.snapshot().await;
        if records.is_empty() {
            return Err(RankingError::NotReady);
        }

        let matching: Vec<&PriceRecord> = records
            .iter()
            .filter(|record| record.commodity.eq_ignore_ascii_case(&query.commodity))
            .collect();
        if matching.is_empty() {
            return Err(RankingError::NoMatch(query.commodity.clone()));
        }

        // Coarse pass: haversine is a lower bound on road distance, good
        // enough to pick a shortlist without touching the routing service.
        let mut estimated = Vec::with_capacity(matching.len());
        for record in matching {
            let Some(coordinates) = self
                .resolver
                .resolve(&record.mandi, &record.district, &record.state)
                .await
            else {
                continue;
            };

            let approx_km = geo::haversine_km(query.origin, coordinates);
            let estimated_profit =
                record.modal_price * query.quantity - approx_km * rate - HANDLING_COST;
            estimated.push(CoarseCandidate {
                record: record.clone(),
                coordinates,
                estimated_profit,
            });
        }
        if estimated.is_empty() {
            return Err(RankingError::Estimation("unable to estimate any mandi"));
        }

        // Stable sort keeps registry order on equal profits.
        estimated.sort_by(|a, b| {
            b.estimated_profit
                .partial_cmp(&a.estimated_profit)
                .unwrap_or(Ordering::Equal)
        });
        estimated.truncate(SHORTLIST_LIMIT);

        // Fine pass: every shortlist route in flight at once, all awaited. A
        // failed route drops that mandi only.
        let lookups = estimated.into_iter().map(|candidate| {
            let origin = query.origin;
            let quantity = query.quantity;
            async move {
                match self.routes.fetch(origin, candidate.coordinates).await {
                    Ok(route) => Some(score_candidate(candidate, route, quantity, rate)),
                    Err(error) => {
                        warn!(
                            mandi = %candidate.record.mandi,
                            %error,
                            "dropping mandi: route lookup failed"
                        );
                        None
                    }
                }
            }
        });
        let mut results: Vec<RankedMandi> =
            join_all(lookups).await.into_iter().flatten().collect();
        if results.is_empty() {
            return Err(RankingError::Estimation("unable to calculate final profits"));
        }

        results.sort_by(|a, b| b.profit.cmp(&a.profit));

        info!(
            commodity = %query.commodity,
            candidates = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ranking complete"
        );

        Ok(RankedResult {
            best_mandi: results[0].mandi.clone(),
            route: results[0].route.clone(),
            origin: query.origin,
            commodity: query.commodity.clone(),
            quantity: query.quantity,
            vehicle: query.vehicle.clone(),
            total_mandis_processed: results.len(),
            data_source: DATA_SOURCE,
            results,
        })
    }
}

fn validate(query: &SaleQuery) -> Result<f64, RankingError> {
    if query.commodity.trim().is_empty() {
        return Err(RankingError::Validation(
            "missing required field: commodity".into(),
        ));
    }
    if !(query.quantity > 0.0) {
        return Err(RankingError::Validation("quantity must be positive".into()));
    }
    vehicle_rate(&query.vehicle)
        .ok_or_else(|| RankingError::Validation(format!("invalid vehicle type: {}", query.vehicle)))
}

fn score_candidate(
    candidate: CoarseCandidate,
    route: RouteResult,
    quantity: f64,
    rate: f64,
) -> RankedMandi {
    let revenue = candidate.record.modal_price * quantity;
    let transport_cost = route.distance_km * rate;
    let net_profit = revenue - transport_cost - HANDLING_COST;

    RankedMandi {
        mandi: candidate.record.mandi,
        state: candidate.record.state,
        district: candidate.record.district,
        distance_km: (route.distance_km * 100.0).round() / 100.0,
        profit: net_profit.round() as i64,
        revenue: revenue.round() as i64,
        transport_cost: transport_cost.round() as i64,
        handling_cost: HANDLING_COST as i64,
        price: candidate.record.modal_price,
        coordinates: candidate.coordinates,
        route: route.geometry,
    }
}
