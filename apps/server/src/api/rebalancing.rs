use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState, models::PlanRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use familyfolio_core::{alerts::RebalanceAlert, rebalancing::PortfolioRecommendations};

/// Runs the engine on holdings posted by the caller. Nothing is stored.
async fn plan(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PlanRequest>, JsonRejection>,
) -> ApiResult<Json<PortfolioRecommendations>> {
    let Json(request) = body?;
    let service = &state.rebalancing_service;
    let portfolio = request
        .portfolio
        .into_portfolio(service.settings().default_threshold);
    let report = service.plan_for_holdings(&portfolio, &request.holdings)?;
    Ok(Json(report))
}

async fn get_alerts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<RebalanceAlert>>> {
    let alerts = state.rebalancing_service.get_rebalance_alerts().await?;
    Ok(Json(alerts))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rebalancing/plan", post(plan))
        .route("/rebalancing/alerts", get(get_alerts))
}
