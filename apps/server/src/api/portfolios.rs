use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use familyfolio_core::{
    portfolios::Portfolio,
    rebalancing::{PortfolioRecommendations, PortfolioSnapshot},
};

async fn list_portfolios(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Portfolio>>> {
    let portfolios = state.rebalancing_service.get_portfolios().await?;
    Ok(Json(portfolios))
}

async fn get_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Portfolio>> {
    let portfolio = state.rebalancing_service.get_portfolio(&id).await?;
    Ok(Json(portfolio))
}

async fn get_snapshot(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioSnapshot>> {
    let snapshot = state.rebalancing_service.get_snapshot(&id).await?;
    Ok(Json(snapshot))
}

async fn get_recommendations(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioRecommendations>> {
    let report = state.rebalancing_service.get_recommendations(&id).await?;
    Ok(Json(report))
}

async fn reload_portfolios(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.store.reload().await?;
    state.rebalancing_service.invalidate_all().await;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolios", get(list_portfolios))
        .route("/portfolios/reload", post(reload_portfolios))
        .route("/portfolios/{id}", get(get_portfolio))
        .route("/portfolios/{id}/snapshot", get(get_snapshot))
        .route("/portfolios/{id}/recommendations", get(get_recommendations))
}
