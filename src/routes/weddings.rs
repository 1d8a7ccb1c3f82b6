use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::analytics::{MeasurementStats, Progress, WeddingAnalytics};
use crate::error::AppError;
use crate::models::{NewParty, PartyPatch, WeddingParty};
use crate::AppState;

// Path segments after /weddings share one parameter name; the lookup route
// reads it as a wedding code, the rest as a party id.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/weddings", post(create_wedding).get(list_weddings))
        .route("/weddings/analytics", get(analytics))
        .route("/weddings/{id}", get(find_by_code).patch(update_wedding))
        .route("/weddings/{id}/stats", get(measurement_stats))
        .route("/weddings/{id}/progress", get(progress))
}

async fn create_wedding(
    State(state): State<AppState>,
    Json(input): Json<NewParty>,
) -> Result<impl IntoResponse, AppError> {
    let party = state.store.create_party(input).await?;
    Ok((StatusCode::CREATED, Json(party)))
}

async fn list_weddings(State(state): State<AppState>) -> Result<Json<Vec<WeddingParty>>, AppError> {
    Ok(Json(state.store.list_parties().await?))
}

async fn find_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<WeddingParty>, AppError> {
    let party = state.store.find_by_code(&code).await?;
    party.map(Json).ok_or(AppError::NotFound)
}

async fn update_wedding(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<PartyPatch>,
) -> Result<Json<WeddingParty>, AppError> {
    Ok(Json(state.store.update_party(&id, patch).await?))
}

async fn measurement_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MeasurementStats>, AppError> {
    Ok(Json(state.store.measurement_stats(&id).await?))
}

async fn progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Progress>, AppError> {
    Ok(Json(state.store.party_progress(&id).await?))
}

async fn analytics(State(state): State<AppState>) -> Result<Json<WeddingAnalytics>, AppError> {
    Ok(Json(state.store.analytics().await?))
}
