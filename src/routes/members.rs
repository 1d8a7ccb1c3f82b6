use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::analytics::Progress;
use crate::error::{AppError, StoreError};
use crate::models::{
    BasicMeasurementsInput, MemberPatch, MemberRole, NewMember, OrderStatus, ShippingAddress,
    SuitMeasurementsInput, WeddingMember,
};
use crate::AppState;

/// Role and status arrive as free text so that an unknown value is reported
/// as a validation failure rather than a malformed body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberForm {
    name: String,
    email: Option<String>,
    phone: Option<String>,
    role: String,
    special_notes: Option<String>,
}

impl TryFrom<MemberForm> for NewMember {
    type Error = StoreError;

    fn try_from(form: MemberForm) -> Result<Self, Self::Error> {
        Ok(NewMember {
            role: form.role.parse::<MemberRole>()?,
            name: form.name,
            email: non_blank(form.email),
            phone: non_blank(form.phone),
            special_notes: non_blank(form.special_notes),
        })
    }
}

#[derive(Deserialize)]
pub struct OrderStatusForm {
    status: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/weddings/{id}/members", post(add_member))
        .route(
            "/weddings/{id}/members/{member_id}",
            patch(update_member).delete(remove_member),
        )
        .route(
            "/weddings/{id}/members/{member_id}/measurements",
            put(record_measurements),
        )
        .route(
            "/weddings/{id}/members/{member_id}/suit-measurements",
            put(record_suit_measurements),
        )
        .route(
            "/weddings/{id}/members/{member_id}/shipping-address",
            put(record_shipping_address),
        )
        .route(
            "/weddings/{id}/members/{member_id}/order-status",
            put(set_order_status),
        )
        .route("/weddings/{id}/members/{member_id}/progress", get(member_progress))
}

async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<MemberForm>,
) -> Result<impl IntoResponse, AppError> {
    let input = NewMember::try_from(form)?;
    let member = state.store.add_member(&id, input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

async fn update_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, u64)>,
    Json(patch): Json<MemberPatch>,
) -> Result<Json<WeddingMember>, AppError> {
    Ok(Json(state.store.update_member(&id, member_id, patch).await?))
}

async fn remove_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, u64)>,
) -> Result<StatusCode, AppError> {
    state.store.remove_member(&id, member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn record_measurements(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, u64)>,
    Json(measurements): Json<BasicMeasurementsInput>,
) -> Result<Json<WeddingMember>, AppError> {
    let member = state
        .store
        .record_measurements(&id, member_id, measurements)
        .await?;
    Ok(Json(member))
}

async fn record_suit_measurements(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, u64)>,
    Json(measurements): Json<SuitMeasurementsInput>,
) -> Result<Json<WeddingMember>, AppError> {
    let member = state
        .store
        .record_suit_measurements(&id, member_id, measurements)
        .await?;
    Ok(Json(member))
}

async fn record_shipping_address(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, u64)>,
    Json(address): Json<ShippingAddress>,
) -> Result<Json<WeddingMember>, AppError> {
    let member = state
        .store
        .record_shipping_address(&id, member_id, address)
        .await?;
    Ok(Json(member))
}

async fn set_order_status(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, u64)>,
    Json(form): Json<OrderStatusForm>,
) -> Result<Json<WeddingMember>, AppError> {
    let status = form.status.parse::<OrderStatus>()?;
    Ok(Json(state.store.set_order_status(&id, member_id, status).await?))
}

async fn member_progress(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, u64)>,
) -> Result<Json<Progress>, AppError> {
    Ok(Json(state.store.member_progress(&id, member_id).await?))
}
