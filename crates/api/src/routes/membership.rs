//! Membership pricing tier routes. All of these require a session.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::middleware::CurrentGym;
use crate::routes::models::{AddMembershipRequest, MembershipPlan};
use crate::services::membership as membership_service;
use crate::{ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct UpsertMembershipResponse {
    pub message: String,
    pub data: MembershipPlan,
    pub created: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MembershipListResponse {
    pub message: String,
    pub membership: Vec<MembershipPlan>,
}

#[utoipa::path(
    post,
    path = "/plans/add-membership",
    tag = "Membership",
    request_body = AddMembershipRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "New tier created", body = UpsertMembershipResponse),
        (status = 200, description = "Existing tier re-priced", body = UpsertMembershipResponse),
        (status = 400, description = "Invalid months or price", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_membership(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
    Json(payload): Json<AddMembershipRequest>,
) -> Result<(StatusCode, Json<UpsertMembershipResponse>), ApiError> {
    let outcome =
        membership_service::upsert_plan(state.db_pool(), gym.id, payload.months, payload.price)
            .await?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Added Successfully")
    } else {
        (StatusCode::OK, "Updated Successfully")
    };

    Ok((
        status,
        Json(UpsertMembershipResponse {
            message: message.to_string(),
            data: outcome.plan,
            created: outcome.created,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/plans/get-membership",
    tag = "Membership",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All tiers for the gym, shortest first", body = MembershipListResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_membership(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
) -> Result<Json<MembershipListResponse>, ApiError> {
    let membership = membership_service::list_plans(state.db_pool(), gym.id).await?;

    Ok(Json(MembershipListResponse {
        message: "Membership fetched successfully".to_string(),
        membership,
    }))
}
