//! Member roster routes. All of these require a session.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::middleware::CurrentGym;
use crate::routes::models::{
    AddMemberRequest, ChangeStatusRequest, Member, MemberPageQuery, MemberSearchQuery,
    RenewPlanRequest,
};
use crate::services::member as member_service;
use crate::{ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembersResponse {
    pub message: String,
    pub members: Vec<Member>,
    pub total_members: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub message: String,
    pub member: Member,
}

#[utoipa::path(
    post,
    path = "/members/add-member",
    tag = "Members",
    request_body = AddMemberRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Member enrolled with an Active status", body = MemberResponse),
        (status = 400, description = "Missing fields", body = crate::error::ErrorResponse),
        (status = 404, description = "Membership plan not found for this gym", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_member(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
    Json(payload): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let member = member_service::create_member(state.db_pool(), gym.id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(MemberResponse {
            message: "Member added successfully".to_string(),
            member,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/members/all-member",
    tag = "Members",
    params(MemberPageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of members plus the gym total", body = MembersResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn all_members(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
    Query(params): Query<MemberPageQuery>,
) -> Result<Json<MembersResponse>, ApiError> {
    let (members, total_members) =
        member_service::list_members(state.db_pool(), gym.id, params.skip, params.limit).await?;

    Ok(Json(MembersResponse {
        message: "Fetched members successfully".to_string(),
        members,
        total_members,
    }))
}

#[utoipa::path(
    get,
    path = "/members/searched-members",
    tag = "Members",
    params(MemberSearchQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Members whose name or mobile number match", body = MembersResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn searched_members(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
    Query(params): Query<MemberSearchQuery>,
) -> Result<Json<MembersResponse>, ApiError> {
    let members =
        member_service::search_members(state.db_pool(), gym.id, &params.search_term).await?;
    let total_members = members.len() as i64;

    Ok(Json(MembersResponse {
        message: "Fetched members successfully".to_string(),
        members,
        total_members,
    }))
}

#[utoipa::path(
    get,
    path = "/members/get-member/{id}",
    tag = "Members",
    params(("id" = i64, Path, description = "Member id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The member", body = MemberResponse),
        (status = 404, description = "Member not found for this gym", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
    Path(member_id): Path<i64>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member = member_service::get_member(state.db_pool(), gym.id, member_id).await?;

    Ok(Json(MemberResponse {
        message: "Fetched member successfully".to_string(),
        member,
    }))
}

#[utoipa::path(
    post,
    path = "/members/change-status/{id}",
    tag = "Members",
    params(("id" = i64, Path, description = "Member id")),
    request_body = ChangeStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status updated", body = MemberResponse),
        (status = 404, description = "Member not found for this gym", body = crate::error::ErrorResponse)
    )
)]
pub async fn change_status(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
    Path(member_id): Path<i64>,
    Json(payload): Json<ChangeStatusRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member =
        member_service::change_status(state.db_pool(), gym.id, member_id, payload.status).await?;

    Ok(Json(MemberResponse {
        message: "Status changed successfully".to_string(),
        member,
    }))
}

#[utoipa::path(
    put,
    path = "/members/update-member-plan/{id}",
    tag = "Members",
    params(("id" = i64, Path, description = "Member id")),
    request_body = RenewPlanRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Plan renewed; member is Active again", body = MemberResponse),
        (status = 404, description = "Member or plan not found for this gym", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_member_plan(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
    Path(member_id): Path<i64>,
    Json(payload): Json<RenewPlanRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member =
        member_service::renew_plan(state.db_pool(), gym.id, member_id, payload.membership).await?;

    Ok(Json(MemberResponse {
        message: "Plan updated successfully".to_string(),
        member,
    }))
}
