//! Diet plan routes. All of these require a session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::middleware::CurrentGym;
use crate::routes::models::{AddDietPlanRequest, DietPlan, UpdateDietPlanRequest};
use crate::services::diet_plan as diet_plan_service;
use crate::{ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateDietPlanResponse {
    pub message: String,
    pub data: DietPlan,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DietPlansResponse {
    pub message: String,
    pub diet_plans: Vec<DietPlan>,
    pub total_diet_plans: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanResponse {
    pub message: String,
    pub diet_plan: DietPlan,
}

#[utoipa::path(
    post,
    path = "/diet-plan/add",
    tag = "Diet Plans",
    request_body = AddDietPlanRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Diet plan created; total recomputed from meals", body = CreateDietPlanResponse),
        (status = 400, description = "Empty meals or negative calories", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_diet_plan(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
    Json(payload): Json<AddDietPlanRequest>,
) -> Result<(StatusCode, Json<CreateDietPlanResponse>), ApiError> {
    let plan = diet_plan_service::create_plan(state.db_pool(), gym.id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateDietPlanResponse {
            message: "Diet plan added successfully".to_string(),
            data: plan,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/diet-plan/all",
    tag = "Diet Plans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All diet plans for the gym, newest first", body = DietPlansResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn all_diet_plans(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
) -> Result<Json<DietPlansResponse>, ApiError> {
    let diet_plans = diet_plan_service::list_plans(state.db_pool(), gym.id).await?;
    let total_diet_plans = diet_plans.len() as i64;

    Ok(Json(DietPlansResponse {
        message: "Fetched diet plans successfully".to_string(),
        diet_plans,
        total_diet_plans,
    }))
}

#[utoipa::path(
    get,
    path = "/diet-plan/get-plan/{id}",
    tag = "Diet Plans",
    params(("id" = i64, Path, description = "Diet plan id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The diet plan", body = DietPlanResponse),
        (status = 404, description = "Diet plan not found for this gym", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_diet_plan(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
    Path(plan_id): Path<i64>,
) -> Result<Json<DietPlanResponse>, ApiError> {
    let plan = diet_plan_service::get_plan(state.db_pool(), gym.id, plan_id).await?;

    Ok(Json(DietPlanResponse {
        message: "Fetched diet plan successfully".to_string(),
        diet_plan: plan,
    }))
}

#[utoipa::path(
    put,
    path = "/diet-plan/update/{id}",
    tag = "Diet Plans",
    params(("id" = i64, Path, description = "Diet plan id")),
    request_body = UpdateDietPlanRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Diet plan updated", body = DietPlanResponse),
        (status = 400, description = "Empty meals or negative calories", body = crate::error::ErrorResponse),
        (status = 404, description = "Diet plan not found for this gym", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_diet_plan(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
    Path(plan_id): Path<i64>,
    Json(payload): Json<UpdateDietPlanRequest>,
) -> Result<Json<DietPlanResponse>, ApiError> {
    let plan = diet_plan_service::update_plan(state.db_pool(), gym.id, plan_id, payload).await?;

    Ok(Json(DietPlanResponse {
        message: "Diet plan updated successfully".to_string(),
        diet_plan: plan,
    }))
}

#[utoipa::path(
    delete,
    path = "/diet-plan/delete/{id}",
    tag = "Diet Plans",
    params(("id" = i64, Path, description = "Diet plan id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Diet plan removed; the deleted plan is returned", body = DietPlanResponse),
        (status = 404, description = "Diet plan not found for this gym", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_diet_plan(
    State(state): State<AppState>,
    Extension(CurrentGym(gym)): Extension<CurrentGym>,
    Path(plan_id): Path<i64>,
) -> Result<Json<DietPlanResponse>, ApiError> {
    let plan = diet_plan_service::delete_plan(state.db_pool(), gym.id, plan_id).await?;

    Ok(Json(DietPlanResponse {
        message: "Diet plan deleted successfully".to_string(),
        diet_plan: plan,
    }))
}
