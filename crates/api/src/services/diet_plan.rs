//! Diet plans with an embedded, JSON-encoded meal list.
//!
//! The stored total is always recomputed from the meal list; a client-supplied
//! figure is validated but never trusted.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::error::ServiceError;
use crate::routes::models::{AddDietPlanRequest, DietPlan, Meal, UpdateDietPlanRequest};

pub async fn create_plan(
    pool: &SqlitePool,
    gym_id: i64,
    req: AddDietPlanRequest,
) -> Result<DietPlan, ServiceError> {
    validate_meals(&req.meals)?;
    validate_total(req.total_calories)?;

    if req.plan_name.trim().is_empty() || req.description.trim().is_empty() {
        return Err(ServiceError::validation(
            "planName and description are required",
        ));
    }

    let total_calories = summed_calories(&req.meals);
    let meals_json = encode_meals(&req.meals)?;
    let now = Utc::now().to_rfc3339();

    let result = sqlx::query(
        "INSERT INTO diet_plans (gym_id, plan_name, description, meals, total_calories, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(gym_id)
    .bind(req.plan_name.trim())
    .bind(req.description.trim())
    .bind(&meals_json)
    .bind(total_calories)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    fetch_plan(pool, gym_id, result.last_insert_rowid()).await
}

/// All plans for the gym, most-recently-created first.
pub async fn list_plans(pool: &SqlitePool, gym_id: i64) -> Result<Vec<DietPlan>, ServiceError> {
    let rows = sqlx::query(
        "SELECT id, gym_id, plan_name, description, meals, total_calories, created_at, updated_at \
         FROM diet_plans WHERE gym_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(gym_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(plan_from_row).collect()
}

pub async fn get_plan(
    pool: &SqlitePool,
    gym_id: i64,
    plan_id: i64,
) -> Result<DietPlan, ServiceError> {
    fetch_plan(pool, gym_id, plan_id).await
}

pub async fn update_plan(
    pool: &SqlitePool,
    gym_id: i64,
    plan_id: i64,
    req: UpdateDietPlanRequest,
) -> Result<DietPlan, ServiceError> {
    if let Some(meals) = &req.meals {
        validate_meals(meals)?;
    }
    if let Some(total) = req.total_calories {
        validate_total(total)?;
    }
    if matches!(&req.plan_name, Some(name) if name.trim().is_empty()) {
        return Err(ServiceError::validation("planName cannot be empty"));
    }
    if matches!(&req.description, Some(desc) if desc.trim().is_empty()) {
        return Err(ServiceError::validation("description cannot be empty"));
    }

    // Ownership check up front so an other-tenant id is a 404, not a no-op.
    let current = fetch_plan(pool, gym_id, plan_id).await?;

    // The total stays derived from the meal list; a client total without new
    // meals is validated above and then ignored.
    let (meals_json, total_calories) = match &req.meals {
        Some(meals) => (Some(encode_meals(meals)?), Some(summed_calories(meals))),
        None => (None, None),
    };

    sqlx::query(
        "UPDATE diet_plans SET \
             plan_name = COALESCE(?, plan_name), \
             description = COALESCE(?, description), \
             meals = COALESCE(?, meals), \
             total_calories = COALESCE(?, total_calories), \
             updated_at = ? \
         WHERE id = ? AND gym_id = ?",
    )
    .bind(req.plan_name.as_deref().map(str::trim))
    .bind(req.description.as_deref().map(str::trim))
    .bind(&meals_json)
    .bind(total_calories)
    .bind(Utc::now().to_rfc3339())
    .bind(current.id)
    .bind(gym_id)
    .execute(pool)
    .await?;

    fetch_plan(pool, gym_id, plan_id).await
}

/// Delete and return the removed plan, matching the SPA's expectations.
pub async fn delete_plan(
    pool: &SqlitePool,
    gym_id: i64,
    plan_id: i64,
) -> Result<DietPlan, ServiceError> {
    let plan = fetch_plan(pool, gym_id, plan_id).await?;

    sqlx::query("DELETE FROM diet_plans WHERE id = ? AND gym_id = ?")
        .bind(plan_id)
        .bind(gym_id)
        .execute(pool)
        .await?;

    Ok(plan)
}

async fn fetch_plan(
    pool: &SqlitePool,
    gym_id: i64,
    plan_id: i64,
) -> Result<DietPlan, ServiceError> {
    let row = sqlx::query(
        "SELECT id, gym_id, plan_name, description, meals, total_calories, created_at, updated_at \
         FROM diet_plans WHERE id = ? AND gym_id = ?",
    )
    .bind(plan_id)
    .bind(gym_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::not_found("diet plan not found"))?;

    plan_from_row(&row)
}

fn plan_from_row(row: &SqliteRow) -> Result<DietPlan, ServiceError> {
    let meals_json: String = row.try_get("meals")?;
    let meals: Vec<Meal> = serde_json::from_str(&meals_json)
        .map_err(|err| ServiceError::internal(format!("corrupt meals column: {err}")))?;

    Ok(DietPlan {
        id: row.try_get("id")?,
        gym_id: row.try_get("gym_id")?,
        plan_name: row.try_get("plan_name")?,
        description: row.try_get("description")?,
        meals,
        total_calories: row.try_get("total_calories")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn validate_meals(meals: &[Meal]) -> Result<(), ServiceError> {
    if meals.is_empty() {
        return Err(ServiceError::validation(
            "meals array is required and cannot be empty",
        ));
    }

    for meal in meals {
        if meal.meal_name.trim().is_empty() {
            return Err(ServiceError::validation("every meal needs a name"));
        }
        if meal.calories < 0 {
            return Err(ServiceError::validation(
                "meal calories must be non-negative",
            ));
        }
    }

    Ok(())
}

fn validate_total(total_calories: i64) -> Result<(), ServiceError> {
    if total_calories < 0 {
        return Err(ServiceError::validation(
            "total calories must be a non-negative number",
        ));
    }
    Ok(())
}

fn summed_calories(meals: &[Meal]) -> i64 {
    meals.iter().map(|meal| meal.calories).sum()
}

fn encode_meals(meals: &[Meal]) -> Result<String, ServiceError> {
    serde_json::to_string(meals)
        .map_err(|err| ServiceError::internal(format!("failed to encode meals: {err}")))
}
