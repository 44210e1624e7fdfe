//! Membership pricing tiers, unique per (gym, months).

use chrono::Utc;
use sqlx::SqlitePool;

use super::error::ServiceError;
use crate::routes::models::MembershipPlan;

/// Outcome of an upsert: the resulting row and which branch ran.
#[derive(Debug)]
pub struct UpsertOutcome {
    pub plan: MembershipPlan,
    pub created: bool,
}

/// Create a tier, or replace the price of the existing tier for the same
/// duration. At most one row per (gym, months) ever exists.
pub async fn upsert_plan(
    pool: &SqlitePool,
    gym_id: i64,
    months: i64,
    price: i64,
) -> Result<UpsertOutcome, ServiceError> {
    if months < 1 {
        return Err(ServiceError::validation("months must be at least 1"));
    }
    if price < 0 {
        return Err(ServiceError::validation("price must be non-negative"));
    }

    let now = Utc::now().to_rfc3339();

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM membership_plans WHERE gym_id = ? AND months = ?",
    )
    .bind(gym_id)
    .bind(months)
    .fetch_optional(pool)
    .await?;

    let (plan_id, created) = match existing {
        Some(id) => {
            sqlx::query("UPDATE membership_plans SET price = ?, updated_at = ? WHERE id = ?")
                .bind(price)
                .bind(&now)
                .bind(id)
                .execute(pool)
                .await?;
            (id, false)
        }
        None => {
            let result = sqlx::query(
                "INSERT INTO membership_plans (gym_id, months, price, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(gym_id)
            .bind(months)
            .bind(price)
            .bind(&now)
            .bind(&now)
            .execute(pool)
            .await?;
            (result.last_insert_rowid(), true)
        }
    };

    let plan = fetch_plan(pool, gym_id, plan_id).await?;
    Ok(UpsertOutcome { plan, created })
}

pub async fn list_plans(
    pool: &SqlitePool,
    gym_id: i64,
) -> Result<Vec<MembershipPlan>, ServiceError> {
    let plans = sqlx::query_as::<_, MembershipPlan>(
        "SELECT id, gym_id, months, price, created_at, updated_at \
         FROM membership_plans WHERE gym_id = ? ORDER BY months ASC",
    )
    .bind(gym_id)
    .fetch_all(pool)
    .await?;

    Ok(plans)
}

pub(crate) async fn fetch_plan(
    pool: &SqlitePool,
    gym_id: i64,
    plan_id: i64,
) -> Result<MembershipPlan, ServiceError> {
    sqlx::query_as::<_, MembershipPlan>(
        "SELECT id, gym_id, months, price, created_at, updated_at \
         FROM membership_plans WHERE id = ? AND gym_id = ?",
    )
    .bind(plan_id)
    .bind(gym_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::not_found("membership plan not found"))
}
