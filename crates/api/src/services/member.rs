//! Member roster: creation, paging, search, status, plan renewal.

use chrono::{Months, Utc};
use sqlx::SqlitePool;

use super::error::ServiceError;
use super::membership::fetch_plan;
use crate::routes::models::{AddMemberRequest, Member, MemberStatus};

const DEFAULT_PAGE_SIZE: i64 = 9;
const MEMBER_COLUMNS: &str = "id, gym_id, name, mobile_no, address, profile_pic, status, \
                              membership_id, next_bill_date, created_at, updated_at";

pub async fn create_member(
    pool: &SqlitePool,
    gym_id: i64,
    req: AddMemberRequest,
) -> Result<Member, ServiceError> {
    let name = req.name.trim();
    let mobile_no = req.mobile_no.trim();
    let address = req.address.trim();

    if name.is_empty() || mobile_no.is_empty() || address.is_empty() {
        return Err(ServiceError::validation(
            "name, mobileNo and address are required",
        ));
    }

    // The chosen plan must belong to this gym.
    let plan = fetch_plan(pool, gym_id, req.membership).await?;
    let next_bill_date = next_bill_date_from(plan.months)?;
    let now = Utc::now().to_rfc3339();

    let result = sqlx::query(
        "INSERT INTO members (gym_id, name, mobile_no, address, profile_pic, status, membership_id, next_bill_date, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(gym_id)
    .bind(name)
    .bind(mobile_no)
    .bind(address)
    .bind(&req.profile_pic)
    .bind(MemberStatus::Active.as_str())
    .bind(plan.id)
    .bind(&next_bill_date)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    fetch_member(pool, gym_id, result.last_insert_rowid()).await
}

/// Page of members plus the gym's total count, newest first.
pub async fn list_members(
    pool: &SqlitePool,
    gym_id: i64,
    skip: Option<i64>,
    limit: Option<i64>,
) -> Result<(Vec<Member>, i64), ServiceError> {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let members = sqlx::query_as::<_, Member>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members WHERE gym_id = ? \
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    ))
    .bind(gym_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM members WHERE gym_id = ?")
        .bind(gym_id)
        .fetch_one(pool)
        .await?;

    Ok((members, total))
}

/// Substring match on name or mobile number, tenant-scoped, unpaginated.
pub async fn search_members(
    pool: &SqlitePool,
    gym_id: i64,
    term: &str,
) -> Result<Vec<Member>, ServiceError> {
    let pattern = format!("%{}%", term.trim());

    let members = sqlx::query_as::<_, Member>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members \
         WHERE gym_id = ? AND (name LIKE ? OR mobile_no LIKE ?) \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(gym_id)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(members)
}

pub async fn get_member(
    pool: &SqlitePool,
    gym_id: i64,
    member_id: i64,
) -> Result<Member, ServiceError> {
    fetch_member(pool, gym_id, member_id).await
}

/// Update the status flag and nothing else.
pub async fn change_status(
    pool: &SqlitePool,
    gym_id: i64,
    member_id: i64,
    status: MemberStatus,
) -> Result<Member, ServiceError> {
    let result = sqlx::query(
        "UPDATE members SET status = ?, updated_at = ? WHERE id = ? AND gym_id = ?",
    )
    .bind(status.as_str())
    .bind(Utc::now().to_rfc3339())
    .bind(member_id)
    .bind(gym_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::not_found("member not found"));
    }

    fetch_member(pool, gym_id, member_id).await
}

/// Re-apply a plan: recompute the next billing date from the plan's duration
/// and flip the member back to Active.
pub async fn renew_plan(
    pool: &SqlitePool,
    gym_id: i64,
    member_id: i64,
    plan_id: i64,
) -> Result<Member, ServiceError> {
    let plan = fetch_plan(pool, gym_id, plan_id).await?;
    let next_bill_date = next_bill_date_from(plan.months)?;

    let result = sqlx::query(
        "UPDATE members SET membership_id = ?, next_bill_date = ?, status = ?, updated_at = ? \
         WHERE id = ? AND gym_id = ?",
    )
    .bind(plan.id)
    .bind(&next_bill_date)
    .bind(MemberStatus::Active.as_str())
    .bind(Utc::now().to_rfc3339())
    .bind(member_id)
    .bind(gym_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::not_found("member not found"));
    }

    fetch_member(pool, gym_id, member_id).await
}

async fn fetch_member(
    pool: &SqlitePool,
    gym_id: i64,
    member_id: i64,
) -> Result<Member, ServiceError> {
    sqlx::query_as::<_, Member>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members WHERE id = ? AND gym_id = ?"
    ))
    .bind(member_id)
    .bind(gym_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::not_found("member not found"))
}

fn next_bill_date_from(months: i64) -> Result<String, ServiceError> {
    let months =
        u32::try_from(months).map_err(|_| ServiceError::validation("invalid plan duration"))?;

    Utc::now()
        .checked_add_months(Months::new(months))
        .map(|date| date.to_rfc3339())
        .ok_or_else(|| ServiceError::internal("next billing date out of range"))
}
