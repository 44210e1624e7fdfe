//! Wire and row models shared across the route modules.
//!
//! Bodies are camelCase to match the SPA; rows come straight off sqlx with
//! the password hash excluded at the query level wherever a gym is read.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// A gym account as exposed to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Gym {
    pub id: i64,
    pub user_name: String,
    pub gym_name: String,
    pub email: String,
    pub profile_pic: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPlan {
    pub id: i64,
    pub gym_id: i64,
    pub months: i64,
    pub price: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub gym_id: i64,
    pub name: String,
    pub mobile_no: String,
    pub address: String,
    pub profile_pic: Option<String>,
    pub status: String,
    pub membership_id: Option<i64>,
    pub next_bill_date: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The two statuses a member can hold. Renewal flips a member back to Active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MemberStatus {
    Active,
    Pending,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberStatus::Active => "Active",
            MemberStatus::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub meal_name: String,
    pub description: String,
    pub calories: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub id: i64,
    pub gym_id: i64,
    pub plan_name: String,
    pub description: String,
    pub meals: Vec<Meal>,
    pub total_calories: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub password: String,
    pub gym_name: String,
    pub email: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckOtpRequest {
    pub email: String,
    /// The 6-digit code, sent by the SPA as a string.
    pub otp: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddMembershipRequest {
    pub months: i64,
    pub price: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub name: String,
    pub mobile_no: String,
    pub address: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    /// Id of the membership plan applied at signup.
    pub membership: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeStatusRequest {
    pub status: MemberStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenewPlanRequest {
    /// Id of the membership plan applied by the renewal.
    pub membership: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddDietPlanRequest {
    pub plan_name: String,
    pub description: String,
    pub meals: Vec<Meal>,
    pub total_calories: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDietPlanRequest {
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub meals: Option<Vec<Meal>>,
    #[serde(default)]
    pub total_calories: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MemberPageQuery {
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MemberSearchQuery {
    pub search_term: String,
}
