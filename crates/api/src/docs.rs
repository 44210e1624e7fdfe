use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::send_otp,
        crate::routes::auth::check_otp,
        crate::routes::auth::reset_password,
        crate::routes::membership::add_membership,
        crate::routes::membership::get_membership,
        crate::routes::members::add_member,
        crate::routes::members::all_members,
        crate::routes::members::searched_members,
        crate::routes::members::get_member,
        crate::routes::members::change_status,
        crate::routes::members::update_member_plan,
        crate::routes::diet_plans::add_diet_plan,
        crate::routes::diet_plans::all_diet_plans,
        crate::routes::diet_plans::get_diet_plan,
        crate::routes::diet_plans::update_diet_plan,
        crate::routes::diet_plans::delete_diet_plan
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::MessageResponse,
            crate::routes::health::HealthResponse,
            crate::routes::auth::RegisterResponse,
            crate::routes::auth::LoginResponse,
            crate::routes::membership::UpsertMembershipResponse,
            crate::routes::membership::MembershipListResponse,
            crate::routes::members::MembersResponse,
            crate::routes::members::MemberResponse,
            crate::routes::diet_plans::CreateDietPlanResponse,
            crate::routes::diet_plans::DietPlansResponse,
            crate::routes::diet_plans::DietPlanResponse,
            crate::routes::models::Gym,
            crate::routes::models::MembershipPlan,
            crate::routes::models::Member,
            crate::routes::models::MemberStatus,
            crate::routes::models::Meal,
            crate::routes::models::DietPlan,
            crate::routes::models::RegisterRequest,
            crate::routes::models::LoginRequest,
            crate::routes::models::SendOtpRequest,
            crate::routes::models::CheckOtpRequest,
            crate::routes::models::ResetPasswordRequest,
            crate::routes::models::AddMembershipRequest,
            crate::routes::models::AddMemberRequest,
            crate::routes::models::ChangeStatusRequest,
            crate::routes::models::RenewPlanRequest,
            crate::routes::models::AddDietPlanRequest,
            crate::routes::models::UpdateDietPlanRequest
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Auth", description = "Gym account registration, login and password reset"),
        (name = "Membership", description = "Pricing tier management"),
        (name = "Members", description = "Member roster operations"),
        (name = "Diet Plans", description = "Diet plan management")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        let schemes = &mut components.security_schemes;

        let mut scheme = SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer));
        if let SecurityScheme::Http(http) = &mut scheme {
            http.bearer_format = Some("Bearer".to_string());
        }

        schemes.insert("bearer_auth".to_string(), scheme);
    }
}
