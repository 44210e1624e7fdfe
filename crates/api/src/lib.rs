mod docs;
mod error;
mod mailer;
mod middleware;
mod services;
mod state;

pub mod routes;

pub use docs::ApiDoc;
pub use error::ApiError;
pub use mailer::Mailer;
pub use middleware::{CurrentGym, SESSION_COOKIE};
pub use state::AppState;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.allowed_origins());

    let protected = Router::new()
        .route("/plans/add-membership", post(routes::membership::add_membership))
        .route("/plans/get-membership", get(routes::membership::get_membership))
        .route("/members/add-member", post(routes::members::add_member))
        .route("/members/all-member", get(routes::members::all_members))
        .route(
            "/members/searched-members",
            get(routes::members::searched_members),
        )
        .route("/members/get-member/:id", get(routes::members::get_member))
        .route(
            "/members/change-status/:id",
            post(routes::members::change_status),
        )
        .route(
            "/members/update-member-plan/:id",
            put(routes::members::update_member_plan),
        )
        .route("/diet-plan/add", post(routes::diet_plans::add_diet_plan))
        .route("/diet-plan/all", get(routes::diet_plans::all_diet_plans))
        .route(
            "/diet-plan/get-plan/:id",
            get(routes::diet_plans::get_diet_plan),
        )
        .route(
            "/diet-plan/update/:id",
            put(routes::diet_plans::update_diet_plan),
        )
        .route(
            "/diet-plan/delete/:id",
            delete(routes::diet_plans::delete_diet_plan),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_gym,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/reset-password/sendOtp", post(routes::auth::send_otp))
        .route("/auth/reset-password/checkOtp", post(routes::auth::check_otp))
        .route("/auth/reset-password", post(routes::auth::reset_password))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
}
