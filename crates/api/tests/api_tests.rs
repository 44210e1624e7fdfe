use anyhow::anyhow;
use axum::{
    body::Body,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION,
            CONTENT_TYPE, COOKIE, ORIGIN, SET_COOKIE,
        },
        Method, Request, StatusCode,
    },
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use maxxzone_api::{build_router, AppState, SESSION_COOKIE};
use maxxzone_auth::SessionTokens;
use maxxzone_config::{AppConfig, DatabaseConfig};
use maxxzone_database::initialize_database;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

type TestResult<T = ()> = anyhow::Result<T>;

const TEST_SECRET: &str = "test_secret_key_that_is_long_enough_for_hs256";
const PASSWORD: &str = "sw0rdfish";

struct TestContext {
    _temp_dir: TempDir,
    pool: SqlitePool,
    state: AppState,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("maxxzone.sqlite");
        let db_config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 5,
        };
        let pool = initialize_database(&db_config).await?;

        let tokens = SessionTokens::new(Some(TEST_SECRET), Duration::hours(24));
        let state = AppState::new(pool.clone(), tokens, None, &AppConfig::default());

        Ok(Self {
            _temp_dir: temp_dir,
            pool,
            state,
        })
    }

    fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn register(&self, user_name: &str) -> TestResult<Value> {
        let (status, body) = request(
            self.router(),
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "userName": user_name,
                "password": PASSWORD,
                "gymName": format!("{user_name} fitness"),
                "email": format!("{user_name}@example.com"),
            })),
        )
        .await?;

        if status != StatusCode::CREATED {
            return Err(anyhow!("registration of {user_name} failed: {status} {body}"));
        }
        Ok(body)
    }

    async fn login(&self, user_name: &str) -> TestResult<String> {
        let (status, body) = request(
            self.router(),
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "userName": user_name, "password": PASSWORD })),
        )
        .await?;

        if status != StatusCode::OK {
            return Err(anyhow!("login of {user_name} failed: {status} {body}"));
        }
        body["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("login response carried no token"))
    }

    async fn register_and_login(&self, user_name: &str) -> TestResult<String> {
        self.register(user_name).await?;
        self.login(user_name).await
    }

    async fn create_plan(&self, token: &str, months: i64, price: i64) -> TestResult<i64> {
        let (status, body) = request(
            self.router(),
            Method::POST,
            "/plans/add-membership",
            Some(token),
            Some(json!({ "months": months, "price": price })),
        )
        .await?;

        if !matches!(status, StatusCode::CREATED | StatusCode::OK) {
            return Err(anyhow!("plan upsert failed: {status} {body}"));
        }
        body["data"]["id"]
            .as_i64()
            .ok_or_else(|| anyhow!("plan response carried no id"))
    }

    async fn add_member(&self, token: &str, name: &str, plan_id: i64) -> TestResult<Value> {
        let (status, body) = request(
            self.router(),
            Method::POST,
            "/members/add-member",
            Some(token),
            Some(json!({
                "name": name,
                "mobileNo": "5550101",
                "address": "12 High Street",
                "membership": plan_id,
            })),
        )
        .await?;

        if status != StatusCode::CREATED {
            return Err(anyhow!("adding member {name} failed: {status} {body}"));
        }
        Ok(body["member"].clone())
    }

    async fn add_diet_plan(&self, token: &str, plan_name: &str) -> TestResult<Value> {
        let (status, body) = request(
            self.router(),
            Method::POST,
            "/diet-plan/add",
            Some(token),
            Some(json!({
                "planName": plan_name,
                "description": "lean bulk",
                "meals": [
                    { "mealName": "breakfast", "description": "oats", "calories": 450 },
                    { "mealName": "lunch", "description": "rice and chicken", "calories": 700 },
                ],
                "totalCalories": 0,
            })),
        )
        .await?;

        if status != StatusCode::CREATED {
            return Err(anyhow!("adding diet plan failed: {status} {body}"));
        }
        Ok(body["data"].clone())
    }
}

async fn request(
    router: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResult<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(payload) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = router.oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let payload = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, payload))
}

mod router_tests {
    use super::*;

    #[tokio::test]
    async fn health_endpoint_is_public() -> TestResult {
        let ctx = TestContext::new().await?;
        let (status, body) = request(ctx.router(), Method::GET, "/health", None, None).await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        Ok(())
    }

    #[tokio::test]
    async fn openapi_document_is_mounted() -> TestResult {
        let ctx = TestContext::new().await?;
        let (status, body) =
            request(ctx.router(), Method::GET, "/api-docs/openapi.json", None, None).await?;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].is_object());
        Ok(())
    }

    #[tokio::test]
    async fn cors_preflight_allows_the_configured_origin() -> TestResult {
        let ctx = TestContext::new().await?;
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/auth/login")
            .header(ORIGIN, "http://localhost:3000")
            .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())?;

        let response = ctx.router().oneshot(request).await?;
        let allow_origin = response
            .headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        assert_eq!(allow_origin, "http://localhost:3000");
        Ok(())
    }
}

mod auth_flow_tests {
    use super::*;

    #[tokio::test]
    async fn register_returns_account_without_password_material() -> TestResult {
        let ctx = TestContext::new().await?;
        let body = ctx.register("ironworks").await?;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["userName"], "ironworks");
        assert_eq!(body["data"]["email"], "ironworks@example.com");
        assert!(body["data"].get("password").is_none());
        assert!(body["data"].get("passwordHash").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username_without_second_row() -> TestResult {
        let ctx = TestContext::new().await?;
        ctx.register("ironworks").await?;

        let (status, body) = request(
            ctx.router(),
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "userName": "ironworks",
                "password": PASSWORD,
                "gymName": "copycat",
                "email": "other@example.com",
            })),
        )
        .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "username or email already exists");

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gyms")
            .fetch_one(ctx.pool())
            .await?;
        assert_eq!(rows, 1);
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() -> TestResult {
        let ctx = TestContext::new().await?;
        let (status, _) = request(
            ctx.router(),
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "userName": "  ",
                "password": PASSWORD,
                "gymName": "nameless",
                "email": "nameless@example.com",
            })),
        )
        .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn login_sets_the_session_cookie() -> TestResult {
        let ctx = TestContext::new().await?;
        ctx.register("ironworks").await?;

        let response = ctx
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/auth/login")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&json!({
                        "userName": "ironworks",
                        "password": PASSWORD,
                    }))?))?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));

        let bytes = response.into_body().collect().await?.to_bytes();
        let body: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["success"], true);
        assert_eq!(body["gym"]["userName"], "ironworks");
        assert!(!body["token"].as_str().unwrap_or_default().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn login_errors_do_not_reveal_which_accounts_exist() -> TestResult {
        let ctx = TestContext::new().await?;
        ctx.register("ironworks").await?;

        let (unknown_status, unknown_body) = request(
            ctx.router(),
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "userName": "nobody", "password": PASSWORD })),
        )
        .await?;
        let (wrong_status, wrong_body) = request(
            ctx.router(),
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "userName": "ironworks", "password": "wrong" })),
        )
        .await?;

        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_body["error"], wrong_body["error"]);
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_the_session_cookie() -> TestResult {
        let ctx = TestContext::new().await?;
        let response = ctx
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/auth/logout")
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));
        assert!(cookie.contains("Max-Age=0") || cookie.contains("Expires="));
        Ok(())
    }
}

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn protected_routes_reject_requests_without_a_token() -> TestResult {
        let ctx = TestContext::new().await?;
        let (status, body) =
            request(ctx.router(), Method::GET, "/plans/get-membership", None, None).await?;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "no token, authorization denied");
        Ok(())
    }

    #[tokio::test]
    async fn protected_routes_reject_tampered_tokens() -> TestResult {
        let ctx = TestContext::new().await?;
        ctx.register_and_login("ironworks").await?;

        let forged = SessionTokens::new(Some("some-other-secret-entirely!!"), Duration::hours(24))
            .issue(1)?;
        let (status, body) = request(
            ctx.router(),
            Method::GET,
            "/plans/get-membership",
            Some(&forged),
            None,
        )
        .await?;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "token is not valid");
        Ok(())
    }

    #[tokio::test]
    async fn expired_tokens_are_reported_as_expired() -> TestResult {
        let ctx = TestContext::new().await?;
        ctx.register_and_login("ironworks").await?;

        let expired = SessionTokens::new(Some(TEST_SECRET), Duration::seconds(-5)).issue(1)?;
        let (status, body) = request(
            ctx.router(),
            Method::GET,
            "/plans/get-membership",
            Some(&expired),
            None,
        )
        .await?;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "session has expired");
        Ok(())
    }

    #[tokio::test]
    async fn session_cookie_authenticates_protected_routes() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;

        let response = ctx
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/plans/get-membership")
                    .header(COOKIE, format!("{SESSION_COOKIE}={token}"))
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }
}

mod membership_tests {
    use super::*;

    #[tokio::test]
    async fn upsert_creates_then_reprices_a_tier() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;

        let (status, body) = request(
            ctx.router(),
            Method::POST,
            "/plans/add-membership",
            Some(&token),
            Some(json!({ "months": 6, "price": 1000 })),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Added Successfully");
        assert_eq!(body["created"], true);

        let (status, body) = request(
            ctx.router(),
            Method::POST,
            "/plans/add-membership",
            Some(&token),
            Some(json!({ "months": 6, "price": 1200 })),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Updated Successfully");
        assert_eq!(body["created"], false);
        assert_eq!(body["data"]["price"], 1200);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM membership_plans")
            .fetch_one(ctx.pool())
            .await?;
        assert_eq!(rows, 1);
        Ok(())
    }

    #[tokio::test]
    async fn upsert_validates_months_and_price() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;

        let (status, _) = request(
            ctx.router(),
            Method::POST,
            "/plans/add-membership",
            Some(&token),
            Some(json!({ "months": 0, "price": 500 })),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = request(
            ctx.router(),
            Method::POST,
            "/plans/add-membership",
            Some(&token),
            Some(json!({ "months": 3, "price": -1 })),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn tiers_are_listed_shortest_first_per_gym() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let other = ctx.register_and_login("rivals").await?;

        ctx.create_plan(&token, 12, 9000).await?;
        ctx.create_plan(&token, 1, 900).await?;
        ctx.create_plan(&other, 3, 2500).await?;

        let (status, body) = request(
            ctx.router(),
            Method::GET,
            "/plans/get-membership",
            Some(&token),
            None,
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        let months: Vec<i64> = body["membership"]
            .as_array()
            .map(|plans| plans.iter().filter_map(|p| p["months"].as_i64()).collect())
            .unwrap_or_default();
        assert_eq!(months, vec![1, 12]);
        Ok(())
    }
}

mod member_tests {
    use super::*;

    #[tokio::test]
    async fn new_members_start_active_with_a_billing_date() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let plan_id = ctx.create_plan(&token, 6, 1000).await?;

        let member = ctx.add_member(&token, "Asha Verma", plan_id).await?;

        assert_eq!(member["status"], "Active");
        assert_eq!(member["membershipId"].as_i64(), Some(plan_id));

        let next_bill = member["nextBillDate"].as_str().unwrap_or_default();
        let parsed = chrono::DateTime::parse_from_rfc3339(next_bill)?;
        assert!(parsed > Utc::now());
        Ok(())
    }

    #[tokio::test]
    async fn adding_a_member_requires_an_owned_plan() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let other = ctx.register_and_login("rivals").await?;
        let foreign_plan = ctx.create_plan(&other, 3, 2500).await?;

        let (status, body) = request(
            ctx.router(),
            Method::POST,
            "/members/add-member",
            Some(&token),
            Some(json!({
                "name": "Asha Verma",
                "mobileNo": "5550101",
                "address": "12 High Street",
                "membership": foreign_plan,
            })),
        )
        .await?;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "membership plan not found");
        Ok(())
    }

    #[tokio::test]
    async fn roster_pages_default_to_nine_and_report_the_total() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let plan_id = ctx.create_plan(&token, 1, 900).await?;

        for i in 0..12 {
            ctx.add_member(&token, &format!("Member {i:02}"), plan_id)
                .await?;
        }

        let (status, body) = request(
            ctx.router(),
            Method::GET,
            "/members/all-member",
            Some(&token),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["members"].as_array().map(Vec::len), Some(9));
        assert_eq!(body["totalMembers"], 12);

        let (_, second_page) = request(
            ctx.router(),
            Method::GET,
            "/members/all-member?skip=9&limit=9",
            Some(&token),
            None,
        )
        .await?;
        assert_eq!(second_page["members"].as_array().map(Vec::len), Some(3));
        assert_eq!(second_page["totalMembers"], 12);
        Ok(())
    }

    #[tokio::test]
    async fn search_matches_name_or_mobile_within_the_gym() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let plan_id = ctx.create_plan(&token, 1, 900).await?;

        ctx.add_member(&token, "Asha Verma", plan_id).await?;
        ctx.add_member(&token, "Ravi Kumar", plan_id).await?;

        let other = ctx.register_and_login("rivals").await?;
        let other_plan = ctx.create_plan(&other, 1, 900).await?;
        ctx.add_member(&other, "Asha Duplicate", other_plan).await?;

        let (status, body) = request(
            ctx.router(),
            Method::GET,
            "/members/searched-members?searchTerm=Asha",
            Some(&token),
            None,
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalMembers"], 1);
        assert_eq!(body["members"][0]["name"], "Asha Verma");
        Ok(())
    }

    #[tokio::test]
    async fn status_can_be_toggled_between_active_and_pending() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let plan_id = ctx.create_plan(&token, 1, 900).await?;
        let member = ctx.add_member(&token, "Asha Verma", plan_id).await?;
        let member_id = member["id"].as_i64().unwrap_or_default();

        let (status, body) = request(
            ctx.router(),
            Method::POST,
            &format!("/members/change-status/{member_id}"),
            Some(&token),
            Some(json!({ "status": "Pending" })),
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["member"]["status"], "Pending");

        let (status, _) = request(
            ctx.router(),
            Method::POST,
            "/members/change-status/9999",
            Some(&token),
            Some(json!({ "status": "Active" })),
        )
        .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn plan_renewal_reapplies_a_plan_and_reactivates() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let short_plan = ctx.create_plan(&token, 1, 900).await?;
        let long_plan = ctx.create_plan(&token, 12, 9000).await?;

        let member = ctx.add_member(&token, "Asha Verma", short_plan).await?;
        let member_id = member["id"].as_i64().unwrap_or_default();

        request(
            ctx.router(),
            Method::POST,
            &format!("/members/change-status/{member_id}"),
            Some(&token),
            Some(json!({ "status": "Pending" })),
        )
        .await?;

        let (status, body) = request(
            ctx.router(),
            Method::PUT,
            &format!("/members/update-member-plan/{member_id}"),
            Some(&token),
            Some(json!({ "membership": long_plan })),
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["member"]["membershipId"].as_i64(), Some(long_plan));
        assert_eq!(body["member"]["status"], "Active");
        Ok(())
    }

    #[tokio::test]
    async fn members_are_invisible_across_gyms() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let plan_id = ctx.create_plan(&token, 1, 900).await?;
        let member = ctx.add_member(&token, "Asha Verma", plan_id).await?;
        let member_id = member["id"].as_i64().unwrap_or_default();

        let other = ctx.register_and_login("rivals").await?;
        let (status, _) = request(
            ctx.router(),
            Method::GET,
            &format!("/members/get-member/{member_id}"),
            Some(&other),
            None,
        )
        .await?;

        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }
}

mod diet_plan_tests {
    use super::*;

    #[tokio::test]
    async fn stored_total_is_recomputed_from_the_meals() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;

        // totalCalories 0 in the payload; 450 + 700 from the meals wins.
        let plan = ctx.add_diet_plan(&token, "lean bulk").await?;
        assert_eq!(plan["totalCalories"], 1150);
        Ok(())
    }

    #[tokio::test]
    async fn empty_meals_and_negative_calories_are_rejected() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;

        let (status, _) = request(
            ctx.router(),
            Method::POST,
            "/diet-plan/add",
            Some(&token),
            Some(json!({
                "planName": "empty",
                "description": "no meals",
                "meals": [],
                "totalCalories": 0,
            })),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = request(
            ctx.router(),
            Method::POST,
            "/diet-plan/add",
            Some(&token),
            Some(json!({
                "planName": "negative",
                "description": "bad meal",
                "meals": [{ "mealName": "breakfast", "description": "oats", "calories": -10 }],
                "totalCalories": 0,
            })),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = request(
            ctx.router(),
            Method::POST,
            "/diet-plan/add",
            Some(&token),
            Some(json!({
                "planName": "negative total",
                "description": "bad total",
                "meals": [{ "mealName": "breakfast", "description": "oats", "calories": 450 }],
                "totalCalories": -5,
            })),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM diet_plans")
            .fetch_one(ctx.pool())
            .await?;
        assert_eq!(rows, 0);
        Ok(())
    }

    #[tokio::test]
    async fn update_with_new_meals_recomputes_the_total() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let plan = ctx.add_diet_plan(&token, "lean bulk").await?;
        let plan_id = plan["id"].as_i64().unwrap_or_default();

        let (status, body) = request(
            ctx.router(),
            Method::PUT,
            &format!("/diet-plan/update/{plan_id}"),
            Some(&token),
            Some(json!({
                "meals": [{ "mealName": "dinner", "description": "salmon", "calories": 600 }],
            })),
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dietPlan"]["totalCalories"], 600);
        assert_eq!(body["dietPlan"]["meals"].as_array().map(Vec::len), Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn update_total_without_meals_leaves_the_stored_total() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let plan = ctx.add_diet_plan(&token, "lean bulk").await?;
        let plan_id = plan["id"].as_i64().unwrap_or_default();

        let (status, body) = request(
            ctx.router(),
            Method::PUT,
            &format!("/diet-plan/update/{plan_id}"),
            Some(&token),
            Some(json!({ "totalCalories": 42, "description": "still lean" })),
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dietPlan"]["totalCalories"], 1150);
        assert_eq!(body["dietPlan"]["description"], "still lean");
        Ok(())
    }

    #[tokio::test]
    async fn delete_returns_the_removed_plan() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let plan = ctx.add_diet_plan(&token, "lean bulk").await?;
        let plan_id = plan["id"].as_i64().unwrap_or_default();

        let (status, body) = request(
            ctx.router(),
            Method::DELETE,
            &format!("/diet-plan/delete/{plan_id}"),
            Some(&token),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dietPlan"]["planName"], "lean bulk");

        let (status, _) = request(
            ctx.router(),
            Method::GET,
            &format!("/diet-plan/get-plan/{plan_id}"),
            Some(&token),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn diet_plans_are_invisible_across_gyms() -> TestResult {
        let ctx = TestContext::new().await?;
        let token = ctx.register_and_login("ironworks").await?;
        let plan = ctx.add_diet_plan(&token, "lean bulk").await?;
        let plan_id = plan["id"].as_i64().unwrap_or_default();

        let other = ctx.register_and_login("rivals").await?;
        let (status, _) = request(
            ctx.router(),
            Method::GET,
            &format!("/diet-plan/get-plan/{plan_id}"),
            Some(&other),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, listing) =
            request(ctx.router(), Method::GET, "/diet-plan/all", Some(&other), None).await?;
        assert_eq!(listing["totalDietPlans"], 0);
        Ok(())
    }
}

mod password_reset_tests {
    use super::*;

    async fn store_reset_code(
        ctx: &TestContext,
        email: &str,
        code: i64,
        expires_at: chrono::DateTime<Utc>,
    ) -> TestResult {
        sqlx::query("UPDATE gyms SET reset_code = ?, reset_code_expires_at = ? WHERE email = ?")
            .bind(code)
            .bind(expires_at.to_rfc3339())
            .bind(email)
            .execute(ctx.pool())
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn send_otp_reports_unknown_emails_as_not_found() -> TestResult {
        let ctx = TestContext::new().await?;
        let (status, body) = request(
            ctx.router(),
            Method::POST,
            "/auth/reset-password/sendOtp",
            None,
            Some(json!({ "email": "ghost@example.com" })),
        )
        .await?;

        // The mailer is not configured in tests, so this surfaces the mail
        // error before touching the account table.
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "failed to send OTP email");
        Ok(())
    }

    #[tokio::test]
    async fn check_otp_accepts_a_matching_unexpired_code() -> TestResult {
        let ctx = TestContext::new().await?;
        ctx.register("ironworks").await?;
        store_reset_code(
            &ctx,
            "ironworks@example.com",
            123_456,
            Utc::now() + Duration::hours(1),
        )
        .await?;

        let (status, body) = request(
            ctx.router(),
            Method::POST,
            "/auth/reset-password/checkOtp",
            None,
            Some(json!({ "email": "ironworks@example.com", "otp": "123456" })),
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "OTP verified successfully");
        Ok(())
    }

    #[tokio::test]
    async fn check_otp_rejects_wrong_expired_and_unparsable_codes() -> TestResult {
        let ctx = TestContext::new().await?;
        ctx.register("ironworks").await?;
        store_reset_code(
            &ctx,
            "ironworks@example.com",
            123_456,
            Utc::now() + Duration::hours(1),
        )
        .await?;

        for otp in ["654321", "not-a-number"] {
            let (status, body) = request(
                ctx.router(),
                Method::POST,
                "/auth/reset-password/checkOtp",
                None,
                Some(json!({ "email": "ironworks@example.com", "otp": otp })),
            )
            .await?;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "OTP is invalid or has expired");
        }

        store_reset_code(
            &ctx,
            "ironworks@example.com",
            123_456,
            Utc::now() - Duration::seconds(1),
        )
        .await?;

        let (status, body) = request(
            ctx.router(),
            Method::POST,
            "/auth/reset-password/checkOtp",
            None,
            Some(json!({ "email": "ironworks@example.com", "otp": "123456" })),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "OTP is invalid or has expired");
        Ok(())
    }

    #[tokio::test]
    async fn reset_password_replaces_credentials_and_clears_the_code() -> TestResult {
        let ctx = TestContext::new().await?;
        ctx.register("ironworks").await?;
        store_reset_code(
            &ctx,
            "ironworks@example.com",
            123_456,
            Utc::now() + Duration::hours(1),
        )
        .await?;

        let (status, _) = request(
            ctx.router(),
            Method::POST,
            "/auth/reset-password",
            None,
            Some(json!({ "email": "ironworks@example.com", "newPassword": "n3w-passw0rd" })),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);

        let stored_code: Option<i64> =
            sqlx::query_scalar("SELECT reset_code FROM gyms WHERE email = ?")
                .bind("ironworks@example.com")
                .fetch_one(ctx.pool())
                .await?;
        assert!(stored_code.is_none());

        let (old_status, _) = request(
            ctx.router(),
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "userName": "ironworks", "password": PASSWORD })),
        )
        .await?;
        assert_eq!(old_status, StatusCode::UNAUTHORIZED);

        let (new_status, _) = request(
            ctx.router(),
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "userName": "ironworks", "password": "n3w-passw0rd" })),
        )
        .await?;
        assert_eq!(new_status, StatusCode::OK);
        Ok(())
    }
}
