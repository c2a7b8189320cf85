//! Plan endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use super::state::AppState;
use super::types::{ApiError, Json, Path};
use crate::domain::{DomainError, NewPlan, Plan, PlanId, RequestContext};

/// Body of `POST /plans` and `PUT /plans/{id}`.
///
/// `premium` may be sent as a JSON string (`"99.99"`) or number.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanPayload {
    pub code: String,
    pub name: String,
    pub premium: Decimal,
}

impl PlanPayload {
    fn into_draft(self) -> Result<NewPlan, ApiError> {
        NewPlan::new(self.code, self.name, self.premium)
            .map_err(|e| ApiError::from(DomainError::from(e)))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans).post(create_plan))
        .route(
            "/plans/{id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
}

fn parse_id(raw: &str) -> Result<PlanId, ApiError> {
    raw.parse::<PlanId>()
        .map_err(|e| ApiError::from(DomainError::from(e)))
}

pub async fn create_plan(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<PlanPayload>,
) -> Result<(StatusCode, Json<Plan>), ApiError> {
    info!(request_id = %ctx.request_id(), code = %payload.code, "API: create plan");

    let draft = payload.into_draft()?;
    let plan = state.plan_service.create(&ctx, draft).await?;

    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn get_plan(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Plan>, ApiError> {
    info!(request_id = %ctx.request_id(), id = %id, "API: get plan");

    let id = parse_id(&id)?;
    let plan = state.plan_service.get(&ctx, id).await?;

    Ok(Json(plan))
}

pub async fn update_plan(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<PlanPayload>,
) -> Result<Json<Plan>, ApiError> {
    info!(request_id = %ctx.request_id(), id = %id, "API: update plan");

    let id = parse_id(&id)?;
    let plan = Plan::new(id, payload.into_draft()?);
    let updated = state.plan_service.update(&ctx, &plan).await?;

    Ok(Json(updated))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!(request_id = %ctx.request_id(), id = %id, "API: delete plan");

    let id = parse_id(&id)?;
    state.plan_service.delete(&ctx, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_plans(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<Plan>>, ApiError> {
    info!(request_id = %ctx.request_id(), "API: list plans");

    let plans = state.plan_service.list(&ctx).await?;

    Ok(Json(plans))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::{state_with, MockPlanServiceTrait, MockUserServiceTrait};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(plans: MockPlanServiceTrait) -> Router {
        routes().with_state(state_with(MockUserServiceTrait::new(), plans))
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn created(plans: &mut MockPlanServiceTrait) {
        plans
            .expect_create()
            .times(1)
            .returning(|_, draft| Ok(Plan::new(PlanId::new(1).unwrap(), draft)));
    }

    #[tokio::test]
    async fn test_create_plan_with_string_premium() {
        let mut plans = MockPlanServiceTrait::new();
        created(&mut plans);

        let response = app(plans)
            .oneshot(json_request(
                "POST",
                "/plans",
                r#"{"code":"BASIC","name":"Basic Plan","premium":"99.99"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({ "id": 1, "code": "BASIC", "name": "Basic Plan", "premium": "99.99" })
        );
    }

    #[tokio::test]
    async fn test_create_plan_with_numeric_premium() {
        let mut plans = MockPlanServiceTrait::new();
        created(&mut plans);

        let response = app(plans)
            .oneshot(json_request(
                "POST",
                "/plans",
                r#"{"code":"GOLD","name":"Gold Plan","premium":150}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["premium"], "150.00");
    }

    #[tokio::test]
    async fn test_create_plan_rejects_bad_premium() {
        for body in [
            r#"{"code":"BASIC","name":"Basic Plan","premium":"0"}"#,
            r#"{"code":"BASIC","name":"Basic Plan","premium":"-5.00"}"#,
            r#"{"code":"BASIC","name":"Basic Plan","premium":"1.005"}"#,
            r#"{"code":"BASIC","name":"Basic Plan","premium":"lots"}"#,
            r#"{"code":"","name":"Basic Plan","premium":"9.99"}"#,
            r#"{"code":"BASIC","premium":"9.99"}"#,
        ] {
            let response = app(MockPlanServiceTrait::new())
                .oneshot(json_request("POST", "/plans", body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
            assert!(body_json(response).await["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_get_plan_not_found() {
        let mut plans = MockPlanServiceTrait::new();
        plans
            .expect_get()
            .returning(|_, id| Err(DomainError::not_found(format!("Plan '{}' not found", id))));

        let response = app(plans)
            .oneshot(empty_request("GET", "/plans/12"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "not_found");
    }

    #[tokio::test]
    async fn test_get_plan_invalid_id() {
        for uri in ["/plans/one", "/plans/%FF"] {
            let response = app(MockPlanServiceTrait::new())
                .oneshot(empty_request("GET", uri))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);
            assert_eq!(body_json(response).await["code"], "invalid_id");
        }
    }

    #[tokio::test]
    async fn test_update_plan_uses_path_id() {
        let mut plans = MockPlanServiceTrait::new();
        plans
            .expect_update()
            .withf(|_, p| p.id().value() == 2 && p.premium() == Decimal::new(10999, 2))
            .times(1)
            .returning(|_, p| Ok(p.clone()));

        let response = app(plans)
            .oneshot(json_request(
                "PUT",
                "/plans/2",
                r#"{"id":9,"code":"BASIC","name":"Basic Plus","premium":"109.99"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], 2);
        assert_eq!(body["name"], "Basic Plus");
    }

    #[tokio::test]
    async fn test_delete_plan() {
        let mut plans = MockPlanServiceTrait::new();
        plans
            .expect_delete()
            .withf(|_, id| id.value() == 2)
            .times(1)
            .returning(|_, _| Ok(()));

        let response = app(plans)
            .oneshot(empty_request("DELETE", "/plans/2"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_timeout_is_internal_error() {
        let mut plans = MockPlanServiceTrait::new();
        plans.expect_list().returning(|_| {
            Err(DomainError::timeout(
                "list plans did not complete before the request deadline",
            ))
        });

        let response = app(plans)
            .oneshot(empty_request("GET", "/plans"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], "internal_error");
    }
}
