pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::generation::handlers as generation;
use crate::reports::handlers as reports;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("The requested resource does not exist".to_string())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Generation
        .route("/api/generate", post(generation::handle_generate))
        // Reports
        .route(
            "/api/reports",
            post(reports::handle_create_report).get(reports::handle_list_reports),
        )
        .route(
            "/api/reports/:id",
            get(reports::handle_get_report).delete(reports::handle_delete_report),
        )
        .route("/api/reports/:id/text", get(reports::handle_export_report))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::generation::generator::tests::{service, ScriptedProvider, GOOD_JSON};
    use crate::llm_client::LlmError;
    use crate::models::report::{NewReport, Report};
    use crate::reports::memory::InMemoryReportStore;
    use crate::reports::pagination::{PageRequest, ReportPage};
    use crate::reports::store::{ReportFilter, ReportStore};

    fn app_with(store: Arc<dyn ReportStore>, outcomes: Vec<Result<String, LlmError>>) -> Router {
        build_router(AppState {
            store,
            generator: service(ScriptedProvider::new(outcomes)),
        })
    }

    fn app() -> Router {
        app_with(Arc::new(InMemoryReportStore::new()), vec![])
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response: Response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Sends a raw body, optionally without a content type, and decodes the JSON reply.
    async fn send_raw(app: &Router, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::POST).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let response = app
            .clone()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn assert_validation_envelope(status: StatusCode, body: &Value) {
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    fn report_body(store_category: &str) -> Value {
        json!({
            "situation": "週末人潮眾多",
            "task": "維持櫃位秩序",
            "action": "調度同事支援",
            "result": "客訴為零",
            "competency": "teamwork",
            "storeCategory": store_category,
            "originalStory": "那天週末人很多……"
        })
    }

    #[tokio::test]
    async fn test_filtered_listing_end_to_end() {
        let app = app();
        for category in ["skincare", "skincare", "skincare", "makeup", "makeup"] {
            let (status, body) = send(&app, Method::POST, "/api/reports", Some(report_body(category))).await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["success"], true);
        }

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/reports?storeCategory=skincare&page=1&limit=2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["pagination"]["total"], 3);
        assert_eq!(body["pagination"]["pages"], 2);
        assert_eq!(body["pagination"]["page"], 1);
        assert_eq!(body["pagination"]["limit"], 2);
        assert!(body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|r| r["storeCategory"] == "skincare"));
    }

    #[tokio::test]
    async fn test_listing_defaults_and_clamping() {
        let app = app();
        send(&app, Method::POST, "/api/reports", Some(report_body("home"))).await;

        let (_, body) = send(&app, Method::GET, "/api/reports", None).await;
        assert_eq!(body["pagination"]["page"], 1);
        assert_eq!(body["pagination"]["limit"], 10);

        let (status, body) = send(&app, Method::GET, "/api/reports?page=-2&limit=abc&competency=", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["page"], 1);
        assert_eq!(body["pagination"]["limit"], 10);
        assert_eq!(body["pagination"]["total"], 1);

        let (_, body) = send(&app, Method::GET, "/api/reports?page=9", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
        assert_eq!(body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn test_listing_with_unknown_filter_is_bad_request() {
        let (status, body) = send(&app(), Method::GET, "/api/reports?competency=bravery", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_validation_error_names_fields() {
        let app = app();
        let mut body = report_body("skincare");
        body["competency"] = json!("bravery");
        body["task"] = json!("   ");

        let (status, response) = send(&app, Method::POST, "/api/reports", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = response["error"].as_str().unwrap();
        assert!(error.contains("task is required"));
        assert!(error.contains("competency 'bravery'"));

        let (_, listing) = send(&app, Method::GET, "/api/reports", None).await;
        assert_eq!(listing["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn test_get_and_delete_by_id() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/reports", Some(report_body("toys"))).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, Method::GET, &format!("/api/reports/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], id.as_str());
        assert_eq!(body["data"]["name"], "未命名報告");
        assert_eq!(body["data"]["storeCategory"], "toys");

        let (status, body) = send(&app, Method::DELETE, &format!("/api/reports/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = send(&app, Method::GET, &format!("/api/reports/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(&app, Method::DELETE, &format!("/api/reports/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_report_as_plain_text() {
        let app = app();
        let (_, created) = send(&app, Method::POST, "/api/reports", Some(report_body("fragrance"))).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let request = Request::builder()
            .uri(format!("/api/reports/{id}/text"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("行動 (Action):\n調度同事支援"));
        assert!(text.contains("類別: 香水香氛"));
        assert!(text.contains("職能: 團隊共贏"));
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let (status, _) = send(&app(), Method::GET, "/api/reports/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_returns_result_without_raw_response() {
        let app = app_with(Arc::new(InMemoryReportStore::new()), vec![Ok(GOOD_JSON.to_string())]);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate",
            Some(json!({"story": "我幫旅客找替代品", "competency": "service", "storeCategory": "skincare"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["situation"], "旅客趕登機");
        assert_eq!(body["data"]["storeCategory"], "skincare");
        assert_eq!(body["data"]["originalStory"], "我幫旅客找替代品");
        assert!(body.get("rawResponse").is_none());
    }

    #[tokio::test]
    async fn test_generate_degraded_includes_raw_response() {
        let app = app_with(
            Arc::new(InMemoryReportStore::new()),
            vec![Ok("I cannot comply with that format.".to_string())],
        );
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate",
            Some(json!({"story": "s", "competency": "integrity", "storeCategory": "makeup"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rawResponse"], "I cannot comply with that format.");
        assert_eq!(body["data"]["situation"], "I cannot comply with that format.");
        assert_eq!(body["data"]["task"], "");
    }

    #[tokio::test]
    async fn test_generate_missing_fields_is_bad_request() {
        let (status, body) = send(&app(), Method::POST, "/api/generate", Some(json!({"story": "s"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("storeCategory"));
    }

    #[tokio::test]
    async fn test_generate_provider_failure_is_server_error() {
        let app = app_with(
            Arc::new(InMemoryReportStore::new()),
            vec![Err(LlmError::Api {
                status: 500,
                code: None,
                message: "upstream exploded".to_string(),
            })],
        );
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate",
            Some(json!({"story": "s", "competency": "integrity", "storeCategory": "makeup"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "GENERATION_ERROR");
        assert!(body["error"].as_str().unwrap().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_wrong_field_type_gets_json_envelope() {
        let app = app();
        let (status, body) = send_raw(
            &app,
            "/api/generate",
            Some("application/json"),
            r#"{"story":5,"competency":"service","storeCategory":"home"}"#,
        )
        .await;
        assert_validation_envelope(status, &body);

        let (status, body) = send_raw(
            &app,
            "/api/reports",
            Some("application/json"),
            r#"{"situation":["s"],"task":"t","action":"a","result":"r","competency":"service","storeCategory":"home"}"#,
        )
        .await;
        assert_validation_envelope(status, &body);
    }

    #[tokio::test]
    async fn test_malformed_json_gets_json_envelope() {
        let app = app();
        for uri in ["/api/generate", "/api/reports"] {
            let (status, body) = send_raw(&app, uri, Some("application/json"), r#"{"story": "s","#).await;
            assert_validation_envelope(status, &body);
        }
    }

    #[tokio::test]
    async fn test_missing_content_type_gets_json_envelope() {
        let app = app();
        let payload = json!({"story": "s", "competency": "service", "storeCategory": "home"}).to_string();
        for uri in ["/api/generate", "/api/reports"] {
            let (status, body) = send_raw(&app, uri, None, &payload).await;
            assert_validation_envelope(status, &body);
        }

        let (_, listing) = send(&app, Method::GET, "/api/reports", None).await;
        assert_eq!(listing["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn test_unsupported_method_gets_json_envelope() {
        let app = app();
        let (status, body) = send(&app, Method::PUT, "/api/reports", Some(report_body("home"))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "METHOD_NOT_ALLOWED");

        let (status, body) = send(&app, Method::GET, "/api/generate", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
    }

    /// A store whose every operation fails, standing in for a database outage.
    struct DownStore;

    #[async_trait]
    impl ReportStore for DownStore {
        async fn insert(&self, _report: NewReport) -> Result<Uuid, AppError> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn get_by_id(&self, _id: Uuid) -> Result<Option<Report>, AppError> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn delete(&self, _id: Uuid) -> Result<bool, AppError> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn list(&self, _filter: &ReportFilter, _page: PageRequest) -> Result<ReportPage, AppError> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn test_store_outage_does_not_block_generation() {
        let app = app_with(Arc::new(DownStore), vec![Ok(GOOD_JSON.to_string())]);

        let (status, body) = send(&app, Method::GET, "/api/reports", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "DATABASE_ERROR");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate",
            Some(json!({"story": "s", "competency": "service", "storeCategory": "home"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_banner_health_and_fallback() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(&app, Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
}
