pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction Config API
        .route(
            "/api/v1/extraction-configs",
            get(handlers::handle_list).post(handlers::handle_create),
        )
        .route(
            "/api/v1/extraction-configs/preview",
            post(handlers::handle_preview),
        )
        .route(
            "/api/v1/extraction-configs/normalize-key",
            post(handlers::handle_normalize_key),
        )
        .route(
            "/api/v1/extraction-configs/:id",
            get(handlers::handle_get).delete(handlers::handle_delete),
        )
        .route(
            "/api/v1/extraction-configs/:id/prompt",
            get(handlers::handle_get_prompt),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::extraction::store::memory::MemoryConfigStore;

    fn test_router() -> Router {
        build_router(AppState {
            store: Arc::new(MemoryConfigStore::default()),
        })
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(b) => Body::from(b.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn v1_config() -> Value {
        json!({
            "version": "v1",
            "name": "Detailed Config",
            "description": "Detailed resume extraction config",
            "fields": [{
                "label": "Email Address",
                "required": true,
                "default_value": "unknown",
                "validation_schema": {
                    "rules": [{"type": "regex", "rule": {"pattern": "^\\S+@\\S+$"}}]
                },
                "output_schema": {"data_type": "string", "format": "email"}
            }]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&test_router(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_then_fetch_prompt() {
        let router = test_router();
        let user = Uuid::new_v4();

        let (status, created) = send(
            &router,
            Method::POST,
            "/api/v1/extraction-configs",
            Some(json!({"user_id": user, "name": "Sales", "config": v1_config()})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["record"]["id"].as_str().unwrap().to_string();
        assert!(created["record"]["prompt"]
            .as_str()
            .unwrap()
            .contains("• **Email Address** (`email_address`)"));

        let (status, prompt) = send(
            &router,
            Method::GET,
            &format!("/api/v1/extraction-configs/{id}/prompt"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(prompt["prompt"], created["record"]["prompt"]);
        assert_eq!(prompt["field_keys"], json!(["email_address"]));

        let (status, listed) = send(
            &router,
            Method::GET,
            &format!("/api/v1/extraction-configs?user_id={user}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_version_is_rejected_loudly() {
        let (status, body) = send(
            &test_router(),
            Method::POST,
            "/api/v1/extraction-configs/preview",
            Some(json!({"config": {"version": "v9", "fields": []}})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_CONFIG");
        assert!(body["error"]["message"].as_str().unwrap().contains("v9"));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let router = test_router();
        let (_, created) = send(
            &router,
            Method::POST,
            "/api/v1/extraction-configs",
            Some(json!({"user_id": Uuid::new_v4(), "name": "Ops", "config": v1_config()})),
        )
        .await;
        let uri = format!(
            "/api/v1/extraction-configs/{}",
            created["record"]["id"].as_str().unwrap()
        );

        let (status, _) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_normalize_key_endpoint() {
        let (status, body) = send(
            &test_router(),
            Method::POST,
            "/api/v1/extraction-configs/normalize-key",
            Some(json!({"label": "  Years of Experience (total) "})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], "years_of_experience_total");
    }
}
