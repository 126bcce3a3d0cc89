use axum::Router;
use axum::routing::{get, post};
use mycosync_api::{CONTROL_PATH, DATA_PATH, SETTINGS_PATH};

use crate::handles::{get_data, post_control, post_settings};
use crate::state::MockState;

pub fn create_app(state: MockState) -> Router {
    Router::new()
        .route(DATA_PATH, get(get_data))
        .route(CONTROL_PATH, post(post_control))
        .route(SETTINGS_PATH, post(post_settings))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use mycosync_api::models::{Mode, Snapshot, SwitchState};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::state::Readings;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method(Method::POST)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_data_serves_pinned_readings() {
        let state = MockState::new().with_readings(Readings {
            temperature: 30.0,
            moisture: 65.0,
            ph: 6.8,
        });
        let app = create_app(state.clone());

        let request = Request::builder()
            .uri("/api/data")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let snapshot: Snapshot = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(snapshot.temperature, Some(30.0));
        assert_eq!(snapshot.thresholds.unwrap().temp_max, Some(26.0));
        assert_eq!(snapshot.status.unwrap().mode, Mode::Auto);
        assert_eq!(state.data_requests().await, 1);
    }

    #[tokio::test]
    async fn test_control_updates_status() {
        let state = MockState::new();
        let app = create_app(state.clone());

        let response = app
            .oneshot(post("/api/control", json!({ "fan": "ON", "mode": "MANUAL" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "success": true, "message": "Control updated" })
        );

        let status = state.status().await;
        assert_eq!(status.fan, SwitchState::On);
        assert_eq!(status.heater, SwitchState::Off);
        assert_eq!(status.mode, Mode::Manual);
        assert_eq!(state.commands().await.len(), 1);
    }

    #[tokio::test]
    async fn test_settings_update_thresholds() {
        let state = MockState::new();
        let app = create_app(state.clone());

        let response = app
            .oneshot(post("/api/settings", json!({ "moisture_min": 55.0 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let thresholds = state.thresholds().await;
        assert_eq!(thresholds.moisture_min, Some(55.0));
        assert_eq!(thresholds.moisture_max, Some(70.0));
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected() {
        let app = create_app(MockState::new());

        let request = Request::builder()
            .uri("/api/control")
            .method(Method::POST)
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_failure_mode() {
        let state = MockState::new();
        state.set_failure(Some(StatusCode::SERVICE_UNAVAILABLE)).await;
        let app = create_app(state.clone());

        let request = Request::builder()
            .uri("/api/data")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app
            .oneshot(post("/api/control", json!({ "heater": "ON" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(state.commands().await.is_empty());
    }
}
