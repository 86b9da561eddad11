//! Serving API tests driven through the router with in-memory requests.

#![cfg(feature = "http-server")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use forecast_pipeline::forecaster::{ArtifactError, FittedModel, InferenceError, ModelArtifact};
use forecast_pipeline::http::{create_router, AppState};

/// Constant-forecast model that counts how often inference runs.
struct CountingModel {
    calls: Arc<AtomicUsize>,
}

impl FittedModel for CountingModel {
    fn predict(&self, n_periods: usize) -> Result<Vec<f64>, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if n_periods == 0 {
            return Err(InferenceError::EmptyHorizon);
        }
        Ok(vec![42.0; n_periods])
    }

    fn artifact(&self) -> Result<ModelArtifact, ArtifactError> {
        Ok(ModelArtifact {
            flavor: "test".to_string(),
            payload: serde_json::json!({}),
        })
    }

    fn describe(&self) -> String {
        "counting stub".to_string()
    }
}

/// Model whose inference always fails.
struct BrokenModel;

impl FittedModel for BrokenModel {
    fn predict(&self, _n_periods: usize) -> Result<Vec<f64>, InferenceError> {
        Err(InferenceError::NonFinite { step: 0 })
    }

    fn artifact(&self) -> Result<ModelArtifact, ArtifactError> {
        Ok(ModelArtifact {
            flavor: "test".to_string(),
            payload: serde_json::json!({}),
        })
    }

    fn describe(&self) -> String {
        "broken stub".to_string()
    }
}

fn test_app(model: Arc<dyn FittedModel>) -> axum::Router {
    create_router(AppState::new(
        model,
        "/registry/sales/versions/1/model.json".to_string(),
        "/registry".to_string(),
    ))
}

fn predict_request(n_periods: i64) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!("{{\"n_periods\": {}}}", n_periods)))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_model_and_tracking_uri() {
    let app = test_app(Arc::new(CountingModel {
        calls: Arc::new(AtomicUsize::new(0)),
    }));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_uri"], "/registry/sales/versions/1/model.json");
    assert_eq!(body["tracking_uri"], "/registry");
}

#[tokio::test]
async fn test_healthz_alias() {
    let app = test_app(Arc::new(CountingModel {
        calls: Arc::new(AtomicUsize::new(0)),
    }));

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_returns_requested_length() {
    let app = test_app(Arc::new(CountingModel {
        calls: Arc::new(AtomicUsize::new(0)),
    }));

    let response = app.oneshot(predict_request(5)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 5);
    assert!(predictions.iter().all(|v| v.as_f64() == Some(42.0)));
}

#[tokio::test]
async fn test_non_positive_horizon_rejected_before_inference() {
    for n in [0, -3] {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_app(Arc::new(CountingModel {
            calls: Arc::clone(&calls),
        }));

        let response = app.oneshot(predict_request(n)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0, "model invoked for n={}", n);

        let body = json_body(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "'n_periods' must be a positive integer");
    }
}

#[tokio::test]
async fn test_model_failure_is_bad_request_with_cause() {
    let app = test_app(Arc::new(BrokenModel));

    let response = app.oneshot(predict_request(5)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["code"], "INFERENCE_ERROR");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("model failed to predict with n_periods=5"));
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = test_app(Arc::new(CountingModel {
        calls: Arc::new(AtomicUsize::new(0)),
    }));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"horizon\": 5}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
