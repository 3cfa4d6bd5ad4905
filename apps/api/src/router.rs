use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use doctor_cell::doctor_routes;
use patient_cell::patient_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .nest("/patient", patient_routes(state.clone()))
        .nest("/doctor", doctor_routes(state));

    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .route("/ping", get(|| async { "pong" }))
        .nest("/api", api)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use shared_utils::test_utils::TestContext;

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn ping_answers_pong() {
        let ctx = TestContext::new();
        let (status, body) = get(create_router(ctx.state.clone()), "/ping").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"pong");
    }

    #[tokio::test]
    async fn role_routers_are_nested_under_api() {
        let ctx = TestContext::new();
        let doctor = ctx.seed_doctor("Dr. Amit Verma").await;
        let patient = ctx.seed_patient("Rahul Sharma").await;

        let (status, body) = get(create_router(ctx.state.clone()), &format!("/api/doctor/profile/{}", doctor.id)).await;
        assert_eq!(status, StatusCode::OK);
        let profile: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(profile["role"], "doctor");

        let (status, _) = get(create_router(ctx.state.clone()), &format!("/api/patient/profile/{}", patient.id)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get(create_router(ctx.state.clone()), &format!("/api/patient/profile/{}", doctor.id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
