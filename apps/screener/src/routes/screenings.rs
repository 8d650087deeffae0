use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::export::shortlist_csv;
use crate::models::record::Recommendation;
use crate::pipeline::{write_text, RunSummary};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ScreeningRequest {
    pub job_description: String,
}

#[derive(Serialize)]
pub struct ScreeningResponse {
    pub summary: RunSummary,
    pub shortlist: Vec<Recommendation>,
}

/// POST /api/v1/screenings
/// Stores the job description, runs every stage over the resume folder and
/// returns the run summary with the new shortlist.
pub async fn handle_create_screening(
    State(state): State<AppState>,
    Json(req): Json<ScreeningRequest>,
) -> Result<Json<ScreeningResponse>, AppError> {
    let jd = req.job_description.trim();
    if jd.is_empty() {
        return Err(AppError::Validation(
            "job_description must not be empty".to_string(),
        ));
    }

    let _guard = state.run_lock.lock().await;
    write_text(&state.pipeline.paths().job_description, jd).await?;
    let summary = state.pipeline.run_pipeline().await?;
    let shortlist = state.pipeline.load_shortlist().await?;
    info!(
        "Screening {} shortlisted {} of top {}",
        summary.run_id,
        shortlist.len(),
        state.pipeline.shortlist_size()
    );

    Ok(Json(ScreeningResponse { summary, shortlist }))
}

/// GET /api/v1/shortlist
pub async fn handle_get_shortlist(
    State(state): State<AppState>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    Ok(Json(state.pipeline.load_shortlist().await?))
}

/// GET /api/v1/shortlist.csv
pub async fn handle_get_shortlist_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let shortlist = state.pipeline.load_shortlist().await?;
    let body = shortlist_csv(&shortlist)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shortlist.csv\"",
            ),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::pipeline::Pipeline;
    use crate::routes::build_router;
    use crate::state::AppState;

    fn app(dir: &TempDir) -> axum::Router {
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        build_router(AppState::new(Pipeline::from_config(&config)))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_screening(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/screenings")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_shortlist_before_any_run_is_missing_input() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir)
            .oneshot(Request::get("/api/v1/shortlist").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "MISSING_INPUT");
    }

    #[tokio::test]
    async fn test_blank_job_description_is_rejected() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir)
            .oneshot(post_screening(r#"{"job_description": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_screening_over_empty_folder_then_csv() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("resumes")).unwrap();

        let response = app(&dir)
            .oneshot(post_screening(
                r#"{"job_description": "Python and SQL engineer"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["summary"]["stages"].as_array().unwrap().len(), 5);
        assert_eq!(body["shortlist"], Value::Array(vec![]));
        let jd = std::fs::read_to_string(
            dir.path().join("job_descriptions/job_description.txt"),
        )
        .unwrap();
        assert_eq!(jd, "Python and SQL engineer");

        let response = app(&dir)
            .oneshot(
                Request::get("/api/v1/shortlist.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/csv; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).starts_with("Candidate,Email"));
    }
}
