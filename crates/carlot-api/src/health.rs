use axum::Json;

use carlot_types::api::HealthResponse;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now(),
    })
}
