//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /health` → `{ "status": "ok", "backend": "sqlite" }`

use axum::{extract::State, Json};
use serde_json::{json, Value};

use super::AppState;

/// `GET /health` — 서버 상태와 활성 저장소 백엔드를 반환합니다.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": state.store.backend_name()
    }))
}
