//! # 라우트 핸들러 모듈
//!
//! - `documents`: 문서 CRUD 핸들러와 공유 상태(`AppState`)
//! - `health`: 서버 상태 확인

pub mod documents;
pub mod health;

pub use documents::*;
pub use health::*;

use axum::{routing::get, Router};

/// API 라우터를 구성합니다.
///
/// 미들웨어(CORS, 로깅)와 정적 파일 서빙은 `main`에서 덧붙입니다.
/// axum 0.8부터 경로 파라미터는 `{id}` 문법을 사용합니다.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route(
            "/documents/{id}",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/health", get(health_check))
        .with_state(state)
}
