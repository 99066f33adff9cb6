//! # 에러 처리 모듈
//!
//! 요청 처리 중 발생할 수 있는 모든 에러를 `AppError` 하나로 모으고,
//! `IntoResponse` 구현으로 HTTP 응답에 매핑합니다.
//!
//! | 에러 | 상태 코드 | 본문 |
//! |---|---|---|
//! | `NotFound` | 404 | `{"message": "Document not found"}` |
//! | `Validation` | 400 | `{"message": ..., "field": ...}` |
//! | `Database` / `Mongo` / `Internal` | 500 | `{"message": "Internal Server Error"}` |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::ValidationError;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 문서가 없음 (HTTP 404)
    #[error("Document not found")]
    NotFound,

    /// 요청 본문 검증 실패 (HTTP 400)
    /// #[from]: ValidationError에 `?`를 쓰면 자동으로 AppError::Validation이 됩니다.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 관계형 백엔드(SQLite) 오류 (HTTP 500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 문서 저장소 백엔드(MongoDB) 오류 (HTTP 500)
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// 그 밖의 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    /// 내부 에러(Database, Mongo, Internal)는 실제 원인을 로그에만 남기고
    /// 클라이언트에는 일반 메시지만 돌려줍니다.
    fn into_response(self) -> Response {
        // match: 모든 variant를 빠짐없이 처리해야 합니다 (exhaustive).
        // ref: 값을 이동하지 않고 참조로 빌려와 self를 계속 쓸 수 있게 합니다.
        let (status, body) = match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "message": self.to_string() }),
            ),
            // 처음 실패한 필드 하나만 `field`로 알려줍니다.
            AppError::Validation(ref e) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": e.to_string(), "field": e.field() }),
            ),
            // 내부 에러는 원인을 로그에만 남깁니다.
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                internal_error()
            }
            AppError::Mongo(ref e) => {
                tracing::error!("MongoDB error: {}", e);
                internal_error()
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                internal_error()
            }
        };

        // (StatusCode, Json<Value>) 튜플은 axum이 상태 코드 + JSON 본문 응답으로 변환합니다.
        (status, Json(body)).into_response()
    }
}

fn internal_error() -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "Internal Server Error" }),
    )
}
