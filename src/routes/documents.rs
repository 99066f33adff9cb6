//! # 문서(Document) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /documents`      → 문서 목록 (200)
//! - `POST   /documents`      → 새 문서 생성 (201, 검증 실패 시 400)
//! - `GET    /documents/{id}` → 단일 문서 조회 (200, 없으면 404)
//! - `PUT    /documents/{id}` → 문서 부분 수정 (200, 400, 404)
//! - `DELETE /documents/{id}` → 문서 삭제 (204, 없으면 404)
//!
//! ## 요청 본문 처리
//! 본문은 `Json<Value>`로 받아 `models`의 검증 함수에 넘깁니다.
//! `Result<Json<Value>, JsonRejection>`으로 받으면 JSON 파싱 실패도
//! 우리 에러 형식(`{"message", "field": "body"}`)으로 돌려줄 수 있습니다.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::{
    db::DocumentStore,
    error::AppError,
    models::{Document, DocumentPatch, NewDocument, ValidationError},
};

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 저장소는 `Arc`로 감싸져 있어 clone해도 같은 연결을 공유합니다.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

/// JSON 본문 추출 결과를 검증 가능한 값으로 바꿉니다.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ValidationError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))
}

/// `GET /documents` — 전체 문서 목록을 최신순 JSON 배열로 반환합니다.
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents = state.store.list_documents().await?;
    Ok(Json(documents))
}

/// `GET /documents/{id}` — 단일 문서를 조회합니다.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let document = state
        .store
        .get_document(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(document))
}

/// `POST /documents` — 본문을 검증한 뒤 새 문서를 만들고 201로 반환합니다.
pub async fn create_document(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let input = NewDocument::from_json(&json_body(body)?)?;
    let document = state.store.create_document(&input).await?;
    tracing::info!(id = %document.id, title = %document.title, "Document created");
    Ok((StatusCode::CREATED, Json(document)))
}

/// `PUT /documents/{id}` — 본문에 포함된 필드만 수정합니다.
///
/// 검사 순서: 본문 검증(400) → 존재 확인(404) → 수정.
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Document>, AppError> {
    let patch = DocumentPatch::from_json(&json_body(body)?)?;

    state
        .store
        .get_document(&id)
        .await?
        .ok_or(AppError::NotFound)?;

    // 확인과 수정 사이에 삭제된 경우에도 저장소가 None을 돌려주므로 404가 됩니다.
    let document = state
        .store
        .update_document(&id, &patch)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(document))
}

/// `DELETE /documents/{id}` — 문서를 삭제하고 204 No Content를 반환합니다.
///
/// 저장소의 삭제는 없는 id에도 성공하므로, 먼저 존재를 확인해 404를 돌려줍니다.
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .get_document(&id)
        .await?
        .ok_or(AppError::NotFound)?;

    state.store.delete_document(&id).await?;
    tracing::info!(%id, "Document deleted");

    Ok(StatusCode::NO_CONTENT)
}
