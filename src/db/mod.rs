//! # 저장소 계층 (Storage Backend)
//!
//! 라우트 핸들러(routes/)는 `DocumentStore` 트레이트만 알고,
//! 실제 저장 기술(관계형 테이블 또는 문서 컬렉션)은 시작 시점에 설정으로 결정됩니다.
//!
//! 각 하위 모듈:
//! - `sqlite`: `documents` 테이블을 쓰는 SQLite 구현 (정수 id)
//! - `mongo`: `documents` 컬렉션을 쓰는 MongoDB 구현 (ObjectId 문자열 id)
//! - `seed`: 빈 저장소에 넣는 초기 문서

pub mod mongo;
pub mod seed;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use crate::config::StorageConfig;
use crate::error::AppError;
use crate::models::{Document, DocumentPatch, NewDocument};

pub use mongo::MongoStore;
pub use seed::seed_if_empty;
pub use sqlite::SqliteStore;

/// 문서 저장소가 제공해야 하는 기능 집합
///
/// 모든 메서드는 저장소와의 왕복 한 번(또는 존재 확인 + 쓰기)으로 끝나며,
/// 트랜잭션이나 캐시는 없습니다. 같은 문서를 동시에 수정하면 마지막 쓰기가 이깁니다.
///
/// `id`는 문자열로 받습니다. 백엔드 형식에 맞지 않는 id(예: SQLite에 `"abc"`)는
/// 에러가 아니라 "없음"으로 처리합니다.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 전체 문서를 `createdAt` 내림차순(최신 먼저)으로 반환합니다.
    async fn list_documents(&self) -> Result<Vec<Document>, AppError>;

    /// - `Ok(Some(doc))`: 찾음
    /// - `Ok(None)`: 해당 id의 문서가 없음
    async fn get_document(&self, id: &str) -> Result<Option<Document>, AppError>;

    /// `id`와 `createdAt`을 부여하여 저장하고, 저장된 전체 레코드를 반환합니다.
    async fn create_document(&self, input: &NewDocument) -> Result<Document, AppError>;

    /// 패치에 포함된 필드만 바꿉니다.
    ///
    /// 문서가 없으면 아무것도 쓰지 않고 `Ok(None)`을 반환합니다.
    /// 빈 패치는 쓰기 없이 현재 레코드를 반환합니다.
    async fn update_document(
        &self,
        id: &str,
        patch: &DocumentPatch,
    ) -> Result<Option<Document>, AppError>;

    /// 문서를 삭제합니다. 없는 id를 지워도 에러가 아닙니다.
    ///
    /// 실제로 삭제된 레코드가 있으면 `true`를 반환합니다.
    async fn delete_document(&self, id: &str) -> Result<bool, AppError>;

    /// 로그와 헬스체크에 표시할 백엔드 이름
    fn backend_name(&self) -> &'static str;

    /// 종료 시 연결을 정리합니다.
    async fn close(&self) {}
}

/// 설정에 맞는 저장소를 열어 공유 가능한 핸들로 반환합니다.
///
/// 프로세스 시작 시 한 번만 호출되며, 반환된 `Arc`를 모든 요청이 함께 씁니다.
pub async fn connect(storage: &StorageConfig) -> Result<Arc<dyn DocumentStore>, AppError> {
    let store: Arc<dyn DocumentStore> = match storage {
        StorageConfig::Sqlite { database_url } => {
            Arc::new(SqliteStore::connect(database_url).await?)
        }
        StorageConfig::Mongo { uri, database } => {
            Arc::new(MongoStore::connect(uri, database).await?)
        }
    };

    tracing::info!("Using {} document store", store.backend_name());
    Ok(store)
}

/// 새 문서의 `createdAt` 값
///
/// 밀리초 고정 자릿수의 UTC 형식이라 문자열 정렬이 곧 시간순 정렬입니다.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
