//! # SQLite 문서 저장소
//!
//! `documents` 테이블에 문서를 저장하는 관계형 백엔드입니다.
//! 스키마는 `migrations/`의 SQL 파일로 관리하며 연결 시 자동으로 적용됩니다.
//!
//! id는 `INTEGER PRIMARY KEY AUTOINCREMENT`로 부여되므로
//! 정수로 파싱할 수 없는 id는 곧바로 "없음"이 됩니다.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{now_timestamp, DocumentStore};
use crate::error::AppError;
use crate::models::{Document, DocumentId, DocumentPatch, NewDocument};

/// `documents` 테이블의 한 행
///
/// `DocumentId`는 백엔드마다 모양이 달라 `FromRow`로 직접 매핑할 수 없으므로,
/// 행을 먼저 이 구조체로 읽은 뒤 `Document`로 변환합니다.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: i64,
    title: String,
    content: String,
    category: String,
    order: i64,
    created_at: String,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: DocumentId::Serial(row.id),
            title: row.title,
            content: row.content,
            category: row.category,
            order: row.order,
            created_at: row.created_at,
        }
    }
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// 데이터베이스에 연결하고 마이그레이션을 실행합니다.
    ///
    /// 파일이 없으면 새로 만듭니다. `sqlite::memory:`는 연결이 닫히면 내용이 사라지므로
    /// 연결 하나를 계속 유지하도록 풀을 구성합니다.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        // from_str(): "sqlite:data/docs.db" 같은 URL을 연결 옵션으로 파싱합니다.
        // create_if_missing(true): DB 파일이 없으면 새로 만듭니다.
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        Self::from_pool(pool).await
    }

    /// 이미 만들어진 풀 위에 저장소를 구성합니다.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, AppError> {
        tracing::debug!("Running database migrations...");
        // sqlx::migrate!: 컴파일 타임에 ./migrations의 SQL 파일을 바이너리에 포함시키는 매크로
        // .run(): 아직 적용되지 않은 마이그레이션만 순서대로 실행합니다.
        // MigrateError → sqlx::Error → AppError::Database 순서로 변환됩니다.
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(sqlx::Error::from)?;
        Ok(Self { pool })
    }

    /// 테스트용 인메모리 저장소
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        Self::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite store")
    }

    async fn fetch(&self, id: i64) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, title, content, category, "order", created_at
            FROM documents
            WHERE id = ?
            "#,
        )
        // SQL의 `?` 자리에 id를 안전하게 바인딩합니다 (SQL 인젝션 방지).
        .bind(id)
        // fetch_optional(): 0행이면 None, 1행이면 Some(row)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }
}

/// 경로 파라미터를 정수 id로 해석합니다. 숫자가 아니면 `None`입니다.
fn parse_id(id: &str) -> Option<i64> {
    id.trim().parse().ok()
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list_documents(&self) -> Result<Vec<Document>, AppError> {
        // 같은 밀리초에 생성된 문서는 id(삽입 순서)로 최신을 가립니다.
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, title, content, category, "order", created_at
            FROM documents
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>, AppError> {
        match parse_id(id) {
            Some(id) => self.fetch(id).await,
            None => Ok(None),
        }
    }

    async fn create_document(&self, input: &NewDocument) -> Result<Document, AppError> {
        // sqlx::query(): 결과를 구조체로 매핑하지 않는 단순 실행 쿼리
        // `"order"`는 SQL 예약어라 큰따옴표로 감쌉니다.
        let result = sqlx::query(
            r#"
            INSERT INTO documents (title, content, category, "order", created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.category)
        .bind(input.order)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;

        // last_insert_rowid(): AUTOINCREMENT로 방금 부여된 id
        let id = result.last_insert_rowid();
        tracing::debug!(id, "Created document");

        self.fetch(id)
            .await?
            .ok_or(AppError::Internal("Failed to retrieve created document".to_string()))
    }

    async fn update_document(
        &self,
        id: &str,
        patch: &DocumentPatch,
    ) -> Result<Option<Document>, AppError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        // 쓰기 전에 존재 여부를 먼저 확인합니다.
        let Some(existing) = self.fetch(id).await? else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(existing));
        }

        // ── 동적 쿼리 구성 ──
        // 패치에 포함된 필드만 SET 절에 넣습니다.
        // 바인딩 값의 타입이 섞여 있으므로(문자열 + 정수) 문자열을 직접 이어 붙이는 대신
        // QueryBuilder를 씁니다. push_bind는 값 자리에 `?`를 넣고 값을 순서대로 기억합니다.
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE documents SET ");
        {
            // separated(", "): push할 때마다 앞에 ", "를 붙여 줍니다 (첫 항목 제외).
            // push_bind_unseparated(): 구분자 없이 바로 뒤에 `?`를 붙입니다.
            //   → "title = ?, category = ?"
            // 이 블록이 끝나면 fields가 빌려간 query를 돌려받습니다.
            let mut fields = query.separated(", ");
            if let Some(title) = &patch.title {
                fields.push("title = ").push_bind_unseparated(title);
            }
            if let Some(content) = &patch.content {
                fields.push("content = ").push_bind_unseparated(content);
            }
            if let Some(category) = &patch.category {
                fields.push("category = ").push_bind_unseparated(category);
            }
            if let Some(order) = patch.order {
                fields.push(r#""order" = "#).push_bind_unseparated(order);
            }
        }
        // WHERE 절 추가 (특정 문서만 수정)
        query.push(" WHERE id = ").push_bind(id);

        // build(): 완성된 SQL과 바인딩 값으로 실행 가능한 쿼리를 만듭니다.
        query.build().execute(&self.pool).await?;
        tracing::debug!(id, "Updated document");

        self.fetch(id).await
    }

    async fn delete_document(&self, id: &str) -> Result<bool, AppError> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        // rows_affected(): 삭제된 행이 있으면 true, 없는 id였으면 false
        Ok(result.rows_affected() > 0)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_of(doc: &Document) -> String {
        doc.id.to_string()
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let store = SqliteStore::in_memory().await;

        let input = NewDocument::new("Intro", "# Hi")
            .with_category("Guides")
            .with_order(4);
        let doc = store.create_document(&input).await.unwrap();

        assert!(matches!(doc.id, DocumentId::Serial(n) if n > 0));
        assert!(!doc.created_at.is_empty());
        assert_eq!(doc.title, "Intro");
        assert_eq!(doc.content, "# Hi");
        assert_eq!(doc.category, "Guides");
        assert_eq!(doc.order, 4);

        let fetched = store.get_document(&id_of(&doc)).await.unwrap();
        assert_eq!(fetched, Some(doc));
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = SqliteStore::in_memory().await;
        let a = store.create_document(&NewDocument::new("a", "a")).await.unwrap();
        let b = store.create_document(&NewDocument::new("b", "b")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn get_missing_or_malformed_id_is_none() {
        let store = SqliteStore::in_memory().await;
        assert_eq!(store.get_document("999999").await.unwrap(), None);
        assert_eq!(store.get_document("not-a-number").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = SqliteStore::in_memory().await;
        let a = store.create_document(&NewDocument::new("A", "first")).await.unwrap();
        let b = store.create_document(&NewDocument::new("B", "second")).await.unwrap();

        let docs = store.list_documents().await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let store = SqliteStore::in_memory().await;
        let doc = store
            .create_document(&NewDocument::new("Title", "Body").with_order(2))
            .await
            .unwrap();

        let patch = DocumentPatch {
            category: Some("X".into()),
            ..Default::default()
        };
        let updated = store
            .update_document(&id_of(&doc), &patch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.category, "X");
        assert_eq!(updated.title, doc.title);
        assert_eq!(updated.content, doc.content);
        assert_eq!(updated.order, doc.order);
        assert_eq!(updated.id, doc.id);
        assert_eq!(updated.created_at, doc.created_at);
    }

    #[tokio::test]
    async fn update_all_fields() {
        let store = SqliteStore::in_memory().await;
        let doc = store.create_document(&NewDocument::new("t", "c")).await.unwrap();

        let patch = DocumentPatch {
            title: Some("t2".into()),
            content: Some("c2".into()),
            category: Some("k2".into()),
            order: Some(7),
        };
        let updated = store
            .update_document(&id_of(&doc), &patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            (updated.title.as_str(), updated.content.as_str(), updated.category.as_str(), updated.order),
            ("t2", "c2", "k2", 7)
        );
    }

    #[tokio::test]
    async fn empty_patch_is_a_no_op() {
        let store = SqliteStore::in_memory().await;
        let doc = store.create_document(&NewDocument::new("t", "c")).await.unwrap();

        let same = store
            .update_document(&id_of(&doc), &DocumentPatch::default())
            .await
            .unwrap();
        assert_eq!(same, Some(doc));
    }

    #[tokio::test]
    async fn update_missing_is_none() {
        let store = SqliteStore::in_memory().await;
        let patch = DocumentPatch {
            title: Some("ghost".into()),
            ..Default::default()
        };
        assert_eq!(store.update_document("12345", &patch).await.unwrap(), None);
        assert_eq!(store.update_document("abc", &patch).await.unwrap(), None);
        assert!(store.list_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = SqliteStore::in_memory().await;
        let doc = store.create_document(&NewDocument::new("t", "c")).await.unwrap();
        let id = id_of(&doc);

        assert!(store.delete_document(&id).await.unwrap());
        assert!(!store.delete_document(&id).await.unwrap());
        assert!(!store.delete_document("garbage").await.unwrap());
        assert_eq!(store.get_document(&id).await.unwrap(), None);
    }
}
