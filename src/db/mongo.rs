//! # MongoDB 문서 저장소
//!
//! `documents` 컬렉션에 문서를 저장하는 문서 지향 백엔드입니다.
//! 식별자는 MongoDB 고유의 `_id: ObjectId`이며, API에는 24자리 16진 문자열로 노출됩니다.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document as BsonDocument};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use super::{now_timestamp, DocumentStore};
use crate::error::AppError;
use crate::models::{Document, DocumentId, DocumentPatch, NewDocument};

const COLLECTION: &str = "documents";

/// 컬렉션에 저장되는 BSON 문서의 모양
#[derive(Debug, Serialize, Deserialize)]
struct DocumentRecord {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    content: String,
    category: String,
    order: i64,
    #[serde(rename = "createdAt")]
    created_at: String,
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        Document {
            id: DocumentId::Object(record.id.to_hex()),
            title: record.title,
            content: record.content,
            category: record.category,
            order: record.order,
            created_at: record.created_at,
        }
    }
}

/// MongoDB 클라이언트와 `documents` 컬렉션 핸들
///
/// `Client`는 내부적으로 연결 풀을 가지며 clone해도 같은 풀을 공유합니다.
pub struct MongoStore {
    client: Client,
    collection: Collection<DocumentRecord>,
}

impl MongoStore {
    /// 클라이언트와 컬렉션 핸들을 만듭니다.
    ///
    /// 서버에 요청을 보내지 않습니다. 드라이버는 첫 작업 때 서버를 선택하고 연결하므로
    /// MongoDB가 아직 떠 있지 않아도 서버는 시작되고, 요청이 그때 500으로 실패합니다.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        // with_uri_str(): URI를 파싱해 클라이언트를 만듭니다 (mongodb+srv는 DNS 조회만 수행).
        let client = Client::with_uri_str(uri).await?;
        // collection::<T>(): 읽고 쓸 때 T로 (역)직렬화하는 타입 있는 컬렉션 핸들
        let collection = client
            .database(database)
            .collection::<DocumentRecord>(COLLECTION);

        tracing::debug!(database, "MongoDB client ready");
        Ok(Self { client, collection })
    }
}

/// 경로 파라미터를 ObjectId로 해석합니다. 형식이 맞지 않으면 `None`입니다.
fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id.trim()).ok()
}

/// 패치에 포함된 필드만 담은 `$set` 문서
fn set_fields(patch: &DocumentPatch) -> BsonDocument {
    let mut set = BsonDocument::new();
    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    if let Some(content) = &patch.content {
        set.insert("content", content.as_str());
    }
    if let Some(category) = &patch.category {
        set.insert("category", category.as_str());
    }
    if let Some(order) = patch.order {
        set.insert("order", order);
    }
    set
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn list_documents(&self) -> Result<Vec<Document>, AppError> {
        let records: Vec<DocumentRecord> = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?
            .try_collect()
            .await?;

        Ok(records.into_iter().map(Document::from).collect())
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>, AppError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };

        let record = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(record.map(Document::from))
    }

    async fn create_document(&self, input: &NewDocument) -> Result<Document, AppError> {
        let record = DocumentRecord {
            id: ObjectId::new(),
            title: input.title.clone(),
            content: input.content.clone(),
            category: input.category.clone(),
            order: input.order,
            created_at: now_timestamp(),
        };

        self.collection.insert_one(&record).await?;
        tracing::debug!(id = %record.id, "Created document");

        Ok(record.into())
    }

    async fn update_document(
        &self,
        id: &str,
        patch: &DocumentPatch,
    ) -> Result<Option<Document>, AppError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };

        // MongoDB는 빈 `$set`을 거부하므로 빈 패치는 조회로 대신합니다.
        if patch.is_empty() {
            return self.get_document(id).await;
        }

        // 필터에 맞는 문서가 없으면 쓰기가 일어나지 않고 None이 돌아옵니다.
        let record = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set_fields(patch) })
            .return_document(ReturnDocument::After)
            .await?;

        if record.is_some() {
            tracing::debug!(id = %oid, "Updated document");
        }
        Ok(record.map(Document::from))
    }

    async fn delete_document(&self, id: &str) -> Result<bool, AppError> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };

        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}
