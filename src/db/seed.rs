//! 빈 저장소에 넣는 시작 문서
//!
//! 저장소에 문서가 하나라도 있으면 아무것도 하지 않으므로 재시작해도 중복되지 않습니다.

use super::DocumentStore;
use crate::error::AppError;
use crate::models::NewDocument;

fn seed_documents() -> [NewDocument; 2] {
    [
        NewDocument::new(
            "Welcome to Docs",
            "# Welcome\n\nThis is your new documentation site. You can edit this page or create new ones.",
        )
        .with_category("Getting Started")
        .with_order(0),
        NewDocument::new(
            "Installation",
            "# Installation\n\nRun `cargo run` to get started.",
        )
        .with_category("Getting Started")
        .with_order(1),
    ]
}

/// 저장소가 비어 있으면 시작 문서 두 개를 넣고, 넣은 개수를 반환합니다.
pub async fn seed_if_empty(store: &dyn DocumentStore) -> Result<usize, AppError> {
    if !store.list_documents().await?.is_empty() {
        tracing::debug!("Store already has documents, skipping seed");
        return Ok(0);
    }

    let docs = seed_documents();
    for doc in &docs {
        store.create_document(doc).await?;
    }

    tracing::info!("Seeded {} documents", docs.len());
    Ok(docs.len())
}
