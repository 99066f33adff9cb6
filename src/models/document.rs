//! # 문서(Document) 모델
//!
//! 저장소에 보관되는 유일한 엔티티인 `Document`와,
//! 클라이언트 요청 본문을 검증한 결과인 `NewDocument`(생성) / `DocumentPatch`(부분 수정)를 정의합니다.
//!
//! 요청 본문은 구조체로 바로 역직렬화하지 않고 `serde_json::Value`로 받아
//! 필드 순서(`title` → `content` → `category` → `order`)대로 검사합니다.
//! 그래야 타입이 틀린 경우에도 "어느 필드가 잘못됐는지"를 응답에 담을 수 있습니다.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::validation::ValidationError;

/// 카테고리를 생략했을 때 사용하는 기본값
pub const DEFAULT_CATEGORY: &str = "General";

/// 문서 식별자
///
/// 어떤 백엔드가 활성화되어 있는지에 따라 모양이 다릅니다.
/// - 관계형(SQLite): 자동 증가 정수 → JSON 숫자 `1`
/// - 문서 저장소(MongoDB): ObjectId 16진 문자열 → JSON 문자열 `"65f0c0..."`
///
/// `#[serde(untagged)]`: variant 이름 없이 내부 값만 그대로 직렬화합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Serial(i64),
    Object(String),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial(id) => write!(f, "{}", id),
            Self::Object(id) => f.write_str(id),
        }
    }
}

/// 저장된 문서
///
/// `id`와 `created_at`은 저장소가 생성 시점에 한 번만 채우며 이후 바뀌지 않습니다.
/// JSON에서는 camelCase(`createdAt`)로 노출됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    /// 마크다운 원문. 서버는 해석하지 않고 그대로 저장합니다.
    pub content: String,
    pub category: String,
    pub order: i64,
    /// RFC 3339 UTC 타임스탬프 (밀리초 정밀도, 예: `2026-10-16T09:30:00.123Z`)
    pub created_at: String,
}

/// 검증을 통과한 생성 요청
///
/// 기본값(`category = "General"`, `order = 0`)이 이미 적용된 상태입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
    pub category: String,
    pub order: i64,
}

impl NewDocument {
    /// 제목과 내용만으로 생성 요청을 만듭니다. 나머지는 기본값입니다.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: DEFAULT_CATEGORY.to_string(),
            order: 0,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// `POST /documents` 본문을 검증합니다.
    ///
    /// - `title`, `content`: 필수, 빈 문자열이 아닌 문자열
    /// - `category`: 선택, 빈 문자열이 아닌 문자열 (없거나 null이면 `"General"`)
    /// - `order`: 선택, 정수 (`1.0`처럼 소수부가 0인 값 포함, 없거나 null이면 `0`)
    ///
    /// `id`, `createdAt` 등 알 수 없는 필드는 무시합니다.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let fields = as_object(body)?;

        let title = required_text(fields, "title")?;
        let content = required_text(fields, "content")?;
        let category =
            optional_text(fields, "category")?.unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let order = optional_integer(fields, "order")?.unwrap_or(0);

        Ok(Self {
            title,
            content,
            category,
            order,
        })
    }
}

/// 검증을 통과한 부분 수정 요청
///
/// `None`인 필드는 "변경하지 않음"을 뜻합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub order: Option<i64>,
}

impl DocumentPatch {
    /// `PUT /documents/{id}` 본문을 검증합니다.
    ///
    /// 생성 요청과 같은 규칙이지만 모든 필드가 선택입니다.
    /// 있는 필드만 개별적으로 검사합니다.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let fields = as_object(body)?;

        Ok(Self {
            title: optional_text(fields, "title")?,
            content: optional_text(fields, "content")?,
            category: optional_text(fields, "category")?,
            order: optional_integer(fields, "order")?,
        })
    }

    /// 바꿀 필드가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.order.is_none()
    }

    /// 패치를 문서에 적용합니다. `id`와 `created_at`은 건드리지 않습니다.
    pub fn apply_to(&self, doc: &mut Document) {
        if let Some(title) = &self.title {
            doc.title = title.clone();
        }
        if let Some(content) = &self.content {
            doc.content = content.clone();
        }
        if let Some(category) = &self.category {
            doc.category = category.clone();
        }
        if let Some(order) = self.order {
            doc.order = order;
        }
    }
}

// ── 필드 검사 헬퍼 ──

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or(ValidationError::NotAnObject)
}

fn optional_text(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        // 빈 문자열만 거부합니다. 공백뿐인 값도 내용이 있는 것으로 보고 그대로 저장합니다.
        Some(Value::String(s)) if s.is_empty() => Err(ValidationError::Empty { field }),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::InvalidType {
            field,
            expected: "a string",
        }),
    }
}

fn required_text(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    optional_text(fields, field)?.ok_or(ValidationError::Required { field })
}

/// 소수부가 없고 i64 범위 안에 있는 실수를 정수로 바꿉니다.
///
/// `i64::MAX as f64`는 2^63으로 올림되므로 상한은 미만(<) 비교입니다.
fn integral_f64(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

fn optional_integer(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<i64>, ValidationError> {
    let invalid = ValidationError::InvalidType {
        field,
        expected: "an integer",
    };
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        // as_i64(): 정수로 파싱된 JSON 숫자만 Some을 돌려줍니다.
        // `1.0`처럼 소수 표기지만 값이 정수인 경우는 integral_f64()로 한 번 더 확인합니다.
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral_f64))
            .map(Some)
            .ok_or(invalid),
        Some(_) => Err(invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_applies_defaults() {
        let input = NewDocument::from_json(&json!({ "title": "Intro", "content": "# Hi" })).unwrap();
        assert_eq!(input, NewDocument::new("Intro", "# Hi"));
        assert_eq!(input.category, "General");
        assert_eq!(input.order, 0);
    }

    #[test]
    fn create_keeps_submitted_fields_verbatim() {
        let input = NewDocument::from_json(&json!({
            "title": "  Padded  ",
            "content": "line one\n\nline two",
            "category": "Guides",
            "order": -3
        }))
        .unwrap();
        assert_eq!(input.title, "  Padded  ");
        assert_eq!(input.content, "line one\n\nline two");
        assert_eq!(input.category, "Guides");
        assert_eq!(input.order, -3);
    }

    #[test]
    fn create_reports_missing_title_first() {
        let err = NewDocument::from_json(&json!({})).unwrap_err();
        assert_eq!(err, ValidationError::Required { field: "title" });

        let err = NewDocument::from_json(&json!({ "title": "T" })).unwrap_err();
        assert_eq!(err.field(), "content");
    }

    #[test]
    fn create_rejects_blank_and_mistyped_fields() {
        let err = NewDocument::from_json(&json!({ "title": "", "content": "x" })).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "title" });

        let err = NewDocument::from_json(&json!({ "title": 7, "content": "x" })).unwrap_err();
        assert_eq!(err.field(), "title");
        assert_eq!(err.to_string(), "title must be a string");

        let err = NewDocument::from_json(&json!({ "title": "t", "content": "x", "category": "" }))
            .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "category" });

        let err = NewDocument::from_json(&json!({ "title": "t", "content": "x", "order": 1.5 }))
            .unwrap_err();
        assert_eq!(err.field(), "order");

        let err = NewDocument::from_json(&json!({ "title": "t", "content": "x", "order": "2" }))
            .unwrap_err();
        assert_eq!(err.to_string(), "order must be an integer");
    }

    #[test]
    fn whitespace_only_text_is_kept_verbatim() {
        let input =
            NewDocument::from_json(&json!({ "title": "   ", "content": " \n", "category": "\t" }))
                .unwrap();
        assert_eq!(input.title, "   ");
        assert_eq!(input.content, " \n");
        assert_eq!(input.category, "\t");

        let patch = DocumentPatch::from_json(&json!({ "title": "  " })).unwrap();
        assert_eq!(patch.title.as_deref(), Some("  "));
    }

    #[test]
    fn integral_floats_count_as_integers() {
        let input =
            NewDocument::from_json(&json!({ "title": "t", "content": "c", "order": 1.0 })).unwrap();
        assert_eq!(input.order, 1);

        let patch = DocumentPatch::from_json(&json!({ "order": -4.0 })).unwrap();
        assert_eq!(patch.order, Some(-4));

        let err = DocumentPatch::from_json(&json!({ "order": 2.5 })).unwrap_err();
        assert_eq!(err.field(), "order");

        let err = DocumentPatch::from_json(&json!({ "order": 1e30 })).unwrap_err();
        assert_eq!(err.to_string(), "order must be an integer");
    }

    #[test]
    fn create_treats_null_title_as_missing() {
        let err = NewDocument::from_json(&json!({ "title": null, "content": "x" })).unwrap_err();
        assert_eq!(err, ValidationError::Required { field: "title" });
    }

    #[test]
    fn create_ignores_client_supplied_id_and_timestamp() {
        let input = NewDocument::from_json(&json!({
            "id": 42,
            "createdAt": "1999-01-01T00:00:00.000Z",
            "title": "t",
            "content": "c"
        }))
        .unwrap();
        assert_eq!(input, NewDocument::new("t", "c"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert_eq!(
            NewDocument::from_json(&json!(["title"])).unwrap_err(),
            ValidationError::NotAnObject
        );
        assert_eq!(
            DocumentPatch::from_json(&json!("x")).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn patch_accepts_any_subset() {
        let patch = DocumentPatch::from_json(&json!({})).unwrap();
        assert!(patch.is_empty());

        let patch = DocumentPatch::from_json(&json!({ "category": "X" })).unwrap();
        assert_eq!(patch.category.as_deref(), Some("X"));
        assert!(patch.title.is_none() && patch.content.is_none() && patch.order.is_none());
    }

    #[test]
    fn patch_validates_present_fields() {
        let err = DocumentPatch::from_json(&json!({ "content": "" })).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "content" });

        let err = DocumentPatch::from_json(&json!({ "order": true })).unwrap_err();
        assert_eq!(err.field(), "order");
    }

    #[test]
    fn patch_apply_leaves_identity_alone() {
        let mut doc = Document {
            id: DocumentId::Serial(3),
            title: "Old".into(),
            content: "body".into(),
            category: "General".into(),
            order: 2,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let patch = DocumentPatch {
            title: Some("New".into()),
            order: Some(9),
            ..Default::default()
        };
        patch.apply_to(&mut doc);

        assert_eq!(doc.id, DocumentId::Serial(3));
        assert_eq!(doc.title, "New");
        assert_eq!(doc.content, "body");
        assert_eq!(doc.order, 9);
        assert_eq!(doc.created_at, "2026-01-01T00:00:00.000Z");
    }

    #[test]
    fn document_serializes_in_camel_case_with_bare_id() {
        let doc = Document {
            id: DocumentId::Object("65f0c0ffee0000000000beef".into()),
            title: "t".into(),
            content: "c".into(),
            category: "General".into(),
            order: 0,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["id"], json!("65f0c0ffee0000000000beef"));
        assert_eq!(value["createdAt"], json!("2026-01-01T00:00:00.000Z"));
        assert!(value.get("created_at").is_none());

        let serial = serde_json::to_value(DocumentId::Serial(5)).unwrap();
        assert_eq!(serial, json!(5));
    }
}
