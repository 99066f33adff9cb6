//! # 데이터 모델 모듈
//!
//! - `document`: 문서(Document)와 생성/수정 요청 타입
//! - `validation`: 요청 본문 검증 에러
//!
//! `pub use X::*;`로 하위 모듈 항목을 재공개하여
//! `crate::models::Document`처럼 짧게 접근할 수 있게 합니다.

pub mod document;
pub mod validation;

pub use document::*;
pub use validation::*;
