//! # 입력 검증 에러
//!
//! 생성/수정 요청 본문을 검증할 때 발생하는 에러입니다.
//! 항상 **처음으로 실패한 필드 하나**만 보고합니다.

use thiserror::Error;

/// 요청 본문 검증 실패
///
/// `field()`로 실패한 필드명을 얻고, `to_string()`으로 사람이 읽을 메시지를 얻습니다.
/// 라우트 계층에서 `{"message": ..., "field": ...}` 형태의 400 응답으로 변환됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 본문이 JSON 객체가 아님 (배열, 문자열 등)
    #[error("request body must be a JSON object")]
    NotAnObject,

    /// 필수 필드가 없음
    #[error("{field} is required")]
    Required { field: &'static str },

    /// 빈 문자열 (`""`)
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// 타입이 맞지 않음 (예: title에 숫자)
    #[error("{field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    /// 본문을 JSON으로 파싱할 수 없음
    #[error("{0}")]
    MalformedBody(String),
}

impl ValidationError {
    /// 실패한 필드 이름. 본문 전체가 잘못된 경우 `"body"`입니다.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotAnObject | Self::MalformedBody(_) => "body",
            Self::Required { field }
            | Self::Empty { field }
            | Self::InvalidType { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = ValidationError::Required { field: "title" };
        assert_eq!(err.to_string(), "title is required");
        assert_eq!(err.field(), "title");

        let err = ValidationError::InvalidType {
            field: "order",
            expected: "an integer",
        };
        assert_eq!(err.to_string(), "order must be an integer");
        assert_eq!(err.field(), "order");
    }

    #[test]
    fn body_level_errors_report_body_field() {
        assert_eq!(ValidationError::NotAnObject.field(), "body");
        assert_eq!(
            ValidationError::MalformedBody("EOF while parsing".into()).field(),
            "body"
        );
    }
}
