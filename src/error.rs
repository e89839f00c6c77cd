//! XMLSERVICE 클라이언트의 에러 타입 계층 구조를 정의합니다.
//!
//! 모든 에러는 [`XmlServiceError`] enum으로 표현되며, [`thiserror`]를 통해
//! `Display` 및 `Error` 트레이트가 자동 구현됩니다.
//! 에러 분류는 [`ErrorKind`]로 조회할 수 있습니다.

/// 에러 분류
///
/// 진단 채널(`last_failure`)에서 타임아웃과 프로토콜 실패를 구분하는 데 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 잘못된/비어 있는 설정 값
    Config,
    /// 네트워크 에러 (타임아웃 제외)
    Transport,
    /// HTTP 타임아웃 초과
    Timeout,
    /// 백엔드 응답이 성공 규약(마커/prefix/빈 본문)과 불일치
    Protocol,
    /// 성공으로 분류되었으나 테이블 형태로 디코딩 불가
    Decode,
}

/// XMLSERVICE 클라이언트의 최상위 에러 타입
///
/// HTTP/네트워크 에러 변형은 feature `"client"` 활성화 시에만 포함됩니다.
#[derive(Debug, thiserror::Error)]
pub enum XmlServiceError {
    /// 설정 값 검증 실패
    #[error("invalid {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// HTTP 클라이언트 에러 (reqwest 래핑)
    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 요청이 타임아웃 내에 완료되지 않음
    #[cfg(feature = "client")]
    #[error("HTTP request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// 명령 응답에 성공 마커가 없음
    #[error("command failed: {body}")]
    CommandFailed { body: String },

    /// 종료 응답이 비어 있지 않음
    #[error("service kill failed: {body}")]
    KillFailed { body: String },

    /// 쿼리 응답이 `ERROR`로 시작함
    #[error("query failed: {body}")]
    QueryFailed { body: String },

    /// 프로그램 호출 응답에 성공 마커가 없음
    #[error("program call failed: {body}")]
    ProgramFailed { body: String },

    /// 저장 프로시저 호출 응답에 성공 마커가 없음
    #[error("procedure call failed: {body}")]
    ProcedureFailed { body: String },

    /// XML 파싱 실패 (roxmltree 래핑)
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// 표준 I/O 에러 래핑 (XML 파일 읽기)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 필수 테이블(`col` / `data`)이 문서에 없음
    #[error("missing table {name:?} in response document")]
    MissingTable { name: &'static str },

    /// 테이블 행에 필요한 필드가 없음
    #[error("malformed row {index} in table {table:?}")]
    MalformedRow { table: &'static str, index: usize },

    /// 데이터 셀이 `col` 테이블에 없는 컬럼을 가리킴
    #[error("data cell references unknown column {name:?}")]
    UnknownColumn { name: String },

    /// `col` 테이블에 같은 컬럼명이 두 번 나옴
    #[error("duplicate column {name:?} in column table")]
    DuplicateColumn { name: String },
}

impl XmlServiceError {
    /// 에러 분류를 반환합니다.
    pub fn kind(&self) -> ErrorKind {
        match self {
            XmlServiceError::InvalidConfig { .. } => ErrorKind::Config,
            #[cfg(feature = "client")]
            XmlServiceError::Http(_) => ErrorKind::Transport,
            #[cfg(feature = "client")]
            XmlServiceError::Timeout { .. } => ErrorKind::Timeout,
            XmlServiceError::CommandFailed { .. }
            | XmlServiceError::KillFailed { .. }
            | XmlServiceError::QueryFailed { .. }
            | XmlServiceError::ProgramFailed { .. }
            | XmlServiceError::ProcedureFailed { .. } => ErrorKind::Protocol,
            XmlServiceError::Xml(_)
            | XmlServiceError::Io(_)
            | XmlServiceError::MissingTable { .. }
            | XmlServiceError::MalformedRow { .. }
            | XmlServiceError::UnknownColumn { .. }
            | XmlServiceError::DuplicateColumn { .. } => ErrorKind::Decode,
        }
    }

    /// 프로토콜 실패인 경우 백엔드가 반환한 응답 본문을 반환합니다.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            XmlServiceError::CommandFailed { body }
            | XmlServiceError::KillFailed { body }
            | XmlServiceError::QueryFailed { body }
            | XmlServiceError::ProgramFailed { body }
            | XmlServiceError::ProcedureFailed { body } => Some(body),
            _ => None,
        }
    }
}

/// [`XmlServiceError`]를 사용하는 편의 Result 타입 별칭
pub type Result<T> = std::result::Result<T, XmlServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: XmlServiceError = io_err.into();
        assert!(matches!(err, XmlServiceError::Io(_)));
        assert!(err.to_string().contains("IO error"));
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_xml_error_conversion() {
        let xml_err = roxmltree::Document::parse("<a>").unwrap_err();
        let err: XmlServiceError = xml_err.into();
        assert!(matches!(err, XmlServiceError::Xml(_)));
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_invalid_config_display() {
        let err = XmlServiceError::InvalidConfig {
            field: "base_url",
            reason: "must not be empty".to_string(),
        };
        assert_eq!(err.to_string(), "invalid base_url: must not be empty");
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_command_failed_carries_body() {
        let err = XmlServiceError::CommandFailed {
            body: "<error>CPF0001</error>".to_string(),
        };
        assert_eq!(err.to_string(), "command failed: <error>CPF0001</error>");
        assert_eq!(err.response_body(), Some("<error>CPF0001</error>"));
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn test_kill_and_query_are_protocol_errors() {
        let kill = XmlServiceError::KillFailed { body: "x".into() };
        let query = XmlServiceError::QueryFailed {
            body: "ERROR: bad sql".into(),
        };
        assert_eq!(kill.kind(), ErrorKind::Protocol);
        assert_eq!(query.kind(), ErrorKind::Protocol);
        assert_eq!(query.response_body(), Some("ERROR: bad sql"));
    }

    #[test]
    fn test_missing_table_display() {
        let err = XmlServiceError::MissingTable { name: "data" };
        assert_eq!(err.to_string(), "missing table \"data\" in response document");
        assert!(err.response_body().is_none());
    }

    #[test]
    fn test_malformed_row_display() {
        let err = XmlServiceError::MalformedRow {
            table: "col",
            index: 3,
        };
        assert_eq!(err.to_string(), "malformed row 3 in table \"col\"");
    }

    #[test]
    fn test_unknown_column_display() {
        let err = XmlServiceError::UnknownColumn {
            name: "ZZZ".to_string(),
        };
        assert!(err.to_string().contains("ZZZ"));
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[cfg(feature = "client")]
    #[test]
    fn test_timeout_kind_is_distinct() {
        let err = XmlServiceError::Timeout { timeout_ms: 1 };
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.to_string(), "HTTP request timed out after 1 ms");
    }
}
