//! 응답 분류 모듈: 작업 종류별 성공/실패 판정
//!
//! XMLSERVICE 백엔드는 구조화된 상태 코드를 돌려주지 않으므로, 응답 본문에 대한
//! 문자열 규약이 곧 프로토콜 계약입니다. 판정은 대소문자를 구분하며 그대로 재현해야 합니다.
//!
//! | 작업 | 성공 조건 |
//! |---|---|
//! | [`Command`](ResponseKind::Command) | 본문에 `"+++ success"` 포함 |
//! | [`Program`](ResponseKind::Program) | 본문에 `"+++ success"` 포함 |
//! | [`Procedure`](ResponseKind::Procedure) | 본문에 `"+++ success"` 포함 |
//! | [`Kill`](ResponseKind::Kill) | 본문이 정확히 빈 문자열 |
//! | [`Query`](ResponseKind::Query) | 본문이 `"ERROR"`로 시작하지 않음 |

use crate::constants::{QUERY_ERROR_PREFIX, SUCCESS_MARKER};
use crate::error::{Result, XmlServiceError};

/// 작업 종류: 각자 고유한 판정 규칙을 가집니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// CL 명령 실행
    Command,
    /// IPC 워커 종료
    Kill,
    /// SQL 쿼리
    Query,
    /// 프로그램 호출
    Program,
    /// 저장 프로시저 호출
    Procedure,
}

impl ResponseKind {
    /// 응답 본문이 이 작업 종류의 성공 규약을 만족하는지 판정합니다.
    pub fn is_success(self, body: &str) -> bool {
        match self {
            ResponseKind::Command | ResponseKind::Program | ResponseKind::Procedure => {
                body.contains(SUCCESS_MARKER)
            }
            ResponseKind::Kill => body.is_empty(),
            ResponseKind::Query => !body.starts_with(QUERY_ERROR_PREFIX),
        }
    }

    /// 응답 본문을 분류합니다.
    ///
    /// 실패 시 본문 전체를 진단 정보로 담은 프로토콜 에러를 반환합니다.
    ///
    /// # 예시
    ///
    /// ```
    /// use ixmlservice::classify::ResponseKind;
    ///
    /// assert!(ResponseKind::Command.classify("<success>+++ success SNDMSG</success>").is_ok());
    /// assert!(ResponseKind::Kill.classify("").is_ok());
    /// assert!(ResponseKind::Query.classify("ERROR: SQL0204").is_err());
    /// ```
    pub fn classify(self, body: &str) -> Result<()> {
        if self.is_success(body) {
            return Ok(());
        }
        let body = body.to_string();
        Err(match self {
            ResponseKind::Command => XmlServiceError::CommandFailed { body },
            ResponseKind::Kill => XmlServiceError::KillFailed { body },
            ResponseKind::Query => XmlServiceError::QueryFailed { body },
            ResponseKind::Program => XmlServiceError::ProgramFailed { body },
            ResponseKind::Procedure => XmlServiceError::ProcedureFailed { body },
        })
    }
}
