//! # ixmlservice
//!
//! IBM i XMLSERVICE CGI 게이트웨이 클라이언트 라이브러리.
//!
//! CL 명령 실행, 프로그램 호출, 저장 프로시저 호출, SQL 쿼리 요청을 XML 스크립트로 인코딩해 HTTP로 전송하고,
//! 응답을 성공/실패로 분류한 뒤 쿼리 결과 XML을 행/컬럼 테이블로 디코딩합니다.
//!
//! ## 모듈 구조
//!
//! - [`constants`]: 성공 마커, 제어 모드, 세션 기본값 상수
//! - [`error`]: 에러 타입 계층 구조 ([`XmlServiceError`])
//! - [`types`]: 공유 타입 정의 ([`SessionConfig`], [`Table`], [`PgmParm`] 등)
//! - [`codec`]: 폼 파라미터 조립 + XML 스크립트 빌더
//! - [`classify`]: 작업 종류별 응답 분류 ([`ResponseKind`])
//! - [`table`]: `col`/`data` XML → [`Table`] 디코더
//! - [`secret`]: 자격 증명 보관 capability ([`SecretStore`](secret::SecretStore))
//! - [`transport`]: reqwest 기반 HTTP 전송 *(feature `"client"` 활성화 시)*
//! - [`client`]: 세션 + 진단 상태를 가진 공개 클라이언트 *(feature `"client"` 활성화 시)*
//!
//! ## 사용 예시
//!
//! ```rust
//! use ixmlservice::classify::ResponseKind;
//! use ixmlservice::table::decode_str;
//!
//! assert!(ResponseKind::Command.is_success("<success>+++ success</success>"));
//!
//! let xml = "<script><col><name>ID</name></col><data desc='ID'>7</data></script>";
//! let table = decode_str(xml).unwrap();
//! assert_eq!(table.cell(0, "ID"), Some("7"));
//! ```

pub mod classify;
#[cfg(feature = "client")]
pub mod client;
pub mod codec;
pub mod constants;
pub mod error;
pub mod secret;
pub mod table;
#[cfg(feature = "client")]
pub mod transport;
pub mod types;

// NOTE: Selective re-export: only expose commonly used types
pub use classify::ResponseKind;
pub use error::{ErrorKind, Result, XmlServiceError};
pub use types::{
    ControlMode, HttpMethod, ParmIo, PgmCallResult, PgmParm, ProcedureCallResult, ProcedureParm,
    RawResponse, Row, SessionConfig, Table,
};
