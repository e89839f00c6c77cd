//! XMLSERVICE 클라이언트 전반에서 공유되는 타입 정의입니다.
//!
//! 세션 설정([`SessionConfig`]), 요청 제어 모드([`ControlMode`]), 원시 HTTP 응답([`RawResponse`]),
//! 디코딩된 결과 테이블([`Table`]), 프로그램 호출 파라미터([`PgmParm`]) 및
//! 저장 프로시저 파라미터([`ProcedureParm`])를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CTL_IMMEDIATE, CTL_SUBMIT_JOB, DEFAULT_DB2, DEFAULT_IPC, DEFAULT_TIMEOUT_MS,
};

/// 요청 실행 모드 (`ctl` 폼 필드)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlMode {
    /// `*immed`: IPC 워커 즉시 종료
    Immediate,
    /// `*sbmjob`: 제출 작업으로 실행
    SubmitJob,
}

impl ControlMode {
    /// 폼 필드에 들어갈 리터럴 값을 반환합니다.
    pub fn as_str(self) -> &'static str {
        match self {
            ControlMode::Immediate => CTL_IMMEDIATE,
            ControlMode::SubmitJob => CTL_SUBMIT_JOB,
        }
    }
}

/// HTTP 메서드
///
/// `Get`은 조립된 파라미터 문자열을 쿼리 스트링으로, `Post`는 폼 본문으로 전송합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

/// 세션 설정
///
/// 논리적 연결당 한 번 설정한 뒤 모든 호출에서 재사용합니다.
/// `serde(default)`가 적용되어 있어 일부 필드만 있는 JSON/TOML에서도 로드할 수 있습니다.
/// 비밀번호는 직렬화되지 않으며 `Debug` 출력에서 가려집니다.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// XMLCGI 프로그램 URL (예: `http://1.1.1.1:30000/cgi-bin/xmlcgi.pgm`)
    pub base_url: String,
    /// 사용자 프로필
    pub user: String,
    /// 비밀번호
    #[serde(skip_serializing)]
    pub password: String,
    /// 재사용 백엔드 워커를 식별하는 IPC 토큰
    pub ipc: String,
    /// 대상 DB2 인스턴스 (`*LOCAL` = 로컬 데이터베이스)
    pub db2: String,
    /// HTTP 교환 전체(연결 + 읽기)에 적용되는 타임아웃 (밀리초)
    pub timeout_ms: u64,
    /// HTTP 메서드
    pub method: HttpMethod,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            user: String::new(),
            password: String::new(),
            ipc: DEFAULT_IPC.to_string(),
            db2: DEFAULT_DB2.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            method: HttpMethod::Post,
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("ipc", &self.ipc)
            .field("db2", &self.db2)
            .field("timeout_ms", &self.timeout_ms)
            .field("method", &self.method)
            .finish()
    }
}

/// 원시 HTTP 응답
///
/// 비정상 상태 코드(non-2xx)라도 본문이 읽히면 그대로 담깁니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// 상태 라인 (예: `"HTTP/1.1 200 OK"`)
    pub status_line: String,
    /// HTTP 상태 코드
    pub status: u16,
    /// 디코딩된 응답 본문
    pub body: String,
}

impl RawResponse {
    /// 2xx 응답 여부
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 한 행: 컬럼 순서대로 `(컬럼명, 값)` 쌍
pub type Row = Vec<(String, String)>;

/// 쿼리 결과 테이블
///
/// 컬럼 순서는 `col` 테이블의 선언 순서를 따릅니다.
/// 모든 행은 모든 컬럼을 가지며, 값이 채워지지 않은 셀은 빈 문자열입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// 컬럼명 목록 (선언 순서)
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 모든 행
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `row` 번째 행에서 `column` 컬럼의 값을 반환합니다.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        self.rows
            .get(row)?
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// 프로그램 호출 파라미터
///
/// `data_type`은 XMLSERVICE 데이터 타입 표기입니다 (예: `"10a"`, `"7p2"`, `"10i0"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgmParm {
    #[serde(rename = "type")]
    pub data_type: String,
    pub value: String,
}

impl PgmParm {
    pub fn new(data_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            value: value.into(),
        }
    }
}

/// 프로그램 호출 결과: 백엔드가 돌려준 파라미터 값 (호출 순서)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PgmCallResult {
    pub parms: Vec<PgmParm>,
}

/// 저장 프로시저 파라미터 방향 (`<parm io='..'>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParmIo {
    #[default]
    In,
    Out,
    /// XMLSERVICE 표기는 `both`
    #[serde(rename = "both")]
    InOut,
}

impl ParmIo {
    pub fn as_str(self) -> &'static str {
        match self {
            ParmIo::In => "in",
            ParmIo::Out => "out",
            ParmIo::InOut => "both",
        }
    }

    /// `io` 속성 값을 해석합니다. 알 수 없는 값이면 `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in" => Some(ParmIo::In),
            "out" => Some(ParmIo::Out),
            "both" => Some(ParmIo::InOut),
            _ => None,
        }
    }
}

/// 저장 프로시저 파라미터
///
/// `name`과 `data_type`은 호출자가 결과를 해석하기 위한 라벨이며 스크립트에는 들어가지 않습니다.
/// SQL `CALL`의 파라미터 타입은 프로시저 정의에서 정해집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureParm {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub value: String,
    #[serde(default)]
    pub io: ParmIo,
}

impl ProcedureParm {
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<String>,
        value: impl Into<String>,
        io: ParmIo,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            value: value.into(),
            io,
        }
    }

    /// 입력 파라미터
    pub fn input(
        name: impl Into<String>,
        data_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(name, data_type, value, ParmIo::In)
    }

    /// 값 없이 보내는 출력 파라미터
    pub fn output(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self::new(name, data_type, "", ParmIo::Out)
    }
}

/// 저장 프로시저 호출 결과: 백엔드가 돌려준 파라미터 (호출 순서)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcedureCallResult {
    pub parms: Vec<ProcedureParm>,
}

impl ProcedureCallResult {
    /// 이름으로 반환 값을 찾습니다.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.parms
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_mode_literals() {
        assert_eq!(ControlMode::Immediate.as_str(), "*immed");
        assert_eq!(ControlMode::SubmitJob.as_str(), "*sbmjob");
    }

    #[test]
    fn test_session_config_defaults() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.ipc, "/tmp/rjsxmlservice");
        assert_eq!(cfg.db2, "*LOCAL");
        assert_eq!(cfg.timeout_ms, 60_000);
        assert_eq!(cfg.method, HttpMethod::Post);
        assert!(cfg.base_url.is_empty());
    }

    #[test]
    fn test_session_config_debug_redacts_password() {
        let cfg = SessionConfig {
            password: "s3cret".to_string(),
            ..SessionConfig::default()
        };
        let out = format!("{:?}", cfg);
        assert!(!out.contains("s3cret"));
        assert!(out.contains("<redacted>"));
    }

    #[test]
    fn test_session_config_partial_json() {
        let cfg: SessionConfig = serde_json::from_str(
            r#"{"base_url":"http://host/cgi-bin/xmlcgi.pgm","user":"QUSER","method":"GET"}"#,
        )
        .unwrap();
        assert_eq!(cfg.base_url, "http://host/cgi-bin/xmlcgi.pgm");
        assert_eq!(cfg.method, HttpMethod::Get);
        assert_eq!(cfg.db2, "*LOCAL");
        assert_eq!(cfg.timeout_ms, 60_000);
    }

    #[test]
    fn test_session_config_never_serializes_password() {
        let cfg = SessionConfig {
            password: "s3cret".to_string(),
            ..SessionConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("s3cret"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_raw_response_success_range() {
        let ok = RawResponse {
            status_line: "HTTP/1.1 200 OK".into(),
            status: 200,
            body: String::new(),
        };
        let err = RawResponse {
            status: 500,
            ..ok.clone()
        };
        assert!(ok.is_success());
        assert!(!err.is_success());
    }

    #[test]
    fn test_table_cell_lookup() {
        let table = Table::new(
            vec!["A".into(), "B".into()],
            vec![vec![("A".into(), "1".into()), ("B".into(), "2".into())]],
        );
        assert_eq!(table.cell(0, "B"), Some("2"));
        assert_eq!(table.cell(0, "C"), None);
        assert_eq!(table.cell(1, "A"), None);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_pgm_parm_serializes_type_key() {
        let json = serde_json::to_string(&PgmParm::new("10a", "ABC")).unwrap();
        assert_eq!(json, r#"{"type":"10a","value":"ABC"}"#);
    }

    #[test]
    fn test_parm_io_literals() {
        for io in [ParmIo::In, ParmIo::Out, ParmIo::InOut] {
            assert_eq!(ParmIo::parse(io.as_str()), Some(io));
        }
        assert_eq!(ParmIo::InOut.as_str(), "both");
        assert_eq!(ParmIo::parse("inout"), None);
    }

    #[test]
    fn test_procedure_parm_json() {
        let parm: ProcedureParm =
            serde_json::from_str(r#"{"name":"CNT","type":"10i0","value":""}"#).unwrap();
        assert_eq!(parm, ProcedureParm::input("CNT", "10i0", ""));
        let json = serde_json::to_string(&ProcedureParm::output("CNT", "10i0")).unwrap();
        assert!(json.contains(r#""io":"out""#));
    }

    #[test]
    fn test_procedure_result_value_by_name() {
        let result = ProcedureCallResult {
            parms: vec![
                ProcedureParm::input("IN1", "10a", "A"),
                ProcedureParm::new("OUT1", "10i0", "42", ParmIo::Out),
            ],
        };
        assert_eq!(result.value("OUT1"), Some("42"));
        assert_eq!(result.value("NOPE"), None);
    }
}
