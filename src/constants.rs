//! XMLSERVICE 프로토콜에서 사용하는 마커, 제어 모드, 기본값 상수를 정의합니다.

/// 명령/프로그램 호출 성공 마커 (응답 본문 어디든 포함되면 성공)
pub const SUCCESS_MARKER: &str = "+++ success";

/// 쿼리 실패 응답 prefix (대소문자 구분)
pub const QUERY_ERROR_PREFIX: &str = "ERROR";

/// `ctl` 값: 워커 프로세스 즉시 종료
pub const CTL_IMMEDIATE: &str = "*immed";

/// `ctl` 값: 제출 작업(submitted job)으로 실행
pub const CTL_SUBMIT_JOB: &str = "*sbmjob";

/// IPC 토큰 기본값
pub const DEFAULT_IPC: &str = "/tmp/rjsxmlservice";

/// DB2 인스턴스 기본값 (로컬 데이터베이스)
pub const DEFAULT_DB2: &str = "*LOCAL";

/// HTTP 타임아웃 기본값 (밀리초)
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// 명령/프로그램 호출/종료 요청의 `xmlout` 버퍼 크기
pub const COMMAND_XMLOUT: &str = "32768";

/// SQL 쿼리 요청의 `xmlout` 버퍼 크기
pub const QUERY_XMLOUT: &str = "500000";

/// 모든 XML 스크립트의 선언부 + 스타일시트 처리 명령 (백엔드 호환을 위해 그대로 유지)
pub const XML_PROLOGUE: &str =
    "<?xml version='1.0'?><?xml-stylesheet type='text/xsl' href='/DemoXslt.xsl'?>";

/// SQL 스크립트에서 사용하는 연결 이름
pub const SQL_CONNECTION_NAME: &str = "myconn";

/// 컬럼 정의 테이블 이름
pub const COLUMN_TABLE: &str = "col";

/// 데이터 셀 테이블 이름
pub const DATA_TABLE: &str = "data";

/// 폼 본문 Content-Type
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
