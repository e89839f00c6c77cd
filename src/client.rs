//! HTTP 클라이언트 모듈: XMLSERVICE 세션 관리 및 공개 작업
//!
//! [`XmlServiceClient`]는 세션 설정, 마지막 응답 진단 정보, 현재 로드된 테이블을 소유합니다.
//!
//! ## 작업 흐름
//!
//! 1. 스크립트 빌드 ([`codec`](crate::codec))
//! 2. 폼 본문 조립 ([`assemble`])
//! 3. HTTP 왕복 ([`Transport::send`])
//! 4. 응답 분류 ([`ResponseKind::classify`])
//! 5. (쿼리만) 테이블 디코딩 ([`decode_str`])
//!
//! ## 에러 보고 규약
//!
//! 공개 작업은 `Result`가 아닌 `bool`을 반환합니다. 실패 시 상세 정보는
//! [`last_error`](XmlServiceClient::last_error) / [`last_failure`](XmlServiceClient::last_failure)로,
//! 백엔드 원문은 [`last_xml_response`](XmlServiceClient::last_xml_response)로 조회합니다.
//! 모든 작업이 `&mut self`를 받으므로 한 세션에서 동시에 두 작업이 실행될 수 없습니다.

use std::path::Path;

use crate::classify::ResponseKind;
use crate::codec::{
    assemble, build_command_script, build_procedure_script, build_program_script,
    build_query_script,
};
use crate::constants::{COMMAND_XMLOUT, QUERY_XMLOUT};
use crate::error::{Result, XmlServiceError};
use crate::secret::{SecretHandle, SecretStore};
use crate::table::{decode_file, decode_procedure_parms, decode_program_parms, decode_str};
use crate::transport::{Credentials, Transport};
use crate::types::{
    ControlMode, HttpMethod, PgmCallResult, PgmParm, ProcedureCallResult, ProcedureParm,
    SessionConfig, Table,
};

/// XMLSERVICE HTTP 클라이언트
///
/// # 예시
///
/// ```no_run
/// use ixmlservice::client::XmlServiceClient;
///
/// # async fn example() -> ixmlservice::Result<()> {
/// let mut client = XmlServiceClient::new()?;
/// client.set_base_url("http://1.1.1.1:30000/cgi-bin/xmlcgi.pgm");
/// client.set_user_info("QUSER", "secret");
/// client.set_ipc_info("/tmp/xmlservicei");
///
/// if client.execute_sql_query("SELECT * FROM QIWS.QCUSTCDT").await {
///     println!("{} rows", client.table().map_or(0, |t| t.row_count()));
/// } else {
///     eprintln!("query failed: {}", client.last_error());
/// }
/// # Ok(())
/// # }
/// ```
pub struct XmlServiceClient {
    transport: Transport,
    session: SessionConfig,
    /// 마지막 HTTP 상태 라인
    last_http_response: String,
    /// 마지막 응답 본문 (XML 또는 에러 텍스트)
    last_xml_response: String,
    last_error: String,
    last_failure: Option<XmlServiceError>,
    /// 현재 로드된 테이블 (성공한 디코딩마다 교체)
    table: Option<Table>,
    program_result: Option<PgmCallResult>,
    procedure_result: Option<ProcedureCallResult>,
}

impl XmlServiceClient {
    /// 기본 세션 설정으로 새 클라이언트를 생성합니다.
    ///
    /// # 에러
    ///
    /// - [`XmlServiceError::Http`]: reqwest 클라이언트 생성 실패
    pub fn new() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// 주어진 세션 설정으로 새 클라이언트를 생성합니다.
    pub fn with_config(session: SessionConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new()?,
            session,
            last_http_response: String::new(),
            last_xml_response: String::new(),
            last_error: String::new(),
            last_failure: None,
            table: None,
            program_result: None,
            procedure_result: None,
        })
    }

    /// 현재 세션 설정
    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    /// XMLCGI 프로그램 URL을 설정합니다 (예: `http://1.1.1.1:30000/cgi-bin/xmlcgi.pgm`).
    ///
    /// 비어 있거나 http/https 절대 URL이 아니면 `false`를 반환하고 기존 값을 유지합니다.
    pub fn set_base_url(&mut self, url: &str) -> bool {
        self.clear_error();
        match validate_base_url(url) {
            Ok(()) => {
                self.session.base_url = url.to_string();
                true
            }
            Err(err) => self.fail("set_base_url", err),
        }
    }

    pub fn set_user_info(&mut self, user: &str, password: &str) {
        self.session.user = user.to_string();
        self.session.password = password.to_string();
    }

    /// 비밀 저장소에서 비밀번호를 꺼내 사용자 정보를 설정합니다.
    ///
    /// 핸들을 찾지 못하면 `false`를 반환하고 기존 자격 증명을 유지합니다.
    pub fn set_user_info_from_store(
        &mut self,
        user: &str,
        store: &impl SecretStore,
        handle: &SecretHandle,
    ) -> bool {
        self.clear_error();
        match store.reveal(handle) {
            Some(password) => {
                self.set_user_info(user, &password);
                true
            }
            None => self.fail(
                "set_user_info_from_store",
                XmlServiceError::InvalidConfig {
                    field: "password",
                    reason: "secret handle not found".to_string(),
                },
            ),
        }
    }

    /// IPC 토큰을 설정합니다. 빈 문자열은 무시하고 현재 토큰을 유지합니다.
    ///
    /// 한 번도 설정하지 않으면 `/tmp/rjsxmlservice`입니다.
    pub fn set_ipc_info(&mut self, ipc: &str) {
        if !ipc.is_empty() {
            self.session.ipc = ipc.to_string();
        }
    }

    /// DB2 인스턴스를 설정합니다 (기본 `*LOCAL`). 값은 검증 없이 그대로 저장됩니다.
    pub fn set_db2_info(&mut self, db2: &str) {
        self.session.db2 = db2.to_string();
    }

    pub fn set_http_timeout(&mut self, timeout_ms: u64) {
        self.session.timeout_ms = timeout_ms;
    }

    pub fn set_http_method(&mut self, method: HttpMethod) {
        self.session.method = method;
    }

    /// CL 명령을 실행합니다 (`ctl=*sbmjob`).
    ///
    /// 응답 본문에 `"+++ success"`가 있으면 성공입니다.
    /// 명령 문자열은 이스케이프 없이 `<cmd>` 안에 삽입됩니다.
    pub async fn execute_command(&mut self, command: &str) -> bool {
        self.begin_call();
        let script = build_command_script(command);
        let result = self
            .round_trip(
                ResponseKind::Command,
                &script,
                COMMAND_XMLOUT,
                ControlMode::SubmitJob,
            )
            .await;
        self.finish("execute_command", result)
    }

    /// SELECT 문을 실행하고 결과를 테이블로 로드합니다.
    ///
    /// 응답이 `"ERROR"`로 시작하면 디코더를 호출하지 않고 실패합니다.
    /// 성공 시 이전 테이블을 교체하며, 실패 시 이전 테이블은 그대로 남습니다.
    pub async fn execute_sql_query(&mut self, sql: &str) -> bool {
        self.begin_call();
        let script = build_query_script(sql);
        let result = self
            .round_trip(
                ResponseKind::Query,
                &script,
                QUERY_XMLOUT,
                ControlMode::SubmitJob,
            )
            .await
            .and_then(|()| decode_str(&self.last_xml_response));
        let result = result.map(|table| self.load(table));
        self.finish("execute_sql_query", result)
    }

    /// 프로그램을 호출합니다 (`ctl=*sbmjob`).
    ///
    /// 성공 시 백엔드가 돌려준 파라미터 값을 [`program_result`](Self::program_result)로 조회할 수 있습니다.
    pub async fn call_program(&mut self, name: &str, library: &str, parms: &[PgmParm]) -> bool {
        self.begin_call();
        let script = build_program_script(name, library, parms);
        let result = self
            .round_trip(
                ResponseKind::Program,
                &script,
                COMMAND_XMLOUT,
                ControlMode::SubmitJob,
            )
            .await
            .and_then(|()| decode_program_parms(&self.last_xml_response));
        let result = result.map(|parms| {
            self.program_result = Some(parms);
        });
        self.finish("call_program", result)
    }

    /// 저장 프로시저를 호출합니다 (`ctl=*sbmjob`).
    ///
    /// 응답 본문에 `"+++ success"`가 있으면 성공이며, 반환된 `<parm>` 값은
    /// [`procedure_result`](Self::procedure_result)로 조회합니다. 실패 시 이전 결과는 유지됩니다.
    pub async fn call_procedure(
        &mut self,
        name: &str,
        library: &str,
        parms: &[ProcedureParm],
    ) -> bool {
        self.begin_call();
        let script = build_procedure_script(name, library, parms);
        let result = self
            .round_trip(
                ResponseKind::Procedure,
                &script,
                COMMAND_XMLOUT,
                ControlMode::SubmitJob,
            )
            .await
            .and_then(|()| decode_procedure_parms(&self.last_xml_response, parms));
        let result = result.map(|returned| {
            self.procedure_result = Some(returned);
        });
        self.finish("call_procedure", result)
    }

    /// IPC 워커 프로세스를 종료합니다 (`ctl=*immed`).
    ///
    /// 응답 본문이 정확히 비어 있으면 성공입니다.
    pub async fn kill_service(&mut self) -> bool {
        self.begin_call();
        let result = self
            .round_trip(
                ResponseKind::Kill,
                "",
                COMMAND_XMLOUT,
                ControlMode::Immediate,
            )
            .await;
        if result.is_ok() {
            log::info!("[XMLSERVICE] IPC worker {} stopped", self.session.ipc);
        }
        self.finish("kill_service", result)
    }

    /// XML 파일을 디코딩하여 테이블로 로드합니다.
    pub fn load_table_from_file(&mut self, path: impl AsRef<Path>) -> bool {
        self.clear_error();
        let result = decode_file(path).map(|table| self.load(table));
        self.finish("load_table_from_file", result)
    }

    /// XML 문자열을 디코딩하여 테이블로 로드합니다.
    pub fn load_table_from_str(&mut self, xml: &str) -> bool {
        self.clear_error();
        let result = decode_str(xml).map(|table| self.load(table));
        self.finish("load_table_from_str", result)
    }

    /// 현재 로드된 테이블. 로드된 적이 없으면 `None`.
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// 마지막으로 성공한 프로그램 호출의 반환 파라미터
    pub fn program_result(&self) -> Option<&PgmCallResult> {
        self.program_result.as_ref()
    }

    /// 마지막으로 성공한 저장 프로시저 호출의 반환 파라미터
    pub fn procedure_result(&self) -> Option<&ProcedureCallResult> {
        self.procedure_result.as_ref()
    }

    /// 마지막 에러 메시지. 에러가 없으면 빈 문자열.
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// 마지막 에러 (분류 조회용)
    pub fn last_failure(&self) -> Option<&XmlServiceError> {
        self.last_failure.as_ref()
    }

    /// 마지막 응답 본문 (실패한 호출 포함)
    pub fn last_xml_response(&self) -> &str {
        &self.last_xml_response
    }

    /// 마지막 HTTP 상태 라인
    pub fn last_http_response(&self) -> &str {
        &self.last_http_response
    }

    /// 폼 조립 → 전송 → 분류. 응답은 분류 전에 진단 상태에 기록됩니다.
    async fn round_trip(
        &mut self,
        kind: ResponseKind,
        xml_in: &str,
        xml_out: &str,
        ctl: ControlMode,
    ) -> Result<()> {
        if self.session.base_url.is_empty() {
            return Err(XmlServiceError::InvalidConfig {
                field: "base_url",
                reason: "not set".to_string(),
            });
        }

        let body = assemble(xml_in, xml_out, &self.session, ctl);
        let credentials = Credentials {
            user: &self.session.user,
            password: &self.session.password,
        };
        let raw = self
            .transport
            .send(
                &self.session.base_url,
                self.session.method,
                &body,
                credentials,
                self.session.timeout_ms,
            )
            .await?;

        self.last_http_response = raw.status_line;
        self.last_xml_response = raw.body;
        kind.classify(&self.last_xml_response)
    }

    fn load(&mut self, table: Table) {
        log::info!(
            "[XMLSERVICE] table loaded: {} columns, {} rows",
            table.column_count(),
            table.row_count()
        );
        self.table = Some(table);
    }

    fn begin_call(&mut self) {
        self.clear_error();
        self.last_http_response.clear();
        self.last_xml_response.clear();
    }

    fn clear_error(&mut self) {
        self.last_error.clear();
        self.last_failure = None;
    }

    fn finish(&mut self, operation: &str, result: Result<()>) -> bool {
        match result {
            Ok(()) => {
                log::debug!("[XMLSERVICE] {} succeeded", operation);
                true
            }
            Err(err) => self.fail(operation, err),
        }
    }

    fn fail(&mut self, operation: &str, err: XmlServiceError) -> bool {
        log::warn!("[XMLSERVICE] {} failed ({:?}): {}", operation, err.kind(), err);
        self.last_error = err.to_string();
        self.last_failure = Some(err);
        false
    }
}

fn validate_base_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(XmlServiceError::InvalidConfig {
            field: "base_url",
            reason: "must not be empty".to_string(),
        });
    }
    let parsed = reqwest::Url::parse(url).map_err(|e| XmlServiceError::InvalidConfig {
        field: "base_url",
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(XmlServiceError::InvalidConfig {
            field: "base_url",
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_DB2, DEFAULT_IPC};
    use crate::error::ErrorKind;
    use crate::secret::MemorySecretStore;

    const GOOD_XML: &str = "<script><col><name>A</name></col><col><name>B</name></col>\
                            <data desc='A'>1</data><data desc='B'>2</data></script>";

    #[test]
    fn test_new_client_defaults() {
        let client = XmlServiceClient::new().unwrap();
        assert_eq!(client.session().ipc, "/tmp/rjsxmlservice");
        assert_eq!(client.session().db2, "*LOCAL");
        assert_eq!(client.session().timeout_ms, 60_000);
        assert!(!client.is_loaded());
        assert!(client.table().is_none());
        assert_eq!(client.last_error(), "");
        assert_eq!(client.last_xml_response(), "");
    }

    #[test]
    fn test_set_base_url_valid() {
        let mut client = XmlServiceClient::new().unwrap();
        assert!(client.set_base_url("http://1.1.1.1:30000/cgi-bin/xmlcgi.pgm"));
        assert_eq!(
            client.session().base_url,
            "http://1.1.1.1:30000/cgi-bin/xmlcgi.pgm"
        );
        assert_eq!(client.last_error(), "");
    }

    #[test]
    fn test_set_base_url_rejects_empty_and_keeps_previous() {
        let mut client = XmlServiceClient::new().unwrap();
        assert!(client.set_base_url("https://host/cgi-bin/xmlcgi.pgm"));
        assert!(!client.set_base_url(""));
        assert_eq!(client.session().base_url, "https://host/cgi-bin/xmlcgi.pgm");
        assert_eq!(client.last_failure().map(|e| e.kind()), Some(ErrorKind::Config));
        assert!(client.last_error().contains("base_url"));
    }

    #[test]
    fn test_set_base_url_rejects_other_schemes() {
        let mut client = XmlServiceClient::new().unwrap();
        assert!(!client.set_base_url("ftp://host/xmlcgi.pgm"));
        assert!(!client.set_base_url("not a url"));
        // 성공한 setter 호출은 이전 에러를 지움
        assert!(client.set_base_url("http://host/"));
        assert_eq!(client.last_error(), "");
    }

    #[test]
    fn test_plain_setters() {
        let mut client = XmlServiceClient::new().unwrap();
        client.set_user_info("QUSER", "pw");
        client.set_ipc_info("/tmp/xmlservicei");
        client.set_db2_info("REMOTEDB");
        client.set_http_timeout(1_500);
        client.set_http_method(HttpMethod::Get);
        let s = client.session();
        assert_eq!((s.user.as_str(), s.password.as_str()), ("QUSER", "pw"));
        assert_eq!(s.ipc, "/tmp/xmlservicei");
        assert_eq!(s.db2, "REMOTEDB");
        assert_eq!(s.timeout_ms, 1_500);
        assert_eq!(s.method, HttpMethod::Get);
    }

    #[test]
    fn test_empty_ipc_keeps_current_token() {
        let mut client = XmlServiceClient::new().unwrap();
        client.set_ipc_info("");
        assert_eq!(client.session().ipc, DEFAULT_IPC);
        client.set_ipc_info("/tmp/other");
        client.set_ipc_info("");
        assert_eq!(client.session().ipc, "/tmp/other");
    }

    #[test]
    fn test_db2_info_stored_verbatim() {
        let mut client = XmlServiceClient::new().unwrap();
        assert_eq!(client.session().db2, DEFAULT_DB2);
        client.set_db2_info("OTHER");
        assert_eq!(client.session().db2, "OTHER");
        client.set_db2_info("");
        assert_eq!(client.session().db2, "");
    }

    #[test]
    fn test_user_info_from_secret_store() {
        let mut store = MemorySecretStore::new();
        let handle = store.store("pw123");
        let mut client = XmlServiceClient::new().unwrap();
        assert!(client.set_user_info_from_store("QUSER", &store, &handle));
        assert_eq!(client.session().password, "pw123");

        let other = MemorySecretStore::new();
        assert!(!client.set_user_info_from_store("X", &other, &handle));
        assert_eq!(client.session().user, "QUSER");
        assert_eq!(client.last_failure().map(|e| e.kind()), Some(ErrorKind::Config));
    }

    #[tokio::test]
    async fn test_operation_without_base_url_fails() {
        let mut client = XmlServiceClient::new().unwrap();
        assert!(!client.execute_command("DSPLIBL").await);
        assert!(matches!(
            client.last_failure(),
            Some(XmlServiceError::InvalidConfig { field: "base_url", .. })
        ));
        assert_eq!(client.last_http_response(), "");
    }

    #[test]
    fn test_load_table_from_str() {
        let mut client = XmlServiceClient::new().unwrap();
        assert!(client.load_table_from_str(GOOD_XML));
        let table = client.table().unwrap();
        assert_eq!(table.columns(), ["A", "B"]);
        assert_eq!(table.cell(0, "B"), Some("2"));
    }

    #[test]
    fn test_failed_load_keeps_previous_table() {
        let mut client = XmlServiceClient::new().unwrap();
        assert!(client.load_table_from_str(GOOD_XML));
        let before = client.table().cloned();

        assert!(!client.load_table_from_str("<script><col><name>A</name></col></script>"));
        assert_eq!(client.table().cloned(), before);
        assert_eq!(client.last_failure().map(|e| e.kind()), Some(ErrorKind::Decode));
        assert!(client.last_error().contains("data"));
    }

    #[test]
    fn test_load_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.xml");
        std::fs::write(&path, GOOD_XML).unwrap();

        let mut client = XmlServiceClient::new().unwrap();
        assert!(client.load_table_from_file(&path));
        assert_eq!(client.table().map(|t| t.row_count()), Some(1));

        assert!(!client.load_table_from_file(dir.path().join("missing.xml")));
        assert!(matches!(client.last_failure(), Some(XmlServiceError::Io(_))));
        assert!(client.is_loaded());
    }
}
