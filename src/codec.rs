//! 프로토콜 코덱 모듈: 폼 파라미터 조립 + XML 스크립트 빌더
//!
//! ## 파라미터 조립
//!
//! - [`assemble`]: `db2 uid pwd ipc ctl xmlin xmlout` 고정 템플릿 폼 본문
//!
//! ## XML 스크립트 빌더
//!
//! - [`build_command_script`]: CL 명령 실행 (`<cmd>`)
//! - [`build_query_script`]: SQL 쿼리 (`<sql>` 시퀀스)
//! - [`build_program_script`]: 프로그램 호출 (`<pgm>`)
//! - [`build_procedure_script`]: 저장 프로시저 호출 (`<sql>` prepare/execute + `<parm io=..>`)
//!
//! > **주의**: 명령/SQL/파라미터 값은 이스케이프 없이 스크립트에 그대로 삽입됩니다.
//! > XML 메타문자(`<`, `&` 등)가 포함되지 않도록 하는 것은 호출자의 책임입니다.
//! > `GET` 전송은 폼 본문을 URL 쿼리에 그대로 붙이므로 `#`(예: `CUS#` 컬럼명)가 든 스크립트는
//! > 거부됩니다. 이런 스크립트는 `POST`로 보내야 합니다.

use crate::constants::{SQL_CONNECTION_NAME, XML_PROLOGUE};
use crate::types::{ControlMode, PgmParm, ProcedureParm, SessionConfig};

/// 폼 템플릿 필드 (전송 순서대로)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Db2,
    Uid,
    Pwd,
    Ipc,
    Ctl,
    XmlIn,
    XmlOut,
}

impl FormField {
    /// 템플릿 순서
    pub const ALL: [FormField; 7] = [
        FormField::Db2,
        FormField::Uid,
        FormField::Pwd,
        FormField::Ipc,
        FormField::Ctl,
        FormField::XmlIn,
        FormField::XmlOut,
    ];

    /// 폼 키
    pub fn key(self) -> &'static str {
        match self {
            FormField::Db2 => "db2",
            FormField::Uid => "uid",
            FormField::Pwd => "pwd",
            FormField::Ipc => "ipc",
            FormField::Ctl => "ctl",
            FormField::XmlIn => "xmlin",
            FormField::XmlOut => "xmlout",
        }
    }
}

/// 폼 본문을 조립합니다.
///
/// 형식:
/// ```text
/// db2={db2}&uid={user}&pwd={password}&ipc={ipc}&ctl={ctl}&xmlin={xml_in}&xmlout={xml_out}
/// ```
///
/// 값은 템플릿 위치에 그대로 들어가며 추가 인코딩은 하지 않습니다.
/// 필드 값은 [`FormField`]의 exhaustive match로 결정되므로 치환되지 않은 자리는 생길 수 없습니다.
///
/// # 예시
///
/// ```
/// use ixmlservice::codec::assemble;
/// use ixmlservice::{ControlMode, SessionConfig};
///
/// let session = SessionConfig {
///     user: "QUSER".into(),
///     password: "pw".into(),
///     ..SessionConfig::default()
/// };
/// let body = assemble("<script/>", "32768", &session, ControlMode::SubmitJob);
/// assert_eq!(
///     body,
///     "db2=*LOCAL&uid=QUSER&pwd=pw&ipc=/tmp/rjsxmlservice&ctl=*sbmjob&xmlin=<script/>&xmlout=32768"
/// );
/// ```
pub fn assemble(xml_in: &str, xml_out: &str, session: &SessionConfig, ctl: ControlMode) -> String {
    let mut body = String::with_capacity(64 + xml_in.len());
    for (i, field) in FormField::ALL.iter().enumerate() {
        if i > 0 {
            body.push('&');
        }
        body.push_str(field.key());
        body.push('=');
        body.push_str(match field {
            FormField::Db2 => &session.db2,
            FormField::Uid => &session.user,
            FormField::Pwd => &session.password,
            FormField::Ipc => &session.ipc,
            FormField::Ctl => ctl.as_str(),
            FormField::XmlIn => xml_in,
            FormField::XmlOut => xml_out,
        });
    }
    body
}

/// CL 명령 실행 스크립트를 빌드합니다.
///
/// ```text
/// {prologue}<script><cmd>{command}</cmd></script>
/// ```
pub fn build_command_script(command: &str) -> String {
    format!("{XML_PROLOGUE}<script><cmd>{command}</cmd></script>")
}

/// SQL 쿼리 스크립트를 빌드합니다.
///
/// `options → connect → prepare → execute → describe → fetch → free` 순서의
/// `<sql>` 요소 시퀀스이며, `describe`는 `col` 테이블을, `fetch`는 `data` 셀 스트림을 만듭니다.
pub fn build_query_script(sql: &str) -> String {
    let conn = SQL_CONNECTION_NAME;
    format!(
        "{XML_PROLOGUE}<script>\
         <sql><options options='noauto' autocommit='off'/></sql>\
         <sql><connect conn='{conn}' options='noauto'/></sql>\
         <sql><prepare conn='{conn}'>{sql}</prepare></sql>\
         <sql><execute/></sql>\
         <sql><describe desc='col'/></sql>\
         <sql><fetch block='all' desc='on'/></sql>\
         <sql><free/></sql>\
         </script>"
    )
}

/// 프로그램 호출 스크립트를 빌드합니다.
///
/// ```text
/// {prologue}<script><pgm name='{name}' lib='{library}'>
///   <parm><data type='{type}'>{value}</data></parm> ...
/// </pgm></script>
/// ```
pub fn build_program_script(name: &str, library: &str, parms: &[PgmParm]) -> String {
    let mut script = format!("{XML_PROLOGUE}<script><pgm name='{name}' lib='{library}'>");
    for parm in parms {
        script.push_str(&format!(
            "<parm><data type='{}'>{}</data></parm>",
            parm.data_type, parm.value
        ));
    }
    script.push_str("</pgm></script>");
    script
}

/// 저장 프로시저 호출 스크립트를 빌드합니다.
///
/// ```text
/// {prologue}<script>
///   <sql><options .../></sql><sql><connect .../></sql>
///   <sql><prepare conn='myconn'>CALL {library}.{name}(?,?)</prepare></sql>
///   <sql><execute><parm io='in'>{value}</parm><parm io='out'></parm></execute></sql>
///   <sql><free/></sql>
/// </script>
/// ```
///
/// `library`가 비어 있으면 SQL 경로로 프로시저를 찾습니다 (`CALL {name}(..)`).
pub fn build_procedure_script(name: &str, library: &str, parms: &[ProcedureParm]) -> String {
    let conn = SQL_CONNECTION_NAME;
    let target = if library.is_empty() {
        name.to_string()
    } else {
        format!("{library}.{name}")
    };
    let markers = vec!["?"; parms.len()].join(",");

    let mut script = format!(
        "{XML_PROLOGUE}<script>\
         <sql><options options='noauto' autocommit='off'/></sql>\
         <sql><connect conn='{conn}' options='noauto'/></sql>\
         <sql><prepare conn='{conn}'>CALL {target}({markers})</prepare></sql>\
         <sql><execute>"
    );
    for parm in parms {
        script.push_str(&format!(
            "<parm io='{}'>{}</parm>",
            parm.io.as_str(),
            parm.value
        ));
    }
    script.push_str("</execute></sql><sql><free/></sql></script>");
    script
}
