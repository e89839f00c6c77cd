//! XMLSERVICE 호출 결과를 JSON으로 출력하는 CLI 예제
//!
//! 사용법:
//! ```bash
//! XMLSERVICE_URL=http://1.1.1.1:30000/cgi-bin/xmlcgi.pgm \
//! XMLSERVICE_USER=QUSER XMLSERVICE_PASSWORD=secret \
//! cargo run --example run_query -- sql "SELECT * FROM QIWS.QCUSTCDT"
//! ```
//!
//! 명령:
//! - `sql <SELECT 문>`: 쿼리 실행 후 테이블 출력
//! - `cmd <CL 명령>`: CL 명령 실행
//! - `kill`: IPC 워커 종료

use std::env;

use ixmlservice::client::XmlServiceClient;
use ixmlservice::Table;
use serde::Serialize;

/// JSON 출력용 데이터 구조
#[derive(Debug, Serialize)]
struct OutputData {
    /// 성공 여부
    success: bool,
    /// 메시지 (에러 시 에러 메시지)
    message: String,
    /// 마지막 HTTP 상태 라인
    http: String,
    /// 쿼리 결과 (쿼리일 때만)
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<Table>,
}

fn print_usage() {
    eprintln!("XMLSERVICE 호출 CLI");
    eprintln!();
    eprintln!("사용법:");
    eprintln!("  cargo run --example run_query -- sql <SELECT 문>");
    eprintln!("  cargo run --example run_query -- cmd <CL 명령>");
    eprintln!("  cargo run --example run_query -- kill");
    eprintln!();
    eprintln!("환경 변수:");
    eprintln!("  XMLSERVICE_URL        XMLCGI URL (필수)");
    eprintln!("  XMLSERVICE_USER       사용자 프로필 (필수)");
    eprintln!("  XMLSERVICE_PASSWORD   비밀번호 (필수)");
    eprintln!("  XMLSERVICE_IPC        IPC 토큰 (기본: /tmp/rjsxmlservice)");
    eprintln!("  XMLSERVICE_DB2        DB2 인스턴스 (기본: *LOCAL)");
    eprintln!("  XMLSERVICE_TIMEOUT_MS HTTP 타임아웃 (기본: 60000)");
}

fn env_or_empty(key: &str) -> String {
    env::var(key).unwrap_or_default()
}

#[tokio::main]
async fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args: Vec<String> = env::args().collect();
    let (op, arg) = match args.as_slice() {
        [_, op, arg] if op == "sql" || op == "cmd" => (op.as_str(), arg.as_str()),
        [_, op] if op == "kill" => (op.as_str(), ""),
        _ => {
            print_usage();
            std::process::exit(1);
        }
    };

    let result = run(op, arg).await;

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("JSON 직렬화 실패: {}", e);
            std::process::exit(1);
        }
    }

    if !result.success {
        std::process::exit(1);
    }
}

async fn run(op: &str, arg: &str) -> OutputData {
    let mut client = match XmlServiceClient::new() {
        Ok(c) => c,
        Err(e) => {
            return OutputData {
                success: false,
                message: format!("클라이언트 생성 실패: {}", e),
                http: String::new(),
                table: None,
            };
        }
    };

    if !client.set_base_url(&env_or_empty("XMLSERVICE_URL")) {
        return OutputData {
            success: false,
            message: client.last_error().to_string(),
            http: String::new(),
            table: None,
        };
    }
    client.set_user_info(
        &env_or_empty("XMLSERVICE_USER"),
        &env_or_empty("XMLSERVICE_PASSWORD"),
    );
    client.set_ipc_info(&env_or_empty("XMLSERVICE_IPC"));
    if let Ok(db2) = env::var("XMLSERVICE_DB2") {
        client.set_db2_info(&db2);
    }
    if let Some(ms) = env::var("XMLSERVICE_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
    {
        client.set_http_timeout(ms);
    }

    let success = match op {
        "sql" => client.execute_sql_query(arg).await,
        "cmd" => client.execute_command(arg).await,
        _ => client.kill_service().await,
    };

    let message = if success {
        client.last_xml_response().to_string()
    } else {
        client.last_error().to_string()
    };

    OutputData {
        success,
        message,
        http: client.last_http_response().to_string(),
        table: if op == "sql" && success {
            client.table().cloned()
        } else {
            None
        },
    }
}
