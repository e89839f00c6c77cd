//! HTTP 전송 모듈: XMLCGI 프로그램으로의 단일 요청/응답 왕복
//!
//! [`Transport`]는 reqwest 기반으로, 모든 요청에 다음을 적용합니다.
//!
//! - `Accept: */*`
//! - 리다이렉트 추적 (최대 10회)
//! - Basic 인증 (폼 필드 `uid`/`pwd`와 같은 자격 증명)
//! - 연결 + 읽기 전체에 적용되는 단일 타임아웃
//!
//! 비정상 상태 코드(non-2xx)도 실패로 취급하지 않습니다. 백엔드는 진단 텍스트를
//! 에러 응답 본문에 담으므로, 본문을 읽을 수 있으면 그대로 [`RawResponse`]로 돌려줍니다.

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::constants::FORM_CONTENT_TYPE;
use crate::error::{Result, XmlServiceError};
use crate::types::{HttpMethod, RawResponse};

/// 최대 리다이렉트 횟수
const MAX_REDIRECTS: usize = 10;

/// 요청에 첨부할 Basic 인증 자격 증명
#[derive(Clone, Copy)]
pub struct Credentials<'a> {
    pub user: &'a str,
    pub password: &'a str,
}

/// HTTP 전송 계층
///
/// 내부 reqwest 클라이언트는 연결 풀을 공유하므로 세션 동안 하나만 만들어 재사용합니다.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
}

impl Transport {
    /// 새 Transport를 생성합니다.
    ///
    /// # 에러
    ///
    /// - [`XmlServiceError::Http`]: TLS 백엔드 초기화 실패
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { http })
    }

    /// 요청을 보내고 응답 본문 전체를 텍스트로 받습니다.
    ///
    /// - `Post`: `body`를 `application/x-www-form-urlencoded` 본문으로, Content-Length 명시
    /// - `Get`: `body`를 URL 쿼리 스트링으로 덧붙임
    ///
    /// 본문은 응답 `Content-Type`의 charset(예: `ISO-8859-1`)으로 디코딩하며, 없으면 UTF-8입니다.
    ///
    /// # 에러
    ///
    /// - [`XmlServiceError::InvalidConfig`]: `Get`인데 `body`에 `#`가 있음
    /// - [`XmlServiceError::Timeout`]: `timeout_ms` 안에 교환이 끝나지 않음
    /// - [`XmlServiceError::Http`]: 그 밖의 네트워크 에러
    pub async fn send(
        &self,
        url: &str,
        method: HttpMethod,
        body: &str,
        credentials: Credentials<'_>,
        timeout_ms: u64,
    ) -> Result<RawResponse> {
        let request = match method {
            HttpMethod::Post => self
                .http
                .post(url)
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .header(CONTENT_LENGTH, body.len().to_string())
                .body(body.to_string()),
            HttpMethod::Get => {
                // NOTE: URL parser would cut everything after '#' as a fragment
                if body.contains('#') {
                    return Err(XmlServiceError::InvalidConfig {
                        field: "method",
                        reason: "GET parameters must not contain '#'; use POST".to_string(),
                    });
                }
                let separator = if url.contains('?') { '&' } else { '?' };
                self.http.get(format!("{url}{separator}{body}"))
            }
        };

        log::debug!(
            "[HTTP] {:?} url={} body_len={} timeout_ms={}",
            method,
            url,
            body.len(),
            timeout_ms
        );
        let start = Instant::now();

        let resp = request
            .header(ACCEPT, "*/*")
            .basic_auth(credentials.user, Some(credentials.password))
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(|e| transport_error(e, timeout_ms))?;

        let status = resp.status();
        let status_line = format!("{:?} {}", resp.version(), status);
        let body = resp
            .text()
            .await
            .map_err(|e| transport_error(e, timeout_ms))?;

        log::debug!(
            "[HTTP] response received in {:?}, status_line={:?}, body_len={}",
            start.elapsed(),
            status_line,
            body.len()
        );
        if !status.is_success() {
            log::warn!("[HTTP] non-success status {}, keeping body for diagnostics", status);
        }

        Ok(RawResponse {
            status_line,
            status: status.as_u16(),
            body,
        })
    }
}

fn transport_error(err: reqwest::Error, timeout_ms: u64) -> XmlServiceError {
    if err.is_timeout() {
        log::warn!("[HTTP] request timed out after {} ms", timeout_ms);
        XmlServiceError::Timeout { timeout_ms }
    } else {
        log::warn!("[HTTP] transport error: {}", err);
        XmlServiceError::Http(err)
    }
}
