//! Error types for rSolr-Exporter
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// 단일 엔드포인트 조회 실패
///
/// 어떤 variant든 한 번의 수집 시도를 실패로 만들며, 재시도 대상입니다.
#[derive(Error, Debug)]
pub enum FetchError {
    /// 연결 실패 또는 전송 계층 에러
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 타임아웃
    /// The value is the configured timeout in milliseconds, if known.
    #[error("Request to {url} timed out{}", .timeout_ms.map(|ms| format!(" after {}ms", ms)).unwrap_or_default())]
    Timeout { url: String, timeout_ms: Option<u64> },

    /// HTTP 상태 코드 에러
    #[error("HTTP error status {status} from {url}")]
    Protocol { url: String, status: u16 },

    /// JSON 파싱 에러
    #[error("Malformed JSON from {url}: {message}")]
    Parse { url: String, message: String },

    /// 엔드포인트 URL 생성 실패
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Coarse classification of a [`FetchError`], used as a log field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    Protocol,
    Parse,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchErrorKind::Network => write!(f, "network"),
            FetchErrorKind::Protocol => write!(f, "protocol"),
            FetchErrorKind::Parse => write!(f, "parse"),
        }
    }
}

impl FetchError {
    /// reqwest 에러를 URL 정보와 함께 변환
    pub fn from_reqwest(url: &str, err: reqwest::Error, timeout_ms: Option<u64>) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout_ms,
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// 에러 종류
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network { .. } | FetchError::Timeout { .. } => FetchErrorKind::Network,
            FetchError::Protocol { .. } => FetchErrorKind::Protocol,
            FetchError::Parse { .. } | FetchError::InvalidUrl(_) => FetchErrorKind::Parse,
        }
    }

    /// HTTP 상태 코드 추출
    pub fn http_status(&self) -> Option<u16> {
        match self {
            FetchError::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Mapping table 구성 에러
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MappingError {
    /// 같은 테이블 안에서 metric 이름 중복
    #[error("Duplicate metric name '{name}' in {table} mappings")]
    DuplicateName { table: String, name: String },

    /// 유효하지 않은 metric 이름
    #[error("Invalid metric name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// 빈 경로
    #[error("Mapping '{name}' has an empty path")]
    EmptyPath { name: String },
}

/// HTTP 클라이언트 생성 에러
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP 클라이언트 초기화 실패
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    /// 잘못된 base URL
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that end the polling loop
#[derive(Error, Debug)]
pub enum PollError {
    /// 최대 재시도 초과
    #[error("Max retries exceeded retrieving data after {attempts} attempts: {last}")]
    MaxRetriesExceeded {
        attempts: u32,
        #[source]
        last: FetchError,
    },

    /// The metric sink could not accept a metric
    #[error("Failed to report metric '{name}': {source}")]
    Sink {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for a single fetch
pub type FetchResult<T> = Result<T, FetchError>;
