//! Solr admin HTTP 클라이언트
//!
//! Connection pooling과 타임아웃을 지원하는 비동기 HTTP 클라이언트입니다.

use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::endpoint::Endpoint;
use super::StatsSource;
use crate::error::{ClientError, FetchError, FetchResult};

/// Solr admin HTTP 클라이언트
#[derive(Clone)]
pub struct SolrClient {
    client: Client,
    base_url: Url,
    core_name: Option<String>,
    timeout_ms: u64,
}

impl SolrClient {
    /// 새 클라이언트 생성
    ///
    /// # Arguments
    /// * `base_url` - Solr base URL (예: "http://localhost:8983/solr/")
    /// * `timeout_ms` - 요청 타임아웃 (밀리초)
    ///
    /// # Example
    /// ```ignore
    /// let client = SolrClient::new("http://localhost:8983/solr/", 5000)?;
    /// ```
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self, ClientError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(ClientError::HttpClientInit)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
            core_name: None,
            timeout_ms,
        })
    }

    /// core 지정 (mbeans 엔드포인트에만 적용)
    ///
    /// 빈 문자열은 core 미지정으로 취급합니다.
    pub fn with_core(mut self, core_name: &str) -> Self {
        let core = core_name.trim_matches('/');
        self.core_name = (!core.is_empty()).then(|| core.to_string());
        self
    }

    /// 정규화된 base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 설정된 core 이름
    pub fn core_name(&self) -> Option<&str> {
        self.core_name.as_deref()
    }

    /// 엔드포인트의 전체 URL
    pub fn endpoint_url(&self, endpoint: Endpoint) -> FetchResult<Url> {
        let relative = endpoint.relative_path(self.core_name.as_deref());
        Ok(self.base_url.join(&relative)?)
    }

    /// 엔드포인트 조회 후 JSON 디코딩
    ///
    /// 응답 본문 전체를 읽은 뒤 파싱합니다.
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn fetch(&self, endpoint: Endpoint) -> FetchResult<Value> {
        let url = self.endpoint_url(endpoint)?;

        debug!(url = %url, "Sending Solr admin request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e, Some(self.timeout_ms)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Protocol {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e, Some(self.timeout_ms)))?;

        serde_json::from_str(&body).map_err(|e| FetchError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl StatsSource for SolrClient {
    async fn fetch(&self, endpoint: Endpoint) -> FetchResult<Value> {
        SolrClient::fetch(self, endpoint).await
    }
}

/// base URL 끝에 '/'를 보장
///
/// RFC 3986 join은 마지막 segment를 대체하므로 "/solr"와 "/solr/"가
/// 같은 결과를 내도록 맞춥니다.
fn normalize_base_url(base_url: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(base_url).map_err(|source| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}
