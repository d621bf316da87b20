//! Solr 통계 수집 모듈
//!
//! Solr admin 엔드포인트(system, threads, mbeans)에서 JSON 통계를 수집합니다.
//!
//! # Example
//!
//! ```ignore
//! use rsolr_exporter::collector::{Collector, RetryPolicy, SolrClient};
//!
//! let client = SolrClient::new("http://localhost:8983/solr/", 5000)?.with_core("mycore");
//! let collector = Collector::new(client, RetryPolicy::default());
//! let snapshot = collector.collect().await?;
//! ```

mod client;
mod endpoint;
mod retry;

use serde_json::Value;
use std::future::Future;
use tracing::debug;

pub use client::SolrClient;
pub use endpoint::{Endpoint, MBEANS_ENDPOINT, SYSTEM_ENDPOINT, THREAD_ENDPOINT};
pub use retry::{RetryDecision, RetryPolicy, RetryState};

use crate::error::{FetchResult, PollError};

/// 엔드포인트별 JSON 문서를 제공하는 소스
///
/// 실제 구현은 [`SolrClient`]이며, 테스트에서는 가짜 소스로 대체합니다.
pub trait StatsSource {
    fn fetch(&self, endpoint: Endpoint) -> impl Future<Output = FetchResult<Value>> + Send;
}

/// 한 번의 수집 시도에서 얻은 원본 통계
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub system: Value,
    pub threads: Value,
    pub mbeans: Value,
}

impl StatsSnapshot {
    /// 엔드포인트에 해당하는 문서
    pub fn document(&self, endpoint: Endpoint) -> &Value {
        match endpoint {
            Endpoint::System => &self.system,
            Endpoint::Threads => &self.threads,
            Endpoint::MBeans => &self.mbeans,
        }
    }
}

/// 세 엔드포인트를 순서대로 조회
///
/// 하나라도 실패하면 전체 시도가 실패하며 부분 결과는 버립니다.
pub async fn fetch_snapshot<S: StatsSource>(source: &S) -> FetchResult<StatsSnapshot> {
    let system = source.fetch(Endpoint::System).await?;
    let threads = source.fetch(Endpoint::Threads).await?;
    let mbeans = source.fetch(Endpoint::MBeans).await?;

    Ok(StatsSnapshot {
        system,
        threads,
        mbeans,
    })
}

/// Collector 구조체 - 재시도 정책이 적용된 수집 래퍼
pub struct Collector<S> {
    source: S,
    retry: RetryPolicy,
}

impl<S: StatsSource> Collector<S> {
    /// 새 Collector 생성
    pub fn new(source: S, retry: RetryPolicy) -> Self {
        Self { source, retry }
    }

    /// 재시도를 포함한 전체 통계 수집
    ///
    /// 재시도 한도를 소진하면 [`PollError::MaxRetriesExceeded`]를 반환합니다.
    pub async fn collect(&self) -> Result<StatsSnapshot, PollError> {
        let source = &self.source;
        let snapshot = self
            .retry
            .run(move |attempt| {
                debug!(attempt, "Collecting Solr stats");
                fetch_snapshot(source)
            })
            .await?;

        Ok(snapshot)
    }

    /// 소스 참조 반환
    pub fn source(&self) -> &S {
        &self.source
    }

    /// 재시도 정책 반환
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }
}
