//! Solr admin 엔드포인트 정의
//!
//! 각 엔드포인트는 base URL 기준 상대 경로로 표현됩니다.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// JVM / OS 시스템 통계
pub const SYSTEM_ENDPOINT: &str = "admin/info/system?wt=json";
/// 스레드 수 통계
pub const THREAD_ENDPOINT: &str = "admin/info/threads?wt=json";
/// 캐시 / 컴포넌트 통계 (core 지정 가능)
pub const MBEANS_ENDPOINT: &str = "admin/mbeans?stats=true&wt=json&json.nl=map";

/// 조회 대상 엔드포인트
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    System,
    Threads,
    #[serde(alias = "caches")]
    MBeans,
}

impl Endpoint {
    /// 한 번의 수집 시도에서 조회하는 순서
    pub const ALL: [Endpoint; 3] = [Endpoint::System, Endpoint::Threads, Endpoint::MBeans];

    /// base URL에 join할 상대 경로
    ///
    /// core 이름은 mbeans 엔드포인트에만 적용됩니다.
    pub fn relative_path(&self, core_name: Option<&str>) -> Cow<'static, str> {
        match (self, core_name) {
            (Endpoint::System, _) => Cow::Borrowed(SYSTEM_ENDPOINT),
            (Endpoint::Threads, _) => Cow::Borrowed(THREAD_ENDPOINT),
            (Endpoint::MBeans, Some(core)) => Cow::Owned(format!("{}/{}", core, MBEANS_ENDPOINT)),
            (Endpoint::MBeans, None) => Cow::Borrowed(MBEANS_ENDPOINT),
        }
    }

    /// 로그 및 설정에서 쓰는 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::System => "system",
            Endpoint::Threads => "threads",
            Endpoint::MBeans => "mbeans",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mbeans_path_with_core() {
        assert_eq!(
            Endpoint::MBeans.relative_path(Some("mycore")),
            "mycore/admin/mbeans?stats=true&wt=json&json.nl=map"
        );
    }

    #[test]
    fn test_mbeans_path_without_core() {
        assert_eq!(
            Endpoint::MBeans.relative_path(None),
            "admin/mbeans?stats=true&wt=json&json.nl=map"
        );
    }

    #[test]
    fn test_core_never_applies_to_info_endpoints() {
        assert_eq!(
            Endpoint::System.relative_path(Some("mycore")),
            "admin/info/system?wt=json"
        );
        assert_eq!(
            Endpoint::Threads.relative_path(Some("mycore")),
            "admin/info/threads?wt=json"
        );
    }

    #[test]
    fn test_endpoint_deserialize() {
        let e: Endpoint = serde_yaml::from_str("mbeans").unwrap();
        assert_eq!(e, Endpoint::MBeans);
        let e: Endpoint = serde_yaml::from_str("caches").unwrap();
        assert_eq!(e, Endpoint::MBeans);
        let e: Endpoint = serde_yaml::from_str("threads").unwrap();
        assert_eq!(e, Endpoint::Threads);
    }
}
