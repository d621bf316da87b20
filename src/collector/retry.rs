//! 재시도 정책
//!
//! 실패한 수집 시도를 고정 지연 후 다시 실행합니다. 최대 시도 횟수가 0이면
//! 성공할 때까지 무한히 재시도합니다.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::{FetchError, PollError};

/// 재시도 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 최대 시도 횟수 (0 = 무제한)
    pub max_attempts: u32,
    /// 시도 사이 고정 지연 시간
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            delay: Duration::from_secs(5),
        }
    }
}

/// 실패 후 다음 동작
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// 지연 후 재시도
    Retry,
    /// 재시도 한도 소진
    GiveUp,
}

/// 재시도 상태 머신
///
/// 시도 횟수를 세고, 실패가 보고될 때마다 재시도 여부를 결정합니다.
#[derive(Debug, Clone)]
pub struct RetryState {
    max_attempts: u32,
    attempts: u32,
}

impl RetryState {
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            attempts: 0,
        }
    }

    /// 새 시도 시작, 1부터 시작하는 시도 번호 반환
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    /// 현재 시도가 실패했을 때의 결정
    pub fn on_failure(&self) -> RetryDecision {
        if self.max_attempts != 0 && self.attempts >= self.max_attempts {
            RetryDecision::GiveUp
        } else {
            RetryDecision::Retry
        }
    }

    /// 지금까지의 시도 횟수
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// 무제한 재시도 여부
    pub fn is_unbounded(&self) -> bool {
        self.max_attempts == 0
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// `op`를 정책에 따라 실행
    ///
    /// `op`는 1부터 시작하는 시도 번호를 받습니다. 한 시도의 부분 결과는
    /// 다음 시도와 합쳐지지 않습니다.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, PollError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut state = RetryState::new(self);

        loop {
            let attempt = state.begin_attempt();

            let err = match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Retrieved data after retrying");
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            error!(
                attempt,
                max = self.max_attempts,
                kind = %err.kind(),
                error = %err,
                "Error retrieving data"
            );

            match state.on_failure() {
                RetryDecision::Retry => tokio::time::sleep(self.delay).await,
                RetryDecision::GiveUp => {
                    return Err(PollError::MaxRetriesExceeded {
                        attempts: state.attempts(),
                        last: err,
                    });
                }
            }
        }
    }
}
