//! 재시도 정책.
//!
//! 지수 백오프 + 지터. 여러 인스턴스가 동시에 실패해도 재시도가 한 시점에
//! 몰리지 않도록 대기 시간을 무작위로 분산한다.
//! 백오프 계산은 trait으로 주입되어 테스트에서 0 대기로 바꿀 수 있다.

use rand::Rng;
use speedwire_core::error::CoreError;
use speedwire_core::models::delivery::{AttemptOutcome, DeliveryAttempt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 기본 재시도 횟수 (첫 시도 제외)
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// 최대 대기 시간 (초)
pub const MAX_BACKOFF_SECS: u64 = 30;

/// 재시도 전 대기 시간 계산
pub trait Backoff: Send + Sync {
    /// `retry`번째 재시도(1부터) 전 대기 시간
    fn delay(&self, retry: u32) -> Duration;
}

/// `[2^(a-1), 2^a)`초 범위의 균등 난수, 30초 상한
#[derive(Debug, Default, Clone, Copy)]
pub struct JitteredExponentialBackoff;

impl Backoff for JitteredExponentialBackoff {
    fn delay(&self, retry: u32) -> Duration {
        let exponent = retry.max(1) - 1;
        let base = match 1u64.checked_shl(exponent) {
            Some(base) if base < MAX_BACKOFF_SECS => base,
            _ => return Duration::from_secs(MAX_BACKOFF_SECS),
        };
        let secs = rand::thread_rng().gen_range(base..base * 2);
        Duration::from_secs(secs.min(MAX_BACKOFF_SECS))
    }
}

/// 항상 같은 시간만큼 대기 (테스트용 0 대기 포함)
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff(pub Duration);

impl Backoff for FixedBackoff {
    fn delay(&self, _retry: u32) -> Duration {
        self.0
    }
}

/// 재시도 정책
#[derive(Clone)]
pub struct RetryPolicy {
    /// 첫 시도 이후 추가 시도 횟수
    pub max_retries: u32,
    pub backoff: Arc<dyn Backoff>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Arc::new(JitteredExponentialBackoff),
        }
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Arc<dyn Backoff>) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// 총 시도 가능 횟수
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// 재시도를 포함한 비동기 작업 실행
///
/// 성공 시 결과와 시도 횟수를 반환한다. 실패는 재시도 불가 에러로 중단했든
/// 시도를 모두 소진했든 `DeliveryFailed { attempts, last }`로 감싼다.
pub async fn run_with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<(T, u32), CoreError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    info!("{}회 재시도 후 전송 성공", attempt - 1);
                }
                record(DeliveryAttempt {
                    attempt,
                    outcome: AttemptOutcome::Success,
                    backoff: None,
                });
                return Ok((value, attempt));
            }
            Err(e) if !e.is_retryable() => {
                warn!("재시도 불가 에러, 중단: {e}");
                record(DeliveryAttempt {
                    attempt,
                    outcome: AttemptOutcome::TerminalFailure,
                    backoff: None,
                });
                return Err(CoreError::DeliveryFailed {
                    attempts: attempt,
                    last: Box::new(e),
                });
            }
            Err(e) if attempt >= max_attempts => {
                record(DeliveryAttempt {
                    attempt,
                    outcome: AttemptOutcome::TerminalFailure,
                    backoff: None,
                });
                return Err(CoreError::DeliveryFailed {
                    attempts: attempt,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                let delay = policy.backoff.delay(attempt);
                warn!(
                    "시도 {attempt}/{max_attempts} 실패: {e}, {:?} 후 재시도",
                    delay
                );
                record(DeliveryAttempt {
                    attempt,
                    outcome: AttemptOutcome::RetryableFailure,
                    backoff: Some(delay),
                });
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

fn record(attempt: DeliveryAttempt) {
    debug!(
        attempt = attempt.attempt,
        outcome = ?attempt.outcome,
        backoff = ?attempt.backoff,
        "전송 시도 기록"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn zero_delay(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Arc::new(FixedBackoff(Duration::ZERO)))
    }

    #[test]
    fn jittered_delay_within_bounds() {
        let backoff = JitteredExponentialBackoff;
        for _ in 0..100 {
            assert_eq!(backoff.delay(1), Duration::from_secs(1));
            let d2 = backoff.delay(2).as_secs();
            assert!((2..4).contains(&d2), "{d2}");
            let d3 = backoff.delay(3).as_secs();
            assert!((4..8).contains(&d3), "{d3}");
            let d5 = backoff.delay(5).as_secs();
            assert!((16..=30).contains(&d5), "{d5}");
        }
    }

    #[test]
    fn jittered_delay_capped() {
        let backoff = JitteredExponentialBackoff;
        for retry in 6..70 {
            assert_eq!(backoff.delay(retry), Duration::from_secs(MAX_BACKOFF_SECS));
        }
    }

    #[test]
    fn jittered_delay_always_positive() {
        let backoff = JitteredExponentialBackoff;
        for retry in 0..10 {
            assert!(backoff.delay(retry) > Duration::ZERO);
        }
    }

    #[tokio::test]
    async fn succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let (value, attempts) = run_with_retry(&zero_delay(3), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, CoreError>(7) }
        })
        .await
        .unwrap();
        assert_eq!(value, 7);
        assert_eq!(attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let (_, attempts) = run_with_retry(&zero_delay(3), |attempt| async move {
            if attempt < 3 {
                Err(CoreError::Transport("connection reset".to_string()))
            } else {
                Ok(())
            }
        })
        .await
        .unwrap();
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn persistent_transport_error_exhausts() {
        let calls = AtomicU32::new(0);
        let result: Result<((), u32), _> = run_with_retry(&zero_delay(3), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(CoreError::Transport("timeout".to_string())) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_matches!(
            result,
            Err(CoreError::DeliveryFailed { attempts: 4, last }) if matches!(*last, CoreError::Transport(_))
        );
    }

    #[tokio::test]
    async fn forbidden_stops_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<((), u32), _> = run_with_retry(&zero_delay(3), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(CoreError::RemoteRejection {
                    status: 403,
                    body: "Forbidden".to_string(),
                })
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_matches!(
            result,
            Err(CoreError::DeliveryFailed { attempts: 1, last })
                if matches!(*last, CoreError::RemoteRejection { status: 403, .. })
        );
    }

    #[tokio::test]
    async fn zero_retries_means_single_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<((), u32), _> = run_with_retry(&zero_delay(0), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(CoreError::Transport("down".to_string())) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_matches!(result, Err(CoreError::DeliveryFailed { attempts: 1, .. }));
    }

    /// 요청된 대기 시간을 기록하는 백오프
    struct RecordingBackoff {
        seen: std::sync::Mutex<Vec<u32>>,
    }

    impl Backoff for RecordingBackoff {
        fn delay(&self, retry: u32) -> Duration {
            self.seen.lock().unwrap().push(retry);
            Duration::ZERO
        }
    }

    #[tokio::test]
    async fn backoff_called_with_one_based_retry_index() {
        let backoff = Arc::new(RecordingBackoff {
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let policy = RetryPolicy::new(3, backoff.clone());
        let _: Result<((), u32), _> = run_with_retry(&policy, |_| async {
            Err(CoreError::RemoteRejection {
                status: 500,
                body: String::new(),
            })
        })
        .await;

        assert_eq!(*backoff.seen.lock().unwrap(), vec![1, 2, 3]);
    }
}
