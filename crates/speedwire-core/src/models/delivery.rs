//! 전송 시도 기록.
//!
//! 저장되지 않으며 로깅과 결과 보고에만 쓰인다.

use std::time::Duration;

/// 한 번의 전송 시도 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    RetryableFailure,
    TerminalFailure,
}

/// 전송 시도 한 건
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAttempt {
    /// 1부터 시작하는 시도 번호
    pub attempt: u32,
    pub outcome: AttemptOutcome,
    /// 다음 시도 전 대기 시간 (다음 시도가 없으면 None)
    pub backoff: Option<Duration>,
}

/// 성공한 전송의 요약
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// 성공까지 걸린 시도 횟수
    pub attempts: u32,
    /// 전송한 시계열 수
    pub series: usize,
    /// 첫 시도부터 성공까지 걸린 시간
    pub elapsed: Duration,
}
