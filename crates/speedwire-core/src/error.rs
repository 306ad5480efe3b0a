//! speedwire 핵심 에러 타입.
//!
//! 파이프라인 전 구간(측정 도구 실행 → 파싱 → 인코딩 → 전송)의 실패를
//! 하나의 열거형으로 표현한다. 재시도 여부 판별도 여기서 한다.

use thiserror::Error;

/// 재시도해도 해결되지 않는 HTTP 상태 코드 (설정/인증 문제)
pub const NON_RETRYABLE_STATUSES: [u16; 4] = [400, 401, 403, 404];

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 측정 도구 출력이 기대한 형태의 JSON이 아님
    #[error("측정 결과 파싱 실패: {0}")]
    Parse(String),

    /// 결과 배열이 비어 있음
    #[error("측정 결과가 비어 있음")]
    EmptyResult,

    /// 외부 프로세스 실행 실패 (실행 불가, 0이 아닌 종료 코드)
    #[error("측정 도구 실행 실패: {0}")]
    Execution(String),

    /// 외부 프로세스 실행 타임아웃
    #[error("실행 타임아웃: {timeout_ms}ms 초과")]
    ExecutionTimeout {
        /// 초과된 타임아웃 시간 (밀리초)
        timeout_ms: u64,
    },

    /// 전송할 시계열이 없음
    #[error("전송할 시계열 데이터 없음")]
    EmptyBatch,

    /// protobuf 직렬화 또는 압축 실패
    #[error("인코딩 실패: {0}")]
    Encoding(String),

    /// 네트워크 에러 (URL 오류, 연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Transport(String),

    /// 원격 엔드포인트가 요청을 거부함 (HTTP 상태 >= 300)
    #[error("remote_write 거부 (HTTP {status}): {body}")]
    RemoteRejection {
        /// HTTP 상태 코드
        status: u16,
        /// 응답 본문 (진단용)
        body: String,
    },

    /// 전송 최종 실패 (재시도 불가 에러 또는 재시도 소진)
    #[error("{attempts}회 시도 후 전송 실패, 마지막 에러: {last}")]
    DeliveryFailed {
        /// 실제 시도 횟수
        attempts: u32,
        /// 마지막 시도의 에러
        last: Box<CoreError>,
    },

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 재시도 가능한 에러인지 판별
    ///
    /// 400/401/403/404 거부, 인코딩 실패, 빈 배치는 재시도해도 결과가 같다.
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::RemoteRejection { status, .. } => !NON_RETRYABLE_STATUSES.contains(status),
            CoreError::Encoding(_) | CoreError::EmptyBatch => false,
            CoreError::Validation { .. } | CoreError::Config(_) => false,
            _ => true,
        }
    }

    /// 원격 거부 에러의 HTTP 상태 코드
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::RemoteRejection { status, .. } => Some(*status),
            CoreError::DeliveryFailed { last, .. } => last.status(),
            _ => None,
        }
    }
}
