//! 시계열 빌더.
//!
//! 측정 결과 하나를 download/upload/ping/jitter 4개 샘플의 배치로 변환한다.
//! 순수 변환이며 값 검증이나 보정은 하지 않는다.

use crate::models::measurement::MeasurementResult;
use crate::models::series::{Batch, Label, Sample};

/// 다운로드 속도 메트릭
pub const METRIC_DOWNLOAD: &str = "librespeed_download_mbps";
/// 업로드 속도 메트릭
pub const METRIC_UPLOAD: &str = "librespeed_upload_mbps";
/// 지연 시간 메트릭
pub const METRIC_PING: &str = "librespeed_ping_ms";
/// 지터 메트릭
pub const METRIC_JITTER: &str = "librespeed_jitter_ms";

/// 인스턴스 호스트명을 알 수 없을 때 쓰는 값 (호출 측에서 대체)
pub const UNKNOWN_INSTANCE: &str = "unknown";

/// 측정 결과 → 4개 샘플 배치
///
/// 모든 샘플이 같은 타임스탬프, `server_url`, `instance` 값을 공유한다.
pub fn build_batch(result: &MeasurementResult, timestamp_millis: i64, instance: &str) -> Batch {
    let server_url = result.server_url.as_str();
    Batch::new(vec![
        Sample::new(METRIC_DOWNLOAD, result.download, timestamp_millis, server_url, instance),
        Sample::new(METRIC_UPLOAD, result.upload, timestamp_millis, server_url, instance),
        Sample::new(METRIC_PING, result.ping, timestamp_millis, server_url, instance),
        Sample::new(METRIC_JITTER, result.jitter, timestamp_millis, server_url, instance),
    ])
}

/// 레이블 값 조회 (없으면 빈 문자열)
pub fn label_value<'a>(labels: &'a [Label], name: &str) -> &'a str {
    labels
        .iter()
        .find(|label| label.name == name)
        .map(|label| label.value.as_str())
        .unwrap_or("")
}
