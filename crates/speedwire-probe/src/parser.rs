//! 측정 결과 파서.
//!
//! librespeed-cli `--json` 출력(결과 객체 배열)에서 첫 번째 결과만 사용한다.

use speedwire_core::error::CoreError;
use speedwire_core::models::measurement::{MeasurementResult, RawMeasurement};
use tracing::{debug, info};

/// 원시 출력 바이트 → 측정 결과
///
/// 두 번째 이후의 결과는 무시한다.
pub fn parse_results(output: &[u8]) -> Result<MeasurementResult, CoreError> {
    debug!("측정 도구 원시 출력: {}", String::from_utf8_lossy(output));

    let results: Vec<RawMeasurement> =
        serde_json::from_slice(output).map_err(|e| CoreError::Parse(e.to_string()))?;

    if results.len() > 1 {
        debug!("결과 {}개 중 첫 번째만 사용", results.len());
    }

    let first = results.into_iter().next().ok_or(CoreError::EmptyResult)?;
    let result = MeasurementResult::from(first);
    info!(
        download = result.download,
        upload = result.upload,
        ping = result.ping,
        jitter = result.jitter,
        server = %result.server_url,
        "측정 결과 파싱 완료"
    );
    Ok(result)
}
