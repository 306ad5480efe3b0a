//! 측정 결과 모델.
//!
//! librespeed-cli `--json` 출력의 결과 객체 한 개에 대응한다.

use serde::Deserialize;

/// 측정에 사용된 서버 정보 (도구 출력의 `server` 객체)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerInfo {
    /// 서버 목록상의 ID
    #[serde(default)]
    pub id: Option<i64>,
    /// 서버 이름
    #[serde(default)]
    pub name: Option<String>,
    /// 측정 엔드포인트 URL
    #[serde(default)]
    pub url: String,
}

/// 도구 출력의 결과 객체 원형 (알 수 없는 필드는 무시)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeasurement {
    #[serde(default)]
    pub download: f64,
    #[serde(default)]
    pub upload: f64,
    #[serde(default)]
    pub ping: f64,
    #[serde(default)]
    pub jitter: f64,
    #[serde(default)]
    pub server: ServerInfo,
}

/// 한 번의 속도 측정 결과
///
/// 호출당 한 번 생성되고 이후 변경되지 않는다.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementResult {
    /// 다운로드 속도 (Mbps)
    pub download: f64,
    /// 업로드 속도 (Mbps)
    pub upload: f64,
    /// 지연 시간 (ms)
    pub ping: f64,
    /// 지터 (ms)
    pub jitter: f64,
    /// 측정 서버 URL
    pub server_url: String,
}

impl From<RawMeasurement> for MeasurementResult {
    fn from(raw: RawMeasurement) -> Self {
        Self {
            download: raw.download,
            upload: raw.upload,
            ping: raw.ping,
            jitter: raw.jitter,
            server_url: raw.server.url,
        }
    }
}
