//! 측정 → 변환 → 전송 파이프라인.
//!
//! 프로세스 실행당 한 번: 측정 한 번, 배치 생성 한 번, 전송 한 번(내부 재시도 포함).

use speedwire_core::error::CoreError;
use speedwire_core::models::delivery::DeliveryReport;
use speedwire_core::models::measurement::MeasurementResult;
use speedwire_core::ports::remote_writer::RemoteWriter;
use speedwire_core::series::{build_batch, UNKNOWN_INSTANCE};
use speedwire_probe::speedtest::LibrespeedProbe;
use std::sync::Arc;
use tracing::{info, warn};

/// 한 번의 익스포트 결과
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub measurement: MeasurementResult,
    pub delivery: DeliveryReport,
}

/// 익스포터 — 측정기와 전송기를 묶는다
pub struct Exporter {
    probe: LibrespeedProbe,
    writer: Arc<dyn RemoteWriter>,
    instance: String,
}

impl Exporter {
    pub fn new(probe: LibrespeedProbe, writer: Arc<dyn RemoteWriter>, instance: String) -> Self {
        Self {
            probe,
            writer,
            instance,
        }
    }

    /// 측정 실행 후 결과 전송
    ///
    /// 배치의 타임스탬프는 측정 완료 직후 한 번만 잡는다.
    pub async fn run_once(&self) -> Result<ExportSummary, CoreError> {
        let measurement = self.probe.run().await?;

        let timestamp = chrono::Utc::now().timestamp_millis();
        let batch = build_batch(&measurement, timestamp, &self.instance);

        let delivery = self.writer.write(&batch).await?;
        info!(
            "메트릭 {}개 전송 완료 (시도 {}회, {:?} 소요)",
            delivery.series, delivery.attempts, delivery.elapsed
        );

        Ok(ExportSummary {
            measurement,
            delivery,
        })
    }
}

/// 인스턴스 레이블용 호스트명 (조회 실패 시 "unknown")
pub fn resolve_instance() -> String {
    match sysinfo::System::host_name().filter(|name| !name.is_empty()) {
        Some(name) => name,
        None => {
            warn!("호스트명 조회 실패, '{UNKNOWN_INSTANCE}' 사용");
            UNKNOWN_INSTANCE.to_string()
        }
    }
}
