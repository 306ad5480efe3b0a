//! 메트릭 전송 포트.
//!
//! 구현: `speedwire-network` crate (reqwest + prost + snap)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::delivery::DeliveryReport;
use crate::models::series::Batch;

/// remote-write 엔드포인트로 배치 전송 (재시도 포함)
#[async_trait]
pub trait RemoteWriter: Send + Sync {
    async fn write(&self, batch: &Batch) -> Result<DeliveryReport, CoreError>;
}
