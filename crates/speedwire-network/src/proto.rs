//! remote-write protobuf 메시지.
//!
//! `prometheus/prompb/{remote,types}.proto`의 전송 측 부분집합.
//! 필드 번호는 원본 proto와 동일해야 한다.

use speedwire_core::error::CoreError;
use speedwire_core::models::series::{Batch, Sample as DomainSample};

/// `prometheus.WriteRequest`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WriteRequest {
    #[prost(message, repeated, tag = "1")]
    pub timeseries: Vec<TimeSeries>,
}

/// `prometheus.TimeSeries`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TimeSeries {
    #[prost(message, repeated, tag = "1")]
    pub labels: Vec<Label>,
    #[prost(message, repeated, tag = "2")]
    pub samples: Vec<Sample>,
}

/// `prometheus.Label`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Label {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

/// `prometheus.Sample`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Sample {
    #[prost(double, tag = "1")]
    pub value: f64,
    /// epoch 밀리초
    #[prost(int64, tag = "2")]
    pub timestamp: i64,
}

impl From<&DomainSample> for TimeSeries {
    fn from(sample: &DomainSample) -> Self {
        Self {
            labels: sample
                .labels
                .iter()
                .map(|label| Label {
                    name: label.name.clone(),
                    value: label.value.clone(),
                })
                .collect(),
            samples: vec![Sample {
                value: sample.value,
                timestamp: sample.timestamp_millis,
            }],
        }
    }
}

impl From<&Batch> for WriteRequest {
    fn from(batch: &Batch) -> Self {
        Self {
            timeseries: batch.samples().iter().map(TimeSeries::from).collect(),
        }
    }
}

/// 배치 → 직렬화된 `WriteRequest` 바이트
pub fn encode_batch(batch: &Batch) -> Result<Vec<u8>, CoreError> {
    use prost::Message;

    let request = WriteRequest::from(batch);
    let mut buf = Vec::with_capacity(request.encoded_len());
    request
        .encode(&mut buf)
        .map_err(|e| CoreError::Encoding(format!("protobuf 직렬화 실패: {e}")))?;
    Ok(buf)
}

/// 직렬화된 바이트 → `WriteRequest` (수신 측 검증용)
pub fn decode_request(data: &[u8]) -> Result<WriteRequest, CoreError> {
    use prost::Message;

    WriteRequest::decode(data).map_err(|e| CoreError::Encoding(format!("protobuf 해석 실패: {e}")))
}
