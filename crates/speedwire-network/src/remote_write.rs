//! Prometheus remote-write 클라이언트.
//!
//! `RemoteWriter` 포트 구현. protobuf 직렬화 → snappy 압축 →
//! 기본 인증 POST. 실패는 `RetryPolicy`에 따라 재시도한다.

use async_trait::async_trait;
use speedwire_core::error::CoreError;
use speedwire_core::models::delivery::DeliveryReport;
use speedwire_core::models::series::{Batch, LABEL_INSTANCE, LABEL_NAME, LABEL_SERVER_URL};
use speedwire_core::ports::compressor::Compressor;
use speedwire_core::ports::credentials::Credentials;
use speedwire_core::ports::remote_writer::RemoteWriter;
use speedwire_core::series::label_value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::compression::SnappyCompressor;
use crate::proto::encode_batch;
use crate::retry::{run_with_retry, Backoff, RetryPolicy};

/// protobuf 본문 MIME 타입
pub const CONTENT_TYPE_PROTOBUF: &str = "application/x-protobuf";
/// 프로토콜 버전 헤더
pub const REMOTE_WRITE_VERSION_HEADER: &str = "X-Prometheus-Remote-Write-Version";
/// 프로토콜 버전
pub const REMOTE_WRITE_VERSION: &str = "0.1.0";

/// remote-write 클라이언트 — `RemoteWriter` 포트 구현
pub struct RemoteWriteClient {
    client: reqwest::Client,
    url: String,
    credentials: Credentials,
    compressor: Arc<dyn Compressor>,
    retry: RetryPolicy,
}

impl RemoteWriteClient {
    /// 새 remote-write 클라이언트 생성
    pub fn new(url: &str, credentials: Credentials, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Transport(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
            credentials,
            compressor: Arc::new(SnappyCompressor::new()),
            retry: RetryPolicy::default(),
        })
    }

    /// 재시도 횟수 설정
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    /// 백오프 계산 방식 교체
    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.retry.backoff = backoff;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.retry.max_retries
    }

    /// 배치 → 압축된 요청 본문
    pub fn encode(&self, batch: &Batch) -> Result<Vec<u8>, CoreError> {
        if batch.is_empty() {
            return Err(CoreError::EmptyBatch);
        }

        let data = encode_batch(batch)?;
        let compressed = self.compressor.compress(&data)?;
        info!(
            "페이로드 크기: {} bytes (압축: {} bytes)",
            data.len(),
            compressed.len()
        );
        Ok(compressed)
    }

    /// 단일 전송 시도
    ///
    /// 빈 배치는 네트워크 접근 전에 `EmptyBatch`로 실패한다.
    pub async fn send_once(&self, batch: &Batch) -> Result<(), CoreError> {
        if batch.is_empty() {
            return Err(CoreError::EmptyBatch);
        }

        info!("remote write 엔드포인트로 {}개 메트릭 전송 준비", batch.len());
        for sample in batch.samples() {
            info!(
                "메트릭 전송: {} | 서버: {} | 인스턴스: {} | 값: {:.2} | 타임스탬프: {}",
                label_value(&sample.labels, LABEL_NAME),
                label_value(&sample.labels, LABEL_SERVER_URL),
                label_value(&sample.labels, LABEL_INSTANCE),
                sample.value,
                sample.timestamp_millis
            );
        }

        let body = self.encode(batch)?;

        let start = Instant::now();
        let resp = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_ENCODING, self.compressor.content_encoding())
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE_PROTOBUF)
            .header(REMOTE_WRITE_VERSION_HEADER, REMOTE_WRITE_VERSION)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                warn!("HTTP 요청 실패 ({:?} 경과): {e}", start.elapsed());
                CoreError::Transport(format!("HTTP 요청 전송 실패: {e}"))
            })?;

        info!("응답 수신: {} ({:?} 소요)", resp.status(), start.elapsed());
        self.check_response(resp).await
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(&self, resp: reqwest::Response) -> Result<(), CoreError> {
        let status = resp.status();
        if status.is_success() {
            debug!("remote write 전송 성공");
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });
        warn!("remote write 실패 응답 본문: {body}");

        Err(CoreError::RemoteRejection {
            status: status.as_u16(),
            body,
        })
    }

    /// 재시도가 포함된 전송
    pub async fn send_with_retry(&self, batch: &Batch) -> Result<DeliveryReport, CoreError> {
        if batch.is_empty() {
            return Err(CoreError::EmptyBatch);
        }

        let start = Instant::now();
        let ((), attempts) = run_with_retry(&self.retry, |attempt| {
            debug!("전송 시도 {attempt}/{}", self.retry.max_attempts());
            self.send_once(batch)
        })
        .await?;

        Ok(DeliveryReport {
            attempts,
            series: batch.len(),
            elapsed: start.elapsed(),
        })
    }
}

#[async_trait]
impl RemoteWriter for RemoteWriteClient {
    async fn write(&self, batch: &Batch) -> Result<DeliveryReport, CoreError> {
        self.send_with_retry(batch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::decode_request;
    use crate::retry::FixedBackoff;
    use assert_matches::assert_matches;
    use speedwire_core::models::series::Sample;

    fn credentials() -> Credentials {
        Credentials {
            username: "user".to_string(),
            password: "pass".to_string(),
        }
    }

    fn one_sample_batch() -> Batch {
        Batch::new(vec![Sample::new(
            "test_metric",
            1.0,
            1_690_000_000_000,
            "server",
            "instance",
        )])
    }

    fn client_for(server: &mockito::ServerGuard, max_retries: u32) -> RemoteWriteClient {
        RemoteWriteClient::new(
            &format!("{}/api/v1/write", server.url()),
            credentials(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_max_retries(max_retries)
        .with_backoff(Arc::new(FixedBackoff(Duration::ZERO)))
    }

    #[test]
    fn client_creation_defaults() {
        let client = RemoteWriteClient::new(
            "http://localhost:9090/api/v1/write",
            credentials(),
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(client.max_retries(), 3);
    }

    #[test]
    fn encode_roundtrip_is_lossless() {
        let client = RemoteWriteClient::new(
            "http://localhost:9090/api/v1/write",
            credentials(),
            Duration::from_secs(30),
        )
        .unwrap();
        let batch = one_sample_batch();

        let body = client.encode(&batch).unwrap();
        let raw = SnappyCompressor::new().decompress(&body).unwrap();
        let decoded = decode_request(&raw).unwrap();

        assert_eq!(decoded.timeseries.len(), 1);
        let series = &decoded.timeseries[0];
        let labels: Vec<(&str, &str)> = series
            .labels
            .iter()
            .map(|l| (l.name.as_str(), l.value.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![("__name__", "test_metric"), ("server_url", "server"), ("instance", "instance")]
        );
        assert_eq!(series.samples[0].value.to_bits(), 1.0f64.to_bits());
        assert_eq!(series.samples[0].timestamp, 1_690_000_000_000);
    }

    #[tokio::test]
    async fn send_success_with_protocol_headers() {
        let mut server = mockito::Server::new_async().await;
        // "user:pass" base64
        let mock = server
            .mock("POST", "/api/v1/write")
            .match_header("content-encoding", "snappy")
            .match_header("content-type", "application/x-protobuf")
            .match_header("x-prometheus-remote-write-version", "0.1.0")
            .match_header("authorization", "Basic dXNlcjpwYXNz")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, 3);
        let report = client.send_with_retry(&one_sample_batch()).await.unwrap();

        assert_eq!(report.attempts, 1);
        assert_eq!(report.series, 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn no_content_is_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/write")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server, 0);
        assert!(client.send_once(&one_sample_batch()).await.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn forbidden_is_terminal_after_one_attempt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/write")
            .with_status(403)
            .with_body("Forbidden")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, 3);
        let err = client.send_with_retry(&one_sample_batch()).await.unwrap_err();

        assert_matches!(err, CoreError::DeliveryFailed { attempts: 1, .. });
        assert_eq!(err.status(), Some(403));
        let msg = err.to_string();
        assert!(msg.contains("1회"));
        assert!(msg.contains("403"));
        assert!(msg.contains("Forbidden"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_retried_until_exhausted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/write")
            .with_status(500)
            .with_body("Internal Server Error")
            .expect(4)
            .create_async()
            .await;

        let client = client_for(&server, 3);
        let err = client.send_with_retry(&one_sample_batch()).await.unwrap_err();

        assert_matches!(err, CoreError::DeliveryFailed { attempts: 4, .. });
        assert_eq!(err.status(), Some(500));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_batch_never_hits_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/write")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, 3);
        assert_matches!(
            client.send_with_retry(&Batch::default()).await,
            Err(CoreError::EmptyBatch)
        );
        assert_matches!(client.send_once(&Batch::default()).await, Err(CoreError::EmptyBatch));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn invalid_url_is_transport_error() {
        let client = RemoteWriteClient::new(":", credentials(), Duration::from_secs(5)).unwrap();
        assert_matches!(
            client.send_once(&one_sample_batch()).await,
            Err(CoreError::Transport(_))
        );
    }

    #[tokio::test]
    async fn connection_refused_retried() {
        // 바인딩 후 즉시 닫은 포트 → 연결 거부
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = RemoteWriteClient::new(
            &format!("http://127.0.0.1:{port}/api/v1/write"),
            credentials(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_max_retries(2)
        .with_backoff(Arc::new(FixedBackoff(Duration::ZERO)));

        let err = client.send_with_retry(&one_sample_batch()).await.unwrap_err();
        assert_matches!(
            err,
            CoreError::DeliveryFailed { attempts: 3, last } if matches!(*last, CoreError::Transport(_))
        );
    }

    #[tokio::test]
    async fn remote_writer_port_delegates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/write")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let writer: Arc<dyn RemoteWriter> = Arc::new(client_for(&server, 3));
        let report = writer.write(&one_sample_batch()).await.unwrap();
        assert_eq!(report.attempts, 1);
        mock.assert_async().await;
    }
}
