//! # speedwire-network
//!
//! Prometheus remote-write 전송 어댑터.
//! 배치를 `WriteRequest` protobuf로 직렬화하고 snappy로 압축해
//! 기본 인증 HTTP POST로 전송한다. 일시적 실패는 지수 백오프로 재시도한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use speedwire_network::remote_write::RemoteWriteClient;
//!
//! let client = RemoteWriteClient::new(&url, credentials, Duration::from_secs(30))?
//!     .with_max_retries(3);
//! client.send_with_retry(&batch).await?;
//! ```

pub mod compression;
pub mod proto;
pub mod remote_write;
pub mod retry;
