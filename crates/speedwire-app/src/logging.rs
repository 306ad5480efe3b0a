//! 로그 초기화.
//!
//! stdout + 로그 파일(append) 두 곳에 기록한다. `RUST_LOG`가 있으면 우선한다.

use speedwire_core::config::validate_log_file_path;
use speedwire_core::error::CoreError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// 크레이트별 로그 필터 문자열
pub fn log_filter(level: &str) -> String {
    [
        "speedwire",
        "speedwire_app",
        "speedwire_core",
        "speedwire_probe",
        "speedwire_network",
    ]
    .iter()
    .map(|target| format!("{target}={level}"))
    .collect::<Vec<_>>()
    .join(",")
}

/// 전역 tracing subscriber 설치
pub fn init_logging(log_file: &Path, level: &str) -> Result<(), CoreError> {
    validate_log_file_path(log_file)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| CoreError::Config(format!("로그 초기화 실패: {e}")))
}
