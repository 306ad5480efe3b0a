//! 익스포터 설정 구조체.
//!
//! remote-write 엔드포인트, 측정 도구, 로그 설정을 정의한다.
//! `config` crate를 통해 JSON 파일/환경변수(`SPEEDWIRE__*`)에서 로드한 뒤
//! CLI 인자로 덮어쓴다.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::CoreError;

/// 환경변수 접두사 (예: `SPEEDWIRE__REMOTE_WRITE__URL`)
const ENV_PREFIX: &str = "SPEEDWIRE";

/// 최상위 익스포터 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// remote-write 전송 설정
    #[serde(default)]
    pub remote_write: RemoteWriteConfig,
    /// 측정 도구 설정
    #[serde(default)]
    pub probe: ProbeConfig,
    /// 로그 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============================================================
// remote-write 설정
// ============================================================

/// remote-write 엔드포인트 설정
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteWriteConfig {
    /// 엔드포인트 URL (예: Grafana Cloud `/api/prom/push`)
    #[serde(default)]
    pub url: String,
    /// 기본 인증 사용자명 (인스턴스 ID)
    #[serde(default)]
    pub username: String,
    /// 기본 인증 비밀번호 (API 키)
    #[serde(default)]
    pub password: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 첫 시도 이후 추가 재시도 횟수
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for RemoteWriteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl std::fmt::Debug for RemoteWriteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteWriteConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl RemoteWriteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 필수값 및 URL 형식 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.url.is_empty() {
            return Err(validation("url", "remote write URL이 필요함"));
        }
        if self.username.is_empty() {
            return Err(validation("username", "사용자명이 필요함"));
        }
        if self.password.is_empty() {
            return Err(validation("password", "비밀번호가 필요함"));
        }

        let parsed = url::Url::parse(&self.url)
            .map_err(|e| validation("url", &format!("잘못된 URL 형식: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(validation("url", "http 또는 https 스킴만 허용"));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(validation("url", "호스트가 필요함"));
        }

        info!(url = %self.url, username = %self.username, "설정 검증 완료");
        Ok(())
    }
}

// ============================================================
// 측정 도구 설정
// ============================================================

/// librespeed-cli 실행 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// 실행 파일 경로 (없으면 PATH에서 탐색)
    #[serde(default)]
    pub cli_path: Option<PathBuf>,
    /// 로컬 서버 목록 JSON 경로
    #[serde(default)]
    pub local_json: Option<PathBuf>,
    /// 서버 목록에서 사용할 서버 ID
    #[serde(default)]
    pub server_id: Option<u32>,
    /// 실행 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            cli_path: None,
            local_json: None,
            server_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================
// 로그 설정
// ============================================================

/// 로그 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 로그 파일 경로 (stdout과 함께 기록)
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            level: default_log_level(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_log_file() -> PathBuf {
    PathBuf::from("speedwire.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn validation(field: &str, message: &str) -> CoreError {
    CoreError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

impl ExporterConfig {
    /// 설정 파일(선택) + 환경변수에서 로드
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Json,
            ));
            debug!("설정 파일 로드: {}", path.display());
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize::<ExporterConfig>())
            .map_err(|e| CoreError::Config(format!("설정 로드 실패: {e}")))
    }

    /// 파이프라인 실행 전 전체 검증 (로그 경로 → remote write 순)
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_log_file_path(&self.logging.log_file)?;
        self.remote_write.validate()
    }
}

/// 로그 파일의 상위 디렉토리가 존재하는지 확인
pub fn validate_log_file_path(path: &Path) -> Result<(), CoreError> {
    if path.as_os_str().is_empty() {
        return Err(validation("log_file", "로그 파일 경로가 비어 있음"));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(validation(
            "log_file",
            &format!("로그 디렉토리가 존재하지 않음: {}", dir.display()),
        ));
    }
    Ok(())
}
