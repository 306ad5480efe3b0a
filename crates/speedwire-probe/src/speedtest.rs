//! librespeed-cli 측정 실행.
//!
//! 실행 인자 구성 → `CommandRunner` 호출 → 결과 파싱.

use speedwire_core::config::ProbeConfig;
use speedwire_core::error::CoreError;
use speedwire_core::models::measurement::MeasurementResult;
use speedwire_core::ports::command_runner::CommandRunner;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::parser::parse_results;

/// 기본 실행 파일 이름
#[cfg(windows)]
pub const CLI_NAME: &str = "librespeed-cli.exe";
/// 기본 실행 파일 이름
#[cfg(not(windows))]
pub const CLI_NAME: &str = "librespeed-cli";

/// librespeed-cli 측정기
pub struct LibrespeedProbe {
    runner: Arc<dyn CommandRunner>,
    cli_path: PathBuf,
    local_json: Option<PathBuf>,
    server_id: Option<u32>,
}

impl LibrespeedProbe {
    pub fn new(runner: Arc<dyn CommandRunner>, cli_path: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            cli_path: cli_path.into(),
            local_json: None,
            server_id: None,
        }
    }

    /// 설정에서 서버 목록/서버 ID 반영
    pub fn from_config(
        runner: Arc<dyn CommandRunner>,
        cli_path: impl Into<PathBuf>,
        config: &ProbeConfig,
    ) -> Self {
        Self::new(runner, cli_path)
            .with_local_json(config.local_json.clone())
            .with_server_id(config.server_id)
    }

    /// 로컬 서버 목록 JSON 지정
    pub fn with_local_json(mut self, local_json: Option<PathBuf>) -> Self {
        self.local_json = local_json;
        self
    }

    /// 서버 ID 지정
    pub fn with_server_id(mut self, server_id: Option<u32>) -> Self {
        self.server_id = server_id;
        self
    }

    /// 실행 인자 구성
    pub fn build_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["--telemetry-level", "basic", "--json", "--verbose"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        if let Some(ref local_json) = self.local_json {
            args.push("--local-json".to_string());
            args.push(local_json.to_string_lossy().into_owned());
        }
        if let Some(server_id) = self.server_id {
            args.push("--server".to_string());
            args.push(server_id.to_string());
        }
        args
    }

    /// 측정 실행 후 첫 번째 결과 반환
    ///
    /// 프로세스 실행 에러는 그대로 전달한다.
    pub async fn run(&self) -> Result<MeasurementResult, CoreError> {
        let program = self.cli_path.to_string_lossy();
        let args = self.build_args();

        info!("librespeed-cli 실행: {program} {}", args.join(" "));
        let start = Instant::now();

        let output = match self.runner.run(&program, &args).await {
            Ok(output) => output,
            Err(e) => {
                warn!("librespeed-cli 실패 ({:?} 경과): {e}", start.elapsed());
                return Err(e);
            }
        };

        info!("librespeed-cli 완료 ({:?} 소요)", start.elapsed());
        parse_results(&output)
    }
}

/// 실행 파일 위치 결정
///
/// 명시된 경로가 있으면 그대로 쓰고, 없으면 `search_path`(PATH 형식)에서
/// 도구 이름을 찾는다. 프로세스 환경은 호출 측이 넘겨준다.
pub fn locate_cli(configured: Option<&Path>, search_path: Option<&OsStr>) -> Result<PathBuf, CoreError> {
    if let Some(path) = configured {
        if path.is_file() {
            debug!("설정된 librespeed-cli 사용: {}", path.display());
            return Ok(path.to_path_buf());
        }
        return Err(CoreError::Config(format!(
            "librespeed-cli 경로가 존재하지 않음: {}",
            path.display()
        )));
    }

    let found = search_path
        .map(std::env::split_paths)
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CLI_NAME))
        .find(|candidate| candidate.is_file());

    match found {
        Some(path) => {
            info!("librespeed-cli 발견: {}", path.display());
            Ok(path)
        }
        None => Err(CoreError::Config(format!(
            "PATH에서 {CLI_NAME}을(를) 찾을 수 없음"
        ))),
    }
}
