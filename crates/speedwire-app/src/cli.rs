//! CLI 인자 정의.

use clap::Parser;
use speedwire_core::config::ExporterConfig;
use std::path::PathBuf;

/// librespeed 측정 결과를 Prometheus remote-write로 전송
#[derive(Parser, Debug)]
#[command(name = "speedwire")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// remote_write 엔드포인트 URL
    #[arg(long)]
    pub url: Option<String>,

    /// 기본 인증 사용자명 (인스턴스 ID)
    #[arg(long)]
    pub username: Option<String>,

    /// 기본 인증 비밀번호 (API 키)
    #[arg(long)]
    pub password: Option<String>,

    /// 로그 파일 경로 (기본: speedwire.log)
    #[arg(long)]
    pub logfile: Option<PathBuf>,

    /// 서버 목록 JSON 파일 경로
    #[arg(long)]
    pub local_json: Option<PathBuf>,

    /// 서버 목록에서 사용할 서버 ID
    #[arg(long)]
    pub server_id: Option<u32>,

    /// librespeed-cli 실행 파일 경로 (기본: PATH 탐색)
    #[arg(long)]
    pub cli_path: Option<PathBuf>,

    /// 첫 시도 이후 재시도 횟수
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// JSON 설정 파일
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l')]
    pub log_level: Option<String>,
}

impl Args {
    /// CLI 값으로 설정 덮어쓰기 (지정된 값만)
    pub fn apply_to(&self, config: &mut ExporterConfig) {
        if let Some(ref url) = self.url {
            config.remote_write.url = url.clone();
        }
        if let Some(ref username) = self.username {
            config.remote_write.username = username.clone();
        }
        if let Some(ref password) = self.password {
            config.remote_write.password = password.clone();
        }
        if let Some(max_retries) = self.max_retries {
            config.remote_write.max_retries = max_retries;
        }
        if let Some(ref logfile) = self.logfile {
            config.logging.log_file = logfile.clone();
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if self.local_json.is_some() {
            config.probe.local_json = self.local_json.clone();
        }
        if self.server_id.is_some() {
            config.probe.server_id = self.server_id;
        }
        if self.cli_path.is_some() {
            config.probe.cli_path = self.cli_path.clone();
        }
    }
}
