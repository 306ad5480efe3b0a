//! # speedwire
//!
//! librespeed 측정 → Prometheus remote-write 익스포터 진입점.
//! 설정 로드/검증, 로그 초기화, 어댑터 와이어링 후 파이프라인을 한 번 실행한다.

use anyhow::{anyhow, Result};
use clap::Parser;
use speedwire_app::cli::Args;
use speedwire_app::exporter::{resolve_instance, Exporter};
use speedwire_app::logging::init_logging;
use speedwire_core::config::ExporterConfig;
use speedwire_core::ports::credentials::{CredentialProvider, StaticCredentialProvider};
use speedwire_network::remote_write::RemoteWriteClient;
use speedwire_probe::runner::SystemCommandRunner;
use speedwire_probe::speedtest::{locate_cli, LibrespeedProbe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// remote-write 자격증명 시크릿 이름
const REMOTE_WRITE_SECRET: &str = "remote-write";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 설정 로드 (파일 → 환경변수 → CLI 순으로 덮어씀)
    let mut config = ExporterConfig::load(args.config.as_deref()).map_err(|e| anyhow!("{e}"))?;
    args.apply_to(&mut config);
    config.validate().map_err(|e| anyhow!("설정 검증 실패: {e}"))?;

    init_logging(&config.logging.log_file, &config.logging.level)
        .map_err(|e| anyhow!("로그 초기화 실패: {e}"))?;

    info!("speedwire 익스포터 시작 (v{})", env!("CARGO_PKG_VERSION"));
    info!("로그 파일: {}", config.logging.log_file.display());

    let start = Instant::now();
    match run(&config).await {
        Ok(()) => {
            info!("익스포터 완료 ({:?} 소요)", start.elapsed());
            Ok(())
        }
        Err(e) => {
            error!("{e:#}");
            Err(e)
        }
    }
}

/// 어댑터 와이어링 후 파이프라인 1회 실행
async fn run(config: &ExporterConfig) -> Result<()> {
    // 1. 자격증명
    let provider = StaticCredentialProvider::new(
        config.remote_write.username.clone(),
        config.remote_write.password.clone(),
    );
    let credentials = provider
        .resolve(REMOTE_WRITE_SECRET)
        .await
        .map_err(|e| anyhow!("자격증명 조회 실패: {e}"))?;

    // 2. 측정 도구
    let path_env = std::env::var_os("PATH");
    let cli_path = locate_cli(config.probe.cli_path.as_deref(), path_env.as_deref())
        .map_err(|e| anyhow!("librespeed-cli 준비 실패: {e}"))?;
    let runner = Arc::new(SystemCommandRunner::new(config.probe.timeout()));
    let probe = LibrespeedProbe::from_config(runner, cli_path, &config.probe);

    // 3. 전송기
    let writer = RemoteWriteClient::new(
        &config.remote_write.url,
        credentials,
        config.remote_write.timeout(),
    )
    .map_err(|e| anyhow!("remote write 클라이언트 생성 실패: {e}"))?
    .with_max_retries(config.remote_write.max_retries);

    let instance = resolve_instance();
    info!("인스턴스 호스트명: {instance}");

    Exporter::new(probe, Arc::new(writer), instance)
        .run_once()
        .await
        .map_err(|e| anyhow!("메트릭 익스포트 실패: {e}"))?;
    Ok(())
}
