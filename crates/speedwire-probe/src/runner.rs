//! 시스템 프로세스 실행기.
//!
//! `CommandRunner` 포트 구현. tokio 프로세스 + 타임아웃.

use async_trait::async_trait;
use speedwire_core::error::CoreError;
use speedwire_core::ports::command_runner::CommandRunner;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// 기본 실행 타임아웃
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// OS 프로세스를 실행하는 `CommandRunner` 구현
pub struct SystemCommandRunner {
    timeout: Duration,
}

impl SystemCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<Vec<u8>, CoreError> {
        debug!("프로세스 실행: {program} {}", args.join(" "));

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CoreError::Execution(format!("{program} 실행 불가: {e}")))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CoreError::ExecutionTimeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })?
            .map_err(|e| CoreError::Execution(format!("{program} 출력 수집 실패: {e}")))?;

        if !output.status.success() {
            warn!(
                "{program} 에러 출력: {}",
                String::from_utf8_lossy(&output.stderr)
            );
            return Err(CoreError::Execution(format!(
                "{program} 종료 상태: {}",
                output.status
            )));
        }

        Ok(output.stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn captures_stdout() {
        let runner = SystemCommandRunner::default();
        let out = runner.run("sh", &args(&["-c", "printf '[]'"])).await.unwrap();
        assert_eq!(out, b"[]");
    }

    #[tokio::test]
    async fn non_zero_exit_is_execution_error() {
        let runner = SystemCommandRunner::default();
        let result = runner.run("sh", &args(&["-c", "echo boom >&2; exit 3"])).await;
        assert_matches!(result, Err(CoreError::Execution(_)));
    }

    #[tokio::test]
    async fn missing_program_is_execution_error() {
        let runner = SystemCommandRunner::default();
        let result = runner.run("/nonexistent/librespeed-cli", &[]).await;
        assert_matches!(result, Err(CoreError::Execution(_)));
    }

    #[tokio::test]
    async fn slow_program_times_out() {
        let runner = SystemCommandRunner::new(Duration::from_millis(100));
        let result = runner.run("sh", &args(&["-c", "sleep 5"])).await;
        assert_matches!(result, Err(CoreError::ExecutionTimeout { timeout_ms: 100 }));
    }
}
