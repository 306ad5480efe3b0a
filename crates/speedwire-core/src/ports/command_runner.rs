//! 외부 프로세스 실행 포트.
//!
//! 구현: `speedwire-probe` crate (tokio::process)

use async_trait::async_trait;

use crate::error::CoreError;

/// 이름과 인자로 프로그램을 실행하고 stdout 바이트를 반환
///
/// 0이 아닌 종료 코드나 실행 실패는 `CoreError::Execution`으로 보고한다.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<Vec<u8>, CoreError>;
}
