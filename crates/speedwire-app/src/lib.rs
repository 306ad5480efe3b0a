//! # speedwire-app
//!
//! speedwire 익스포터 바이너리의 구성 요소.
//! CLI 인자, 로그 초기화, 측정 → 변환 → 전송 파이프라인 와이어링.

pub mod cli;
pub mod exporter;
pub mod logging;
