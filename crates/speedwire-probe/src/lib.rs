//! # speedwire-probe
//!
//! 외부 속도 측정 도구(librespeed-cli) 어댑터.
//! `CommandRunner` 포트 구현, 실행 인자 구성, JSON 결과 파싱을 담당한다.

pub mod parser;
pub mod runner;
pub mod speedtest;
