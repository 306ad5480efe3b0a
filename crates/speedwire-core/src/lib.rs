//! # speedwire-core
//!
//! speedwire 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 측정 결과, 샘플, 배치 구조체
//! - [`series`] — 측정 결과 → 시계열 배치 변환
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 익스포터 설정 구조체 및 검증

pub mod config;
pub mod error;
pub mod models;
pub mod ports;
pub mod series;
