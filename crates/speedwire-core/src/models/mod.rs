//! speedwire 도메인 모델.
//!
//! 측정 결과, 시계열 샘플/배치, 전송 시도 기록을 정의한다.

pub mod delivery;
pub mod measurement;
pub mod series;
