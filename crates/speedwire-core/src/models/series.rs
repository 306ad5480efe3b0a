//! 시계열 모델.
//!
//! remote-write 전송 단위인 레이블/샘플/배치를 정의한다.
//! 샘플 하나는 데이터 포인트 하나만 가진다.

/// 메트릭 이름 레이블
pub const LABEL_NAME: &str = "__name__";
/// 측정 서버 URL 레이블
pub const LABEL_SERVER_URL: &str = "server_url";
/// 측정 호스트 레이블
pub const LABEL_INSTANCE: &str = "instance";

/// 시계열 레이블 (name/value 쌍)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// 단일 메트릭 관측값
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// 메트릭 이름 (`__name__` 레이블과 동일)
    pub metric_name: String,
    /// 측정값
    pub value: f64,
    /// 측정 시각 (epoch 밀리초)
    pub timestamp_millis: i64,
    /// 레이블 (삽입 순서 유지, 이름 중복 없음)
    pub labels: Vec<Label>,
}

impl Sample {
    /// `__name__`, `server_url`, `instance` 순서의 레이블로 샘플 생성
    pub fn new(
        metric_name: &str,
        value: f64,
        timestamp_millis: i64,
        server_url: &str,
        instance: &str,
    ) -> Self {
        Self {
            metric_name: metric_name.to_string(),
            value,
            timestamp_millis,
            labels: vec![
                Label::new(LABEL_NAME, metric_name),
                Label::new(LABEL_SERVER_URL, server_url),
                Label::new(LABEL_INSTANCE, instance),
            ],
        }
    }
}

/// 한 번에 전송되는 샘플 묶음
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    samples: Vec<Sample>,
}

impl Batch {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<Sample>> for Batch {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}
