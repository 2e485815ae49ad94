// ==========================================
// 设备合规期限跟踪系统 - 领域模型层
// ==========================================
// 依据: Compliance_Master_Spec.md - PART C 数据体系
// ==========================================
// 职责: 定义领域实体、类型、阈值策略
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod entity;
pub mod obligation;
pub mod threshold;
pub mod types;

// 重导出核心类型
pub use entity::{TrackedEntity, UsageLog};
pub use obligation::{EntityStatusSummary, Obligation, ObligationType, StatusResult};
pub use threshold::{
    ThresholdPolicy, DEFAULT_ORANGE_DAYS, DEFAULT_RED_DAYS, DEFAULT_YELLOW_DAYS,
    MAX_THRESHOLD_DAYS,
};
pub use types::{MeasureBy, RateMode, RateSource, StatusLabel, Tier};
