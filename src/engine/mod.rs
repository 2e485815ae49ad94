// ==========================================
// 设备合规期限跟踪系统 - 引擎层
// ==========================================
// 依据: Deadline_Engine_Specs_v0.2.md - 1.2 模块拆分
// ==========================================
// 职责: 实现状态计算规则引擎,不做 I/O
// 红线: 引擎为纯函数 — 无共享可变状态,可在多线程任意并发调用;
//       所有规则必须输出 reason;"今天"由调用方显式传入
// ==========================================

pub mod classifier;
pub mod rate_estimator;
pub mod reducer;
pub mod status;

// 重导出核心引擎
pub use classifier::TierClassifier;
pub use rate_estimator::{UsageRateEstimator, DEFAULT_WINDOW_DAYS, MIN_WINDOW_DAYS};
pub use reducer::NearestObligationReducer;
pub use status::StatusCalculator;
