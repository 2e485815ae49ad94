// ==========================================
// 设备合规期限跟踪系统 - 核心库
// ==========================================
// 依据: Compliance_Master_Spec.md - 系统宪法
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (展示层为外部协作方)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 状态计算规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/schema 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配与入口支持
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{MeasureBy, RateMode, RateSource, StatusLabel, Tier};

// 领域实体
pub use domain::{
    EntityStatusSummary, Obligation, ObligationType, StatusResult, ThresholdPolicy,
    TrackedEntity, UsageLog,
};

// 引擎
pub use engine::{
    NearestObligationReducer, StatusCalculator, TierClassifier, UsageRateEstimator,
};

// API
pub use api::{ConfigApi, StatusApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备合规期限跟踪系统";

// ==========================================
// 预编译检查
// ==========================================
