// ==========================================
// 设备合规期限跟踪系统 - 应用层
// ==========================================
// 职责: 应用装配与入口支持
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState};
