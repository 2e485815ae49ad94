// ==========================================
// 设备合规期限跟踪系统 - 导入层
// ==========================================
// 职责: 抄表 CSV → usage_log 追加
// ==========================================

pub mod error;
pub mod file_parser;
pub mod usage_log_importer_impl;
pub mod usage_log_importer_trait;

use serde::{Deserialize, Serialize};

// 重导出核心类型
pub use error::ImportError;
pub use file_parser::CsvParser;
pub use usage_log_importer_impl::UsageLogImporterImpl;
pub use usage_log_importer_trait::{FileParser, UsageLogImporter};

// ==========================================
// UsageImportOutcome - 导入结果
// ==========================================
// 行级错误收敛在 errors 内,不中断整个文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageImportOutcome {
    pub batch_id: String,     // 导入批次ID
    pub file: String,         // 源文件路径
    pub total_rows: usize,    // 数据行总数
    pub appended: usize,      // 成功追加行数
    pub skipped: usize,       // 跳过行数 (映射/落库失败)
    pub errors: Vec<String>,  // 逐行错误信息
}
