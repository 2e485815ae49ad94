// ==========================================
// 设备合规期限跟踪系统 - 用量记录导入 Trait
// ==========================================
// 职责: 定义用量读数导入接口（不包含实现）
// 来源: 抄表导出的 CSV 文件 (entity_id, value, logged_at)
// ==========================================

use crate::importer::UsageImportOutcome;
use async_trait::async_trait;
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

// ==========================================
// UsageLogImporter Trait
// ==========================================
// 用途: 用量记录导入主接口
// 实现者: UsageLogImporterImpl
#[async_trait]
pub trait UsageLogImporter: Send + Sync {
    /// 从 CSV 文件导入用量读数
    ///
    /// # 参数
    /// - file_path: CSV 文件路径（.csv）
    ///
    /// # 返回
    /// - Ok(UsageImportOutcome): 导入结果（批次ID、追加/跳过计数、逐行错误）
    /// - Err: 文件读取错误、数据库错误等
    ///
    /// # 导入流程
    /// 1. 文件读取与解析
    /// 2. 字段映射与类型转换 (entity_id / value / logged_at)
    /// 3. 行级校验（主键、数值有限性、时间格式）
    /// 4. 逐行追加落库（usage_log 仅追加）
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<UsageImportOutcome, Box<dyn Error>>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 使用 tokio 并发执行多个文件的导入
    /// - 每个文件的导入是独立的，互不影响
    /// - 如果某个文件导入失败，不影响其他文件
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Result<Vec<Result<UsageImportOutcome, String>>, Box<dyn Error>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser（Excel 源可在同一接口后扩展）
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录（HashMap<列名, 值>）
    ///
    /// # 返回
    /// - Ok(Vec<HashMap<String, String>>): 行记录列表
    /// - Err: 文件读取错误、格式错误
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
    ) -> Result<Vec<HashMap<String, String>>, Box<dyn Error>>;
}
