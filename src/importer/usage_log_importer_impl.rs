// ==========================================
// 设备合规期限跟踪系统 - 用量记录导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 映射 → 行级校验 → 追加落库
// 红线: usage_log 仅追加;行级错误不中断整个文件导入
// ==========================================

use crate::domain::entity::UsageLog;
use crate::importer::error::ImportError;
use crate::importer::usage_log_importer_trait::{FileParser, UsageLogImporter};
use crate::importer::UsageImportOutcome;
use crate::repository::UsageLogRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// ===== CSV 列名 =====
const COL_ENTITY_ID: &str = "entity_id";
const COL_VALUE: &str = "value";
const COL_LOGGED_AT: &str = "logged_at";

// ==========================================
// UsageLogImporterImpl - 用量记录导入器实现
// ==========================================
pub struct UsageLogImporterImpl {
    // 数据访问层
    usage_log_repo: UsageLogRepository,

    // 文件解析器
    file_parser: Box<dyn FileParser>,
}

impl UsageLogImporterImpl {
    /// 创建新的 UsageLogImporter 实例
    pub fn new(usage_log_repo: UsageLogRepository, file_parser: Box<dyn FileParser>) -> Self {
        Self {
            usage_log_repo,
            file_parser,
        }
    }

    // ==========================================
    // 字段映射与校验
    // ==========================================

    /// 单行记录 → UsageLog
    ///
    /// # 校验
    /// - entity_id 非空
    /// - value 可解析为有限数
    /// - logged_at 符合 "YYYY-MM-DD HH:MM:SS" 或 "YYYY-MM-DD"
    fn map_row(&self, row_idx: usize, row: &HashMap<String, String>) -> Result<UsageLog, ImportError> {
        let entity_id = row
            .get(COL_ENTITY_ID)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or(ImportError::EntityIdMissing(row_idx))?;

        let raw_value = row.get(COL_VALUE).map(|v| v.trim()).unwrap_or("");
        let value: f64 = raw_value
            .parse()
            .map_err(|_| ImportError::TypeConversionError {
                row: row_idx,
                field: COL_VALUE.to_string(),
                message: format!("无法解析为数值: {}", raw_value),
            })?;
        if !value.is_finite() {
            return Err(ImportError::TypeConversionError {
                row: row_idx,
                field: COL_VALUE.to_string(),
                message: format!("非有限数值: {}", raw_value),
            });
        }

        let raw_logged_at = row.get(COL_LOGGED_AT).map(|v| v.trim()).unwrap_or("");
        let logged_at = Self::parse_timestamp(raw_logged_at).ok_or_else(|| {
            ImportError::TimestampFormatError {
                row: row_idx,
                field: COL_LOGGED_AT.to_string(),
                value: raw_logged_at.to_string(),
            }
        })?;

        Ok(UsageLog::new(entity_id.to_string(), value, logged_at))
    }

    /// 解析时间戳: 优先完整时间,退化为日期 (按当日 00:00:00)
    fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(dt);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

// ==========================================
// UsageLogImporter Trait 实现
// ==========================================
#[async_trait]
impl UsageLogImporter for UsageLogImporterImpl {
    /// 从 CSV 文件导入用量读数
    #[instrument(skip(self, file_path))]
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<UsageImportOutcome, Box<dyn Error>> {
        let path = file_path.as_ref();
        let batch_id = Uuid::new_v4().to_string();

        info!(file = %path.display(), batch_id = %batch_id, "开始导入用量记录");

        // 1. 解析文件
        let raw_records = self.file_parser.parse_to_raw_records(path)?;
        let total_rows = raw_records.len();

        // 2. 逐行映射 + 校验 + 追加
        // 行级错误降级为结果内的错误条目,不中断整个文件
        let mut appended = 0usize;
        let mut errors = Vec::new();

        for (idx, row) in raw_records.iter().enumerate() {
            // 行号从 2 起算 (1 为表头),报错信息对齐源文件
            let row_no = idx + 2;

            let log = match self.map_row(row_no, row) {
                Ok(log) => log,
                Err(e) => {
                    warn!(row = row_no, error = %e, "行映射失败,跳过");
                    errors.push(e.to_string());
                    continue;
                }
            };

            match self.usage_log_repo.append(&log) {
                Ok(()) => appended += 1,
                Err(e) => {
                    warn!(row = row_no, error = %e, "行落库失败,跳过");
                    errors.push(format!("行 {}: {}", row_no, e));
                }
            }
        }

        let outcome = UsageImportOutcome {
            batch_id,
            file: path.display().to_string(),
            total_rows,
            appended,
            skipped: total_rows - appended,
            errors,
        };

        info!(
            file = %path.display(),
            total = outcome.total_rows,
            appended = outcome.appended,
            skipped = outcome.skipped,
            "用量记录导入完成"
        );

        Ok(outcome)
    }

    /// 批量导入多个文件（并发执行）
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Result<Vec<Result<UsageImportOutcome, String>>, Box<dyn Error>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入文件");

        // 为每个文件创建导入任务
        let import_tasks = file_paths.into_iter().map(|path| {
            let path_str = path.as_ref().to_str().unwrap_or("unknown").to_string();
            async move {
                match self.import_from_csv(path).await {
                    Ok(outcome) => Ok(outcome),
                    Err(e) => {
                        error!(file = %path_str, error = %e, "文件导入失败");
                        Err(format!("文件 {} 导入失败: {}", path_str, e))
                    }
                }
            }
        });

        // 并发执行所有导入任务
        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        Ok(results)
    }
}
