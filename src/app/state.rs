// ==========================================
// 设备合规期限跟踪系统 - 应用状态
// ==========================================
// 职责: 装配数据库连接、仓储、API,供入口程序使用
// 架构: 单连接 Arc<Mutex<Connection>>,各仓储共享
// ==========================================

use std::error::Error;
use std::sync::{Arc, Mutex};

use crate::api::{ConfigApi, StatusApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::{CsvParser, UsageLogImporterImpl};
use crate::repository::{ObligationRepository, TrackedEntityRepository, UsageLogRepository};

// ==========================================
// AppState - 应用状态
// ==========================================
pub struct AppState {
    pub entity_repo: Arc<TrackedEntityRepository>,
    pub obligation_repo: Arc<ObligationRepository>,
    pub usage_log_repo: Arc<UsageLogRepository>,
    pub status_api: Arc<StatusApi>,
    pub config_api: Arc<ConfigApi>,
    pub usage_importer: Arc<UsageLogImporterImpl>,
}

impl AppState {
    /// 初始化应用状态
    ///
    /// # 步骤
    /// 1. 打开数据库连接 (统一 PRAGMA)
    /// 2. 初始化 schema (幂等)
    /// 3. 装配仓储与 API
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        let conn = Arc::new(Mutex::new(conn));

        let entity_repo = Arc::new(TrackedEntityRepository::from_connection(conn.clone()));
        let obligation_repo = Arc::new(ObligationRepository::from_connection(conn.clone()));
        let usage_log_repo = Arc::new(UsageLogRepository::from_connection(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn.clone())?);

        let status_api = Arc::new(StatusApi::new(
            entity_repo.clone(),
            obligation_repo.clone(),
            usage_log_repo.clone(),
            config.clone(),
        ));
        let config_api = Arc::new(ConfigApi::new(config));

        let usage_importer = Arc::new(UsageLogImporterImpl::new(
            UsageLogRepository::from_connection(conn.clone()),
            Box::new(CsvParser),
        ));

        Ok(Self {
            entity_repo,
            obligation_repo,
            usage_log_repo,
            status_api,
            config_api,
            usage_importer,
        })
    }
}

/// 默认数据库路径: <data_dir>/compliance-deadline-engine/compliance.db
///
/// data_dir 不可用时退化为当前目录下的 compliance.db
pub fn get_default_db_path() -> String {
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("compliance-deadline-engine");
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir.join("compliance.db").to_string_lossy().to_string();
        }
    }
    "compliance.db".to_string()
}
