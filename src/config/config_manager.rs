// ==========================================
// 设备合规期限跟踪系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 红线: 阈值不变式 yellow ≥ orange ≥ red ≥ 0 在写入路径校验,
//       读路径对未持久化配置返回文档化默认值 {60, 30, 15}
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::threshold::{ThresholdPolicy, MAX_THRESHOLD_DAYS};
use crate::engine::rate_estimator::{DEFAULT_WINDOW_DAYS, MIN_WINDOW_DAYS};
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ===== 配置键 =====
const KEY_YELLOW_DAYS: &str = "threshold/yellow_days";
const KEY_ORANGE_DAYS: &str = "threshold/orange_days";
const KEY_RED_DAYS: &str = "threshold/red_days";
const KEY_WINDOW_DAYS: &str = "usage_rate/window_days";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    // ==========================================
    // 通用 key-value 读写 (scope_id='global')
    // ==========================================

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入配置值（scope_id='global',UPSERT）
    fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取整数配置,缺失或不可解析时返回默认值
    fn get_i64_or_default(&self, key: &str, default: i64) -> Result<i64, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(default))
    }

    // ==========================================
    // 阈值策略
    // ==========================================

    /// 读取阈值策略 (未持久化的键使用默认值)
    pub fn get_threshold_policy(&self) -> Result<ThresholdPolicy, Box<dyn Error>> {
        let default = ThresholdPolicy::default();
        Ok(ThresholdPolicy {
            yellow_days: self.get_i64_or_default(KEY_YELLOW_DAYS, default.yellow_days)?,
            orange_days: self.get_i64_or_default(KEY_ORANGE_DAYS, default.orange_days)?,
            red_days: self.get_i64_or_default(KEY_RED_DAYS, default.red_days)?,
        })
    }

    /// 写入阈值策略 (写入前校验不变式)
    pub fn set_threshold_policy(&self, policy: &ThresholdPolicy) -> Result<(), Box<dyn Error>> {
        policy.validate()?;

        self.set_config_value(KEY_YELLOW_DAYS, &policy.yellow_days.to_string())?;
        self.set_config_value(KEY_ORANGE_DAYS, &policy.orange_days.to_string())?;
        self.set_config_value(KEY_RED_DAYS, &policy.red_days.to_string())?;
        Ok(())
    }

    // ==========================================
    // 估算窗口
    // ==========================================

    /// 读取日均用量估算窗口 (天,默认 30)
    pub fn get_usage_rate_window_days(&self) -> Result<i64, Box<dyn Error>> {
        Ok(self
            .get_i64_or_default(KEY_WINDOW_DAYS, DEFAULT_WINDOW_DAYS)?
            .max(MIN_WINDOW_DAYS))
    }

    /// 写入估算窗口 (写入前校验范围)
    pub fn set_usage_rate_window_days(&self, days: i64) -> Result<(), Box<dyn Error>> {
        if days < MIN_WINDOW_DAYS {
            return Err(format!("估算窗口不得小于 {} 天: {}", MIN_WINDOW_DAYS, days).into());
        }
        if days > MAX_THRESHOLD_DAYS {
            return Err(format!("估算窗口不得大于 {} 天: {}", MAX_THRESHOLD_DAYS, days).into());
        }

        self.set_config_value(KEY_WINDOW_DAYS, &days.to_string())
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn test_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_default_threshold_policy() {
        // 未持久化 → 文档化默认值 {60, 30, 15}
        let manager = test_manager();

        let policy = manager.get_threshold_policy().unwrap();

        assert_eq!(policy.yellow_days, 60);
        assert_eq!(policy.orange_days, 30);
        assert_eq!(policy.red_days, 15);
    }

    #[test]
    fn test_set_and_get_threshold_policy() {
        let manager = test_manager();
        let policy = ThresholdPolicy::new(90, 45, 20);

        manager.set_threshold_policy(&policy).unwrap();

        assert_eq!(manager.get_threshold_policy().unwrap(), policy);
    }

    #[test]
    fn test_set_threshold_policy_rejects_violation() {
        // 写入路径拒绝违反不变式的策略
        let manager = test_manager();
        let bad = ThresholdPolicy::new(10, 45, 20);

        assert!(manager.set_threshold_policy(&bad).is_err());

        // 原默认值不受影响
        let policy = manager.get_threshold_policy().unwrap();
        assert_eq!(policy.yellow_days, 60);
    }

    #[test]
    fn test_window_days_default_and_update() {
        let manager = test_manager();

        assert_eq!(manager.get_usage_rate_window_days().unwrap(), 30);

        manager.set_usage_rate_window_days(14).unwrap();
        assert_eq!(manager.get_usage_rate_window_days().unwrap(), 14);

        // 低于下限拒绝
        assert!(manager.set_usage_rate_window_days(1).is_err());
    }

    #[test]
    fn test_config_overwrite() {
        // UPSERT: 重复写入同一键不报唯一约束错误
        let manager = test_manager();

        manager.set_threshold_policy(&ThresholdPolicy::new(90, 45, 20)).unwrap();
        manager.set_threshold_policy(&ThresholdPolicy::new(80, 40, 10)).unwrap();

        let policy = manager.get_threshold_policy().unwrap();
        assert_eq!(policy.yellow_days, 80);
    }
}
