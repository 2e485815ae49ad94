// ==========================================
// 设备合规期限跟踪系统 - 用量记录仓储
// ==========================================
// 红线: usage_log 仅追加,不提供更新接口 (可删除)
// "最新读数" = logged_at 最大的一条
// ==========================================

use crate::domain::entity::UsageLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// UsageLogRepository - 用量记录仓储
// ==========================================
pub struct UsageLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UsageLogRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加一条用量记录
    pub fn append(&self, log: &UsageLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO usage_log (entity_id, value, logged_at) VALUES (?1, ?2, ?3)",
            params![log.entity_id, log.value, log.logged_at],
        )?;
        Ok(())
    }

    /// 查询对象最新读数
    pub fn find_latest(&self, entity_id: &str) -> RepositoryResult<Option<UsageLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT entity_id, value, logged_at
            FROM usage_log
            WHERE entity_id = ?1
            ORDER BY logged_at DESC
            LIMIT 1
            "#,
        )?;

        let result = stmt.query_row(params![entity_id], Self::map_row);

        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询对象某时间窗口内的读数 (按时间升序,估算引擎的输入契约)
    pub fn find_window(
        &self,
        entity_id: &str,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> RepositoryResult<Vec<UsageLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT entity_id, value, logged_at
            FROM usage_log
            WHERE entity_id = ?1 AND logged_at >= ?2 AND logged_at <= ?3
            ORDER BY logged_at ASC
            "#,
        )?;

        let rows = stmt.query_map(params![entity_id, from, to], Self::map_row)?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?);
        }
        Ok(logs)
    }

    /// 删除对象的全部用量记录 (对象删除时的级联清理)
    pub fn delete_for_entity(&self, entity_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let deleted = conn.execute(
            "DELETE FROM usage_log WHERE entity_id = ?1",
            params![entity_id],
        )?;
        Ok(deleted)
    }

    /// 行映射
    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UsageLog> {
        Ok(UsageLog {
            entity_id: row.get(0)?,
            value: row.get(1)?,
            logged_at: row.get::<_, NaiveDateTime>(2)?,
        })
    }
}
