// ==========================================
// 设备合规期限跟踪系统 - 跟踪对象仓储
// ==========================================
// 红线: Repository 不含业务逻辑,只负责数据访问
// ==========================================

use crate::domain::entity::TrackedEntity;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// TrackedEntityRepository - 跟踪对象仓储
// ==========================================
pub struct TrackedEntityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TrackedEntityRepository {
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

    /// 创建跟踪对象
    pub fn create(&self, entity: &TrackedEntity) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO tracked_entity (entity_id, name, tracks_usage, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                entity.entity_id,
                entity.name,
                entity.tracks_usage,
                entity.is_active,
                entity.created_at,
                entity.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 按ID查询
    pub fn find_by_id(&self, entity_id: &str) -> RepositoryResult<Option<TrackedEntity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT entity_id, name, tracks_usage, is_active, created_at, updated_at
            FROM tracked_entity
            WHERE entity_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![entity_id], Self::map_row);

        match result {
            Ok(entity) => Ok(Some(entity)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询所有启用的跟踪对象（按名称排序,列表视图顺序稳定）
    pub fn list_active(&self) -> RepositoryResult<Vec<TrackedEntity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT entity_id, name, tracks_usage, is_active, created_at, updated_at
            FROM tracked_entity
            WHERE is_active = 1
            ORDER BY name, entity_id
            "#,
        )?;

        let rows = stmt.query_map([], Self::map_row)?;
        let mut entities = Vec::new();
        for row in rows {
            entities.push(row?);
        }
        Ok(entities)
    }

    /// 启用/停用跟踪对象
    pub fn set_active(&self, entity_id: &str, is_active: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE tracked_entity SET is_active = ?2, updated_at = ?3 WHERE entity_id = ?1",
            params![entity_id, is_active, Utc::now()],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "TrackedEntity".to_string(),
                id: entity_id.to_string(),
            });
        }
        Ok(())
    }

    /// 行映射
    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TrackedEntity> {
        Ok(TrackedEntity {
            entity_id: row.get(0)?,
            name: row.get(1)?,
            tracks_usage: row.get(2)?,
            is_active: row.get(3)?,
            created_at: row.get::<_, DateTime<Utc>>(4)?,
            updated_at: row.get::<_, DateTime<Utc>>(5)?,
        })
    }
}
