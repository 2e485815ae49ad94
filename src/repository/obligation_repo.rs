// ==========================================
// 设备合规期限跟踪系统 - 合规义务仓储
// ==========================================
// 红线: Repository 不含业务逻辑,只负责数据访问
// 管理 obligation_type / obligation 两张表
// ==========================================

use crate::domain::obligation::{Obligation, ObligationType};
use crate::domain::types::{MeasureBy, RateMode};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ObligationRepository - 合规义务仓储
// ==========================================
pub struct ObligationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ObligationRepository {
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

    // ==========================================
    // obligation_type
    // ==========================================

    /// 创建义务类型
    pub fn create_type(&self, obligation_type: &ObligationType) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO obligation_type (type_id, name, measure_by, requires_document, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                obligation_type.type_id,
                obligation_type.name,
                obligation_type.measure_by.to_db_str(),
                obligation_type.requires_document,
                obligation_type.is_active,
            ],
        )?;
        Ok(())
    }

    /// 按ID查询义务类型
    pub fn find_type_by_id(&self, type_id: &str) -> RepositoryResult<Option<ObligationType>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT type_id, name, measure_by, requires_document, is_active
            FROM obligation_type
            WHERE type_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![type_id], Self::map_type_row);

        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部义务类型,返回 type_id → ObligationType 映射
    ///
    /// 状态计算按对象批量进行,先取映射避免逐条回查
    pub fn load_type_map(&self) -> RepositoryResult<HashMap<String, ObligationType>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT type_id, name, measure_by, requires_document, is_active
            FROM obligation_type
            "#,
        )?;

        let rows = stmt.query_map([], Self::map_type_row)?;
        let mut map = HashMap::new();
        for row in rows {
            let t = row?;
            map.insert(t.type_id.clone(), t);
        }
        Ok(map)
    }

    // ==========================================
    // obligation
    // ==========================================

    /// 创建合规义务
    pub fn create(&self, obligation: &Obligation) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO obligation (
                obligation_id, entity_id, type_id,
                last_done_date, next_due_date,
                last_done_usage, frequency, frequency_unit,
                rate_mode, manual_daily_average,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                obligation.obligation_id,
                obligation.entity_id,
                obligation.type_id,
                obligation.last_done_date,
                obligation.next_due_date,
                obligation.last_done_usage,
                obligation.frequency,
                obligation.frequency_unit,
                obligation.rate_mode.to_db_str(),
                obligation.manual_daily_average,
                obligation.created_at,
                obligation.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 按ID查询合规义务
    pub fn find_by_id(&self, obligation_id: &str) -> RepositoryResult<Option<Obligation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE obligation_id = ?1",
            Self::SELECT_OBLIGATION
        ))?;

        let result = stmt.query_row(params![obligation_id], Self::map_obligation_row);

        match result {
            Ok(ob) => Ok(Some(ob)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询对象的全部合规义务（创建顺序,归并的"稳定首条"依赖此顺序）
    pub fn list_by_entity(&self, entity_id: &str) -> RepositoryResult<Vec<Obligation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE entity_id = ?1 ORDER BY created_at, obligation_id",
            Self::SELECT_OBLIGATION
        ))?;

        let rows = stmt.query_map(params![entity_id], Self::map_obligation_row)?;
        let mut obligations = Vec::new();
        for row in rows {
            obligations.push(row?);
        }
        Ok(obligations)
    }

    /// 删除合规义务
    pub fn delete(&self, obligation_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "DELETE FROM obligation WHERE obligation_id = ?1",
            params![obligation_id],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Obligation".to_string(),
                id: obligation_id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 行映射
    // ==========================================

    const SELECT_OBLIGATION: &'static str = r#"
        SELECT obligation_id, entity_id, type_id,
               last_done_date, next_due_date,
               last_done_usage, frequency, frequency_unit,
               rate_mode, manual_daily_average,
               created_at, updated_at
        FROM obligation
    "#;

    fn map_type_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ObligationType> {
        let measure_by_raw: String = row.get(2)?;
        Ok(ObligationType {
            type_id: row.get(0)?,
            name: row.get(1)?,
            // 未知衡量方式按 date 读出;写入路径只接受合法值
            measure_by: MeasureBy::from_str(&measure_by_raw).unwrap_or(MeasureBy::Date),
            requires_document: row.get(3)?,
            is_active: row.get(4)?,
        })
    }

    fn map_obligation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Obligation> {
        let rate_mode_raw: String = row.get(8)?;
        Ok(Obligation {
            obligation_id: row.get(0)?,
            entity_id: row.get(1)?,
            type_id: row.get(2)?,
            last_done_date: row.get::<_, Option<NaiveDate>>(3)?,
            next_due_date: row.get::<_, Option<NaiveDate>>(4)?,
            last_done_usage: row.get(5)?,
            frequency: row.get(6)?,
            frequency_unit: row.get(7)?,
            rate_mode: RateMode::from_str(&rate_mode_raw),
            manual_daily_average: row.get(9)?,
            created_at: row.get::<_, DateTime<Utc>>(10)?,
            updated_at: row.get::<_, DateTime<Utc>>(11)?,
        })
    }
}
