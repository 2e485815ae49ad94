// ==========================================
// 设备合规期限跟踪系统 - 跟踪对象领域模型
// ==========================================
// 依据: Compliance_Master_Spec.md - PART C 数据体系
// ==========================================
// 跟踪对象 = 被监控的设备/车辆/人员
// 用量记录 = 对象计数器读数 (里程表/工时表),仅追加
// ==========================================

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// TrackedEntity - 跟踪对象
// ==========================================
// 生命周期由外部 CRUD 层管理,引擎只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedEntity {
    pub entity_id: String,        // 对象ID
    pub name: String,             // 对象名称
    pub tracks_usage: bool,       // 是否跟踪用量 (里程/工时)
    pub is_active: bool,          // 是否启用
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrackedEntity {
    /// 创建新的跟踪对象
    pub fn new(entity_id: String, name: String, tracks_usage: bool) -> Self {
        let now = Utc::now();
        Self {
            entity_id,
            name,
            tracks_usage,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// UsageLog - 用量记录
// ==========================================
// 红线: 仅追加,不可修改 (可删除)
// "最新读数" = logged_at 最大的一条
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLog {
    pub entity_id: String,        // 所属对象ID
    pub value: f64,               // 计数器读数
    pub logged_at: NaiveDateTime, // 记录时刻
}

impl UsageLog {
    /// 创建新的用量记录
    pub fn new(entity_id: String, value: f64, logged_at: NaiveDateTime) -> Self {
        Self {
            entity_id,
            value,
            logged_at,
        }
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_tracked_entity_new() {
        let entity = TrackedEntity::new("E001".to_string(), "1号挖掘机".to_string(), true);

        assert_eq!(entity.entity_id, "E001");
        assert!(entity.tracks_usage);
        assert!(entity.is_active);
    }

    #[test]
    fn test_usage_log_new() {
        let logged_at = NaiveDate::from_ymd_opt(2026, 1, 10)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let log = UsageLog::new("E001".to_string(), 1234.5, logged_at);

        assert_eq!(log.entity_id, "E001");
        assert_eq!(log.value, 1234.5);
        assert_eq!(log.logged_at, logged_at);
    }
}
