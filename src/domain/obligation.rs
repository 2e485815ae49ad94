// ==========================================
// 设备合规期限跟踪系统 - 合规义务领域模型
// ==========================================
// 依据: Compliance_Master_Spec.md - PART C 数据体系
// 依据: Deadline_Engine_Specs_v0.2.md - 主实体定义
// ==========================================
// 义务类型 = 可复用的周期性要求定义 (如"气体证书")
// 合规义务 = 义务类型绑定到某个跟踪对象的一个实例
// ==========================================

use crate::domain::types::{MeasureBy, RateMode, StatusLabel, Tier};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ObligationType - 义务类型
// ==========================================
// 引擎只读 measure_by / is_active / name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObligationType {
    pub type_id: String,         // 类型ID
    pub name: String,            // 类型名称 (如"燃气证书"/"500小时保养")
    pub measure_by: MeasureBy,   // 衡量方式: date / usage
    pub requires_document: bool, // 完成时是否要求上传凭证
    pub is_active: bool,         // 是否启用
}

impl ObligationType {
    /// 创建新的义务类型
    pub fn new(type_id: String, name: String, measure_by: MeasureBy) -> Self {
        Self {
            type_id,
            name,
            measure_by,
            requires_document: false,
            is_active: true,
        }
    }
}

// ==========================================
// Obligation - 合规义务
// ==========================================
// 不变式: date 分支字段与 usage 分支字段二选一生效,
//         由所属 ObligationType.measure_by 决定
// 注意: measure_by=usage 的义务要求其对象 tracks_usage=true
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obligation {
    pub obligation_id: String,           // 义务ID
    pub entity_id: String,               // 所属对象ID
    pub type_id: String,                 // 义务类型ID

    pub last_done_date: Option<NaiveDate>, // 上次完成日期

    // ===== date 分支 =====
    pub next_due_date: Option<NaiveDate>, // 下次到期日

    // ===== usage 分支 =====
    pub last_done_usage: Option<f64>,     // 上次完成时计数器读数
    pub frequency: Option<f64>,           // 两次完成之间的用量间隔
    pub frequency_unit: Option<String>,   // 用量单位 (km / h / ...)
    pub rate_mode: RateMode,              // 日均用量模式: manual / auto
    pub manual_daily_average: Option<f64>, // 人工录入的日均用量

    // ===== 元数据 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Obligation {
    /// 创建新的合规义务（字段默认全空,按分支补填）
    pub fn new(obligation_id: String, entity_id: String, type_id: String) -> Self {
        let now = Utc::now();
        Self {
            obligation_id,
            entity_id,
            type_id,
            last_done_date: None,
            next_due_date: None,
            last_done_usage: None,
            frequency: None,
            frequency_unit: None,
            rate_mode: RateMode::Manual,
            manual_daily_average: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// StatusResult - 义务状态计算结果
// ==========================================
// 引擎输出,只读,不落库
// 红线: 所有结果必须输出 reason (可解释性)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResult {
    pub obligation_id: String,            // 义务ID
    pub type_name: Option<String>,        // 义务类型名称 (类型缺失时为 None)
    pub measure_by: Option<MeasureBy>,    // 衡量方式 (类型缺失时为 None)
    pub due_at: Option<NaiveDate>,        // 估算到期日 (数据不足时为 None)
    pub days_remaining: Option<f64>,      // 剩余天数 (未取整,分级前原值)
    pub tier: Tier,                       // 状态等级
    pub label: StatusLabel,               // 状态标签
    pub reason: String,                   // 计算依据 (JSON)
}

// ==========================================
// EntityStatusSummary - 对象状态摘要
// ==========================================
// 列表/看板视图使用: 每个对象用"最近到期"的一条义务代表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStatusSummary {
    pub entity_id: String,                     // 对象ID
    pub entity_name: String,                   // 对象名称
    pub headline: Option<StatusResult>,        // 代表状态 (无义务时为 None)
    pub obligation_count: usize,               // 参与计算的义务数
}

impl EntityStatusSummary {
    /// 代表状态的等级 (无义务时为 None 等级)
    pub fn tier(&self) -> Tier {
        self.headline.as_ref().map(|h| h.tier).unwrap_or(Tier::None)
    }

    /// 代表状态的到期日
    pub fn due_at(&self) -> Option<NaiveDate> {
        self.headline.as_ref().and_then(|h| h.due_at)
    }
}
