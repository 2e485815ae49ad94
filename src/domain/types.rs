// ==========================================
// 设备合规期限跟踪系统 - 领域类型定义
// ==========================================
// 依据: Compliance_Master_Spec.md - PART A 状态等级体系
// 依据: Deadline_Engine_Specs_v0.2.md - 0.2 状态灯语义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 状态等级 (Tier / 状态灯)
// ==========================================
// 红线: "已过期 → RED" 为固定规则,不随阈值配置变化
// 顺序: None < Green < Yellow < Orange < Red (便于取最严重等级)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    None,   // 无信息（数据不足,非错误）
    Green,  // 正常
    Yellow, // 关注
    Orange, // 临近
    Red,    // 危险/过期
}

impl Tier {
    /// 列表排序优先级 (越小越靠前)
    ///
    /// 顺序: Red < Orange < Yellow < Green < None
    /// 用于对象列表的"先按严重度、再按到期日"两级排序
    pub fn priority(&self) -> u8 {
        match self {
            Tier::Red => 0,
            Tier::Orange => 1,
            Tier::Yellow => 2,
            Tier::Green => 3,
            Tier::None => 4,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Tier::None => "NONE",
            Tier::Green => "GREEN",
            Tier::Yellow => "YELLOW",
            Tier::Orange => "ORANGE",
            Tier::Red => "RED",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 衡量方式 (Measure By)
// ==========================================
// 义务类型的到期衡量方式: 按日期 / 按用量
// 序列化格式: 小写 (与外部记录形状一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureBy {
    Date,  // 按日期（固定到期日）
    Usage, // 按用量（里程/工时等计数器）
}

impl MeasureBy {
    /// 从字符串解析衡量方式
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "date" => Some(MeasureBy::Date),
            "usage" => Some(MeasureBy::Usage),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MeasureBy::Date => "date",
            MeasureBy::Usage => "usage",
        }
    }
}

impl fmt::Display for MeasureBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 日均用量模式 (Rate Mode)
// ==========================================
// manual: 人工录入日均用量
// auto:   由用量记录窗口自动估算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateMode {
    Manual, // 人工录入
    Auto,   // 自动估算
}

impl RateMode {
    /// 从字符串解析日均用量模式（未知值回退 manual）
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "auto" => RateMode::Auto,
            _ => RateMode::Manual,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RateMode::Manual => "manual",
            RateMode::Auto => "auto",
        }
    }
}

impl fmt::Display for RateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 有效日均用量来源 (Rate Source)
// ==========================================
// 红线: 手动/自动回退链必须是单一具名联合,不允许散落 if/else
// - Manual:                 manual 模式下的人工值
// - Auto:                   auto 模式下估算器输出
// - AutoWithManualFallback: auto 模式下估算失败,回退人工值兜底
// - None:                   无可用日均用量
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateSource {
    Manual(f64),
    Auto(f64),
    AutoWithManualFallback(f64),
    None,
}

impl RateSource {
    /// 取有效日均用量（None 时返回 Option::None）
    pub fn value(&self) -> Option<f64> {
        match self {
            RateSource::Manual(v)
            | RateSource::Auto(v)
            | RateSource::AutoWithManualFallback(v) => Some(*v),
            RateSource::None => None,
        }
    }

    /// 是否存在可用的日均用量
    pub fn is_usable(&self) -> bool {
        self.value().is_some()
    }

    /// 来源代码（可解释性 reason 使用）
    pub fn source_code(&self) -> &'static str {
        match self {
            RateSource::Manual(_) => "MANUAL",
            RateSource::Auto(_) => "AUTO",
            RateSource::AutoWithManualFallback(_) => "AUTO_MANUAL_FALLBACK",
            RateSource::None => "NONE",
        }
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{}({})", self.source_code(), v),
            None => write!(f, "{}", self.source_code()),
        }
    }
}

// ==========================================
// 状态标签 (Status Label)
// ==========================================
// 依据: Deadline_Engine_Specs_v0.2.md - 4.1 标签全集
// 标签为引擎输出的规范值（英文）,界面展示经 i18n 翻译
// 注意: "Incomplete"/"No date" 等是一等展示状态,不是错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLabel {
    #[serde(rename = "Expired")]
    Expired, // 已过期
    #[serde(rename = "Critical")]
    Critical, // 临界
    #[serde(rename = "Due soon")]
    DueSoon, // 即将到期
    #[serde(rename = "Current")]
    Current, // 正常
    #[serde(rename = "No type")]
    NoType, // 义务类型缺失
    #[serde(rename = "No date")]
    NoDate, // 到期日缺失
    #[serde(rename = "Incomplete")]
    Incomplete, // 数据不足
}

impl StatusLabel {
    /// 规范标签文本
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Expired => "Expired",
            StatusLabel::Critical => "Critical",
            StatusLabel::DueSoon => "Due soon",
            StatusLabel::Current => "Current",
            StatusLabel::NoType => "No type",
            StatusLabel::NoDate => "No date",
            StatusLabel::Incomplete => "Incomplete",
        }
    }

    /// i18n 词条 key（界面展示用）
    pub fn i18n_key(&self) -> &'static str {
        match self {
            StatusLabel::Expired => "label.expired",
            StatusLabel::Critical => "label.critical",
            StatusLabel::DueSoon => "label.due_soon",
            StatusLabel::Current => "label.current",
            StatusLabel::NoType => "label.no_type",
            StatusLabel::NoDate => "label.no_date",
            StatusLabel::Incomplete => "label.incomplete",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
