// ==========================================
// 设备合规期限跟踪系统 - 义务状态计算引擎
// ==========================================
// 依据: Deadline_Engine_Specs_v0.2.md - 3. Status Calculator
// 红线: 业务数据缺口一律降级为 NONE/Incomplete,绝不中断批量计算
// 红线: 所有规则必须输出 reason (可解释性)
// 红线: "今天"由调用方显式传入,引擎内禁止取系统时钟
// ==========================================
// 职责: 单条义务 → StatusResult
// 输入: 义务 + 义务类型 + 最新用量读数 + 有效日均用量 + 阈值策略 + 评估日期
// 输出: StatusResult (到期日/剩余天数/等级/标签/reason)
// ==========================================

use crate::domain::entity::UsageLog;
use crate::domain::obligation::{Obligation, ObligationType, StatusResult};
use crate::domain::threshold::ThresholdPolicy;
use crate::domain::types::{MeasureBy, RateSource, StatusLabel, Tier};
use crate::engine::classifier::TierClassifier;
use chrono::{Duration, NaiveDate};
use serde_json::json;

// ==========================================
// StatusCalculator - 义务状态计算引擎
// ==========================================
// 纯函数引擎: 相同输入 + 相同评估日期 → 相同输出
pub struct StatusCalculator {
    classifier: TierClassifier,
}

impl StatusCalculator {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            classifier: TierClassifier::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算单条义务的状态
    ///
    /// # 参数
    /// - `obligation`: 合规义务
    /// - `obligation_type`: 义务类型 (缺失时产出 NONE/"No type")
    /// - `latest_usage`: 对象最新用量读数 (usage 分支使用)
    /// - `effective_rate`: 有效日均用量 (由 UsageRateEstimator 解析)
    /// - `policy`: 阈值策略
    /// - `today`: 评估日期 (日历日粒度)
    ///
    /// # 规则
    /// - date 分支: 剩余天数 = next_due_date − today,经分级引擎定级
    /// - usage 分支: 优先锚定最新读数;无读数时回退 last_done_date 外推
    /// - 数据不足 → NONE/Incomplete (一等终态,非错误)
    pub fn calculate(
        &self,
        obligation: &Obligation,
        obligation_type: Option<&ObligationType>,
        latest_usage: Option<&UsageLog>,
        effective_rate: &RateSource,
        policy: &ThresholdPolicy,
        today: NaiveDate,
    ) -> StatusResult {
        // 1. 义务类型缺失 → NONE/"No type"
        let obligation_type = match obligation_type {
            Some(t) => t,
            None => {
                return StatusResult {
                    obligation_id: obligation.obligation_id.clone(),
                    type_name: None,
                    measure_by: None,
                    due_at: None,
                    days_remaining: None,
                    tier: Tier::None,
                    label: StatusLabel::NoType,
                    reason: json!({
                        "primary_reason": "OBLIGATION_TYPE_MISSING",
                        "details": { "type_id": obligation.type_id, "today": today.to_string() }
                    })
                    .to_string(),
                };
            }
        };

        // 2. 按衡量方式分派
        match obligation_type.measure_by {
            MeasureBy::Date => self.calculate_date_branch(obligation, obligation_type, policy, today),
            MeasureBy::Usage => self.calculate_usage_branch(
                obligation,
                obligation_type,
                latest_usage,
                effective_rate,
                policy,
                today,
            ),
        }
    }

    // ==========================================
    // date 分支 (依据 Deadline_Engine_Specs 3.2)
    // ==========================================

    fn calculate_date_branch(
        &self,
        obligation: &Obligation,
        obligation_type: &ObligationType,
        policy: &ThresholdPolicy,
        today: NaiveDate,
    ) -> StatusResult {
        // 到期日缺失 → NONE/"No date"
        let due_date = match obligation.next_due_date {
            Some(d) => d,
            None => {
                return self.result_without_date(
                    obligation,
                    obligation_type,
                    StatusLabel::NoDate,
                    json!({
                        "primary_reason": "NO_DUE_DATE",
                        "details": { "today": today.to_string() }
                    })
                    .to_string(),
                );
            }
        };

        // 日历日粒度: 剩余天数为整数天
        let days_remaining = (due_date - today).num_days() as f64;
        let (tier, label) = self.classifier.classify(days_remaining, policy);

        StatusResult {
            obligation_id: obligation.obligation_id.clone(),
            type_name: Some(obligation_type.name.clone()),
            measure_by: Some(MeasureBy::Date),
            due_at: Some(due_date),
            days_remaining: Some(days_remaining),
            tier,
            label,
            reason: json!({
                "primary_reason": "DATE_DEADLINE",
                "details": {
                    "next_due_date": due_date.to_string(),
                    "today": today.to_string(),
                    "days_remaining": days_remaining,
                }
            })
            .to_string(),
        }
    }

    // ==========================================
    // usage 分支 (依据 Deadline_Engine_Specs 3.3)
    // ==========================================
    // 两条路径:
    // A. 读数锚定 (优先): remaining = frequency − (latest − last_done_usage)
    // B. 完成日外推 (无读数兜底): due = last_done_date + frequency/rate
    // ==========================================

    fn calculate_usage_branch(
        &self,
        obligation: &Obligation,
        obligation_type: &ObligationType,
        latest_usage: Option<&UsageLog>,
        effective_rate: &RateSource,
        policy: &ThresholdPolicy,
        today: NaiveDate,
    ) -> StatusResult {
        // 非有限数值一律视为字段缺失 (不向调用方传播 NaN/除零)
        let rate = effective_rate.value().filter(|v| v.is_finite() && *v > 0.0);
        let frequency = obligation.frequency.filter(|v| v.is_finite());
        let last_done_usage = obligation.last_done_usage.filter(|v| v.is_finite());
        let latest_value = latest_usage.map(|l| l.value).filter(|v| v.is_finite());

        // 路径 A: 读数锚定
        if let (Some(rate), Some(frequency), Some(last_done), Some(latest)) =
            (rate, frequency, last_done_usage, latest_value)
        {
            return self.usage_status_from_observation(
                obligation,
                obligation_type,
                effective_rate,
                rate,
                frequency,
                last_done,
                latest,
                policy,
                today,
            );
        }

        // 路径 B: 完成日外推 (无读数,但已知上次完成日期)
        if latest_value.is_none() {
            if let (Some(rate), Some(frequency), Some(last_done_date)) =
                (rate, frequency, obligation.last_done_date)
            {
                return self.usage_status_from_last_done(
                    obligation,
                    obligation_type,
                    effective_rate,
                    rate,
                    frequency,
                    last_done_date,
                    policy,
                    today,
                );
            }
        }

        // 数据不足 → NONE/Incomplete (列出缺失因子,可解释性)
        let mut missing = Vec::new();
        if last_done_usage.is_none() {
            missing.push("last_done_usage");
        }
        if frequency.is_none() {
            missing.push("frequency");
        }
        if latest_value.is_none() {
            missing.push("latest_usage_value");
        }
        if rate.is_none() {
            missing.push("effective_daily_rate");
        }

        self.result_without_date(
            obligation,
            obligation_type,
            StatusLabel::Incomplete,
            json!({
                "primary_reason": "INSUFFICIENT_USAGE_DATA",
                "factors": missing,
                "details": {
                    "rate_source": effective_rate.source_code(),
                    "today": today.to_string(),
                }
            })
            .to_string(),
        )
    }

    /// 路径 A: 以最新读数锚定
    #[allow(clippy::too_many_arguments)]
    fn usage_status_from_observation(
        &self,
        obligation: &Obligation,
        obligation_type: &ObligationType,
        effective_rate: &RateSource,
        rate: f64,
        frequency: f64,
        last_done_usage: f64,
        latest_value: f64,
        policy: &ThresholdPolicy,
        today: NaiveDate,
    ) -> StatusResult {
        let used_since_last = latest_value - last_done_usage;
        let remaining_usage = frequency - used_since_last;

        // 剩余天数为实数,分级前不取整
        let days_remaining = remaining_usage / rate;
        let (tier, label) = self.classifier.classify(days_remaining, policy);

        // 用量已超额时无法推导精确的未来到期日,以 today 作哨兵值
        let due_at = if remaining_usage <= 0.0 {
            today
        } else {
            today + Duration::days(days_remaining.round() as i64)
        };

        StatusResult {
            obligation_id: obligation.obligation_id.clone(),
            type_name: Some(obligation_type.name.clone()),
            measure_by: Some(MeasureBy::Usage),
            due_at: Some(due_at),
            days_remaining: Some(days_remaining),
            tier,
            label,
            reason: json!({
                "primary_reason": "USAGE_OBSERVATION_ANCHORED",
                "details": {
                    "latest_usage_value": latest_value,
                    "last_done_usage": last_done_usage,
                    "used_since_last": used_since_last,
                    "frequency": frequency,
                    "remaining_usage": remaining_usage,
                    "daily_rate": rate,
                    "rate_source": effective_rate.source_code(),
                    "days_remaining": days_remaining,
                    "today": today.to_string(),
                }
            })
            .to_string(),
        }
    }

    /// 路径 B: 以上次完成日期外推
    #[allow(clippy::too_many_arguments)]
    fn usage_status_from_last_done(
        &self,
        obligation: &Obligation,
        obligation_type: &ObligationType,
        effective_rate: &RateSource,
        rate: f64,
        frequency: f64,
        last_done_date: NaiveDate,
        policy: &ThresholdPolicy,
        today: NaiveDate,
    ) -> StatusResult {
        // 外推周期天数 = frequency / rate;按与 today 的距离定级
        let cycle_days = frequency / rate;
        let elapsed_days = (today - last_done_date).num_days() as f64;
        let days_remaining = cycle_days - elapsed_days;

        let (tier, label) = self.classifier.classify(days_remaining, policy);

        let due_at = if days_remaining <= 0.0 {
            today
        } else {
            today + Duration::days(days_remaining.round() as i64)
        };

        StatusResult {
            obligation_id: obligation.obligation_id.clone(),
            type_name: Some(obligation_type.name.clone()),
            measure_by: Some(MeasureBy::Usage),
            due_at: Some(due_at),
            days_remaining: Some(days_remaining),
            tier,
            label,
            reason: json!({
                "primary_reason": "USAGE_LAST_DONE_PROJECTED",
                "details": {
                    "last_done_date": last_done_date.to_string(),
                    "frequency": frequency,
                    "daily_rate": rate,
                    "rate_source": effective_rate.source_code(),
                    "cycle_days": cycle_days,
                    "days_remaining": days_remaining,
                    "today": today.to_string(),
                }
            })
            .to_string(),
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 构造无到期日的终态结果 (NONE 等级)
    fn result_without_date(
        &self,
        obligation: &Obligation,
        obligation_type: &ObligationType,
        label: StatusLabel,
        reason: String,
    ) -> StatusResult {
        StatusResult {
            obligation_id: obligation.obligation_id.clone(),
            type_name: Some(obligation_type.name.clone()),
            measure_by: Some(obligation_type.measure_by),
            due_at: None,
            days_remaining: None,
            tier: Tier::None,
            label,
            reason,
        }
    }
}

impl Default for StatusCalculator {
    fn default() -> Self {
        Self::new()
    }
}
