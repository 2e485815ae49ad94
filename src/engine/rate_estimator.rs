// ==========================================
// 设备合规期限跟踪系统 - 日均用量估算引擎
// ==========================================
// 依据: Deadline_Engine_Specs_v0.2.md - 2. Usage Rate Estimator
// 红线: 估算无效时返回"无估算",绝不返回非正数/非有限数
// 红线: 手动/自动回退链通过 RateSource 具名联合表达
// ==========================================
// 职责: 由用量记录窗口估算日均用量 + 解析有效日均用量
// 输入: 用量记录序列 (按时间升序) + 评估时刻
// 输出: Option<f64> 日均用量 / RateSource
// ==========================================

use crate::domain::entity::UsageLog;
use crate::domain::types::{RateMode, RateSource};
use chrono::{Duration, NaiveDateTime};

/// 默认估算窗口 (天)
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// 窗口下限: 跨度不足 2 天的窗口无法产出日均
pub const MIN_WINDOW_DAYS: i64 = 2;

// ==========================================
// UsageRateEstimator - 日均用量估算引擎
// ==========================================
pub struct UsageRateEstimator {
    window_days: i64, // 回看窗口 (天)
}

impl UsageRateEstimator {
    /// 构造函数 (默认 30 天窗口)
    pub fn new() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    /// 指定窗口构造 (低于下限时取下限)
    pub fn with_window_days(window_days: i64) -> Self {
        Self {
            window_days: window_days.max(MIN_WINDOW_DAYS),
        }
    }

    /// 当前窗口天数
    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 估算日均用量
    ///
    /// # 参数
    /// - `logs`: 对象的用量记录,按 logged_at 升序
    /// - `evaluated_at`: 评估时刻 (窗口右端点)
    ///
    /// # 算法
    /// 取窗口内最早/最晚两条记录:
    /// Δvalue = latest.value − earliest.value
    /// Δdays  = floor((latest.logged_at − earliest.logged_at) / 1天)
    /// rate   = Δvalue / Δdays
    ///
    /// # 有效性门槛 (全部满足,否则返回 None)
    /// - 窗口内记录 ≥ 2 条
    /// - Δdays ≥ 1
    /// - Δvalue > 0 (计数器假定单调不减;负/零增量视为信号不足,如表盘重置或无活动)
    ///
    /// 非有限读数视为字段缺失,不参与计算
    pub fn estimate_daily_rate(
        &self,
        logs: &[UsageLog],
        evaluated_at: NaiveDateTime,
    ) -> Option<f64> {
        let cutoff = evaluated_at - Duration::days(self.window_days);

        // 窗口过滤 + 非有限读数过滤
        let in_window: Vec<&UsageLog> = logs
            .iter()
            .filter(|l| l.value.is_finite())
            .filter(|l| l.logged_at >= cutoff && l.logged_at <= evaluated_at)
            .collect();

        if in_window.len() < 2 {
            return None;
        }

        // 输入按时间升序;防御乱序输入,显式取最早/最晚
        let earliest = in_window
            .iter()
            .min_by_key(|l| l.logged_at)
            .expect("窗口非空");
        let latest = in_window
            .iter()
            .max_by_key(|l| l.logged_at)
            .expect("窗口非空");

        let delta_days = (latest.logged_at - earliest.logged_at).num_days();
        if delta_days < 1 {
            return None;
        }

        let delta_value = latest.value - earliest.value;
        if delta_value <= 0.0 {
            return None;
        }

        let rate = delta_value / delta_days as f64;
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }

        Some(rate)
    }

    /// 解析有效日均用量 (手动/自动回退链)
    ///
    /// # 规则
    /// - manual 模式: manual_daily_average 为有限正数 → Manual,否则 None
    /// - auto 模式:   估算有效 → Auto;
    ///               估算无效且存在有限正数人工值 → AutoWithManualFallback (兜底);
    ///               否则 None
    pub fn resolve_effective_rate(
        &self,
        rate_mode: RateMode,
        manual_daily_average: Option<f64>,
        logs: &[UsageLog],
        evaluated_at: NaiveDateTime,
    ) -> RateSource {
        // 非有限/非正人工值视为缺失
        let manual = manual_daily_average.filter(|v| v.is_finite() && *v > 0.0);

        match rate_mode {
            RateMode::Manual => match manual {
                Some(v) => RateSource::Manual(v),
                None => RateSource::None,
            },
            RateMode::Auto => match self.estimate_daily_rate(logs, evaluated_at) {
                Some(estimate) => RateSource::Auto(estimate),
                None => match manual {
                    Some(v) => RateSource::AutoWithManualFallback(v),
                    None => RateSource::None,
                },
            },
        }
    }
}

impl Default for UsageRateEstimator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// 基准评估时刻: 2026-01-31 00:00
    fn evaluated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// 构造用量记录 (2026-01 内某日)
    fn log(day: u32, value: f64) -> UsageLog {
        UsageLog::new(
            "E001".to_string(),
            value,
            NaiveDate::from_ymd_opt(2026, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_estimate_basic() {
        // 10天增加100 → 日均10
        let estimator = UsageRateEstimator::new();
        let logs = vec![log(10, 1000.0), log(20, 1100.0)];

        let rate = estimator.estimate_daily_rate(&logs, evaluated_at());

        assert_eq!(rate, Some(10.0));
    }

    #[test]
    fn test_estimate_uses_window_endpoints() {
        // 中间记录不影响端点法估算
        let estimator = UsageRateEstimator::new();
        let logs = vec![log(10, 1000.0), log(14, 1900.0), log(20, 1100.0)];

        let rate = estimator.estimate_daily_rate(&logs, evaluated_at());

        assert_eq!(rate, Some(10.0)); // (1100-1000)/10
    }

    #[test]
    fn test_estimate_insufficient_observations() {
        // 记录不足2条 → 无估算
        let estimator = UsageRateEstimator::new();

        assert_eq!(estimator.estimate_daily_rate(&[], evaluated_at()), None);
        assert_eq!(
            estimator.estimate_daily_rate(&[log(10, 1000.0)], evaluated_at()),
            None
        );
    }

    #[test]
    fn test_estimate_span_below_one_day() {
        // 同日两条记录 (Δdays = 0) → 无估算
        let estimator = UsageRateEstimator::new();
        let base = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        let logs = vec![
            UsageLog::new("E001".to_string(), 1000.0, base.and_hms_opt(8, 0, 0).unwrap()),
            UsageLog::new("E001".to_string(), 1050.0, base.and_hms_opt(18, 0, 0).unwrap()),
        ];

        assert_eq!(estimator.estimate_daily_rate(&logs, evaluated_at()), None);
    }

    #[test]
    fn test_estimate_non_positive_delta() {
        // 零增量 / 负增量 (表盘重置) → 信号不足,无估算,不报错
        let estimator = UsageRateEstimator::new();

        let flat = vec![log(10, 1000.0), log(20, 1000.0)];
        assert_eq!(estimator.estimate_daily_rate(&flat, evaluated_at()), None);

        let reset = vec![log(10, 1000.0), log(20, 50.0)];
        assert_eq!(estimator.estimate_daily_rate(&reset, evaluated_at()), None);
    }

    #[test]
    fn test_estimate_outside_window_excluded() {
        // 窗口外 (>30天前) 的记录不参与估算
        let estimator = UsageRateEstimator::new();
        let old = UsageLog::new(
            "E001".to_string(),
            100.0,
            NaiveDate::from_ymd_opt(2025, 11, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        let logs = vec![old, log(20, 1100.0)];

        // 窗口内只剩1条 → 无估算
        assert_eq!(estimator.estimate_daily_rate(&logs, evaluated_at()), None);
    }

    #[test]
    fn test_estimate_non_finite_values_ignored() {
        // 非有限读数视为缺失
        let estimator = UsageRateEstimator::new();
        let logs = vec![log(10, 1000.0), log(15, f64::NAN), log(20, 1100.0)];

        let rate = estimator.estimate_daily_rate(&logs, evaluated_at());

        assert_eq!(rate, Some(10.0));
    }

    #[test]
    fn test_estimate_never_non_positive() {
        // 有效性门槛: 任何输出必须为有限正数
        let estimator = UsageRateEstimator::new();
        let cases: Vec<Vec<UsageLog>> = vec![
            vec![],
            vec![log(10, 1000.0)],
            vec![log(10, 1000.0), log(20, 900.0)],
            vec![log(10, 1000.0), log(20, 1000.0)],
        ];

        for logs in cases {
            if let Some(rate) = estimator.estimate_daily_rate(&logs, evaluated_at()) {
                assert!(rate.is_finite() && rate > 0.0);
            }
        }
    }

    #[test]
    fn test_window_floor() {
        // 窗口低于下限时取下限
        let estimator = UsageRateEstimator::with_window_days(0);
        assert_eq!(estimator.window_days(), MIN_WINDOW_DAYS);

        let estimator = UsageRateEstimator::with_window_days(90);
        assert_eq!(estimator.window_days(), 90);
    }

    // ==========================================
    // 有效日均用量解析 (回退链)
    // ==========================================

    #[test]
    fn test_resolve_manual_mode() {
        let estimator = UsageRateEstimator::new();
        let logs = vec![log(10, 1000.0), log(20, 1100.0)];

        // manual 模式: 有效人工值 → Manual (忽略记录)
        let source =
            estimator.resolve_effective_rate(RateMode::Manual, Some(8.0), &logs, evaluated_at());
        assert_eq!(source, RateSource::Manual(8.0));

        // 人工值缺失 → None
        let source =
            estimator.resolve_effective_rate(RateMode::Manual, None, &logs, evaluated_at());
        assert_eq!(source, RateSource::None);

        // 非正人工值 → None
        let source =
            estimator.resolve_effective_rate(RateMode::Manual, Some(0.0), &logs, evaluated_at());
        assert_eq!(source, RateSource::None);

        // 非有限人工值视为缺失 → None
        let source = estimator.resolve_effective_rate(
            RateMode::Manual,
            Some(f64::NAN),
            &logs,
            evaluated_at(),
        );
        assert_eq!(source, RateSource::None);
    }

    #[test]
    fn test_resolve_auto_mode_prefers_estimate() {
        // auto 模式: 估算有效 → Auto (人工值不参与)
        let estimator = UsageRateEstimator::new();
        let logs = vec![log(10, 1000.0), log(20, 1100.0)];

        let source =
            estimator.resolve_effective_rate(RateMode::Auto, Some(8.0), &logs, evaluated_at());

        assert_eq!(source, RateSource::Auto(10.0));
    }

    #[test]
    fn test_resolve_auto_mode_manual_fallback() {
        // auto 模式估算失败 + 有人工值 → AutoWithManualFallback (兜底)
        let estimator = UsageRateEstimator::new();

        let source =
            estimator.resolve_effective_rate(RateMode::Auto, Some(8.0), &[], evaluated_at());

        assert_eq!(source, RateSource::AutoWithManualFallback(8.0));
    }

    #[test]
    fn test_resolve_auto_mode_no_rate() {
        // auto 模式估算失败 + 无人工值 → None
        let estimator = UsageRateEstimator::new();

        let source = estimator.resolve_effective_rate(RateMode::Auto, None, &[], evaluated_at());

        assert_eq!(source, RateSource::None);
    }
}
