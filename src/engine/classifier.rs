// ==========================================
// 设备合规期限跟踪系统 - 状态分级引擎
// ==========================================
// 依据: Deadline_Engine_Specs_v0.2.md - 1. Threshold Policy
// 红线: "剩余天数 ≤ 0 → RED/Expired" 为固定规则,优先于一切阈值配置
// 红线: 分级逻辑全系统唯一,所有消费方调用本引擎,禁止各页面自行实现
// ==========================================
// 职责: 剩余天数 → (状态等级, 状态标签)
// 输入: 剩余天数 (实数,未取整) + 阈值策略
// 输出: (Tier, StatusLabel)
// ==========================================

use crate::domain::threshold::ThresholdPolicy;
use crate::domain::types::{StatusLabel, Tier};

// ==========================================
// TierClassifier - 状态分级引擎
// ==========================================
pub struct TierClassifier {
    // 无状态引擎,不需要注入依赖
}

impl TierClassifier {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 剩余天数分级
    ///
    /// # 参数
    /// - `days_remaining`: 剩余天数 (实数,分级前不取整)
    /// - `policy`: 阈值策略 (假定写入时已校验;违例策略产出尽力而为的分级)
    ///
    /// # 规则 (顺序执行,命中即返回)
    /// 1) days ≤ 0                    → RED / Expired (固定规则)
    /// 2) 0 < days ≤ red_days         → RED / Critical
    /// 3) red_days < days ≤ orange    → ORANGE / Due soon
    /// 4) orange < days ≤ yellow      → YELLOW / Due soon
    /// 5) days > yellow               → GREEN / Current
    ///
    /// 对任意实数输入均有定义,无错误分支
    pub fn classify(&self, days_remaining: f64, policy: &ThresholdPolicy) -> (Tier, StatusLabel) {
        if days_remaining <= 0.0 {
            return (Tier::Red, StatusLabel::Expired);
        }
        if days_remaining <= policy.red_days as f64 {
            return (Tier::Red, StatusLabel::Critical);
        }
        if days_remaining <= policy.orange_days as f64 {
            return (Tier::Orange, StatusLabel::DueSoon);
        }
        if days_remaining <= policy.yellow_days as f64 {
            return (Tier::Yellow, StatusLabel::DueSoon);
        }
        (Tier::Green, StatusLabel::Current)
    }
}

impl Default for TierClassifier {
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

    /// 测试用默认策略 {60, 30, 15}
    fn policy() -> ThresholdPolicy {
        ThresholdPolicy::default()
    }

    #[test]
    fn test_expired_override() {
        // 固定规则: days ≤ 0 → RED/Expired,与 red_days 配置无关
        let classifier = TierClassifier::new();

        let (tier, label) = classifier.classify(0.0, &policy());
        assert_eq!(tier, Tier::Red);
        assert_eq!(label, StatusLabel::Expired);

        let (tier, label) = classifier.classify(-5.0, &policy());
        assert_eq!(tier, Tier::Red);
        assert_eq!(label, StatusLabel::Expired);

        // red_days = 0 时仍然生效
        let zero_red = ThresholdPolicy::new(60, 30, 0);
        let (tier, label) = classifier.classify(0.0, &zero_red);
        assert_eq!(tier, Tier::Red);
        assert_eq!(label, StatusLabel::Expired);
    }

    #[test]
    fn test_critical_band() {
        let classifier = TierClassifier::new();

        // 0 < days ≤ 15 → RED/Critical
        let (tier, label) = classifier.classify(0.5, &policy());
        assert_eq!(tier, Tier::Red);
        assert_eq!(label, StatusLabel::Critical);

        let (tier, label) = classifier.classify(15.0, &policy());
        assert_eq!(tier, Tier::Red);
        assert_eq!(label, StatusLabel::Critical);
    }

    #[test]
    fn test_orange_band() {
        let classifier = TierClassifier::new();

        // 15 < days ≤ 30 → ORANGE
        let (tier, label) = classifier.classify(15.1, &policy());
        assert_eq!(tier, Tier::Orange);
        assert_eq!(label, StatusLabel::DueSoon);

        let (tier, _) = classifier.classify(30.0, &policy());
        assert_eq!(tier, Tier::Orange);
    }

    #[test]
    fn test_yellow_band() {
        let classifier = TierClassifier::new();

        // 30 < days ≤ 60 → YELLOW
        let (tier, label) = classifier.classify(30.5, &policy());
        assert_eq!(tier, Tier::Yellow);
        assert_eq!(label, StatusLabel::DueSoon);

        let (tier, _) = classifier.classify(60.0, &policy());
        assert_eq!(tier, Tier::Yellow);
    }

    #[test]
    fn test_green_band() {
        let classifier = TierClassifier::new();

        let (tier, label) = classifier.classify(60.5, &policy());
        assert_eq!(tier, Tier::Green);
        assert_eq!(label, StatusLabel::Current);

        let (tier, _) = classifier.classify(3650.0, &policy());
        assert_eq!(tier, Tier::Green);
    }

    #[test]
    fn test_monotonicity() {
        // 剩余天数增大时,严重度单调不升
        let classifier = TierClassifier::new();
        let p = policy();

        let samples: Vec<f64> = vec![-10.0, 0.0, 1.0, 7.5, 15.0, 16.0, 30.0, 31.0, 60.0, 61.0, 365.0];
        let mut prev_priority = 0u8;
        for (i, d) in samples.iter().enumerate() {
            let (tier, _) = classifier.classify(*d, &p);
            if i > 0 {
                assert!(
                    tier.priority() >= prev_priority,
                    "days={} 处严重度上升,违反单调性",
                    d
                );
            }
            prev_priority = tier.priority();
        }
    }

    #[test]
    fn test_fractional_days_not_rounded() {
        // 分级接收未取整的实数: 30.2 天必须落在 YELLOW,而非四舍五入到 30 → ORANGE
        let classifier = TierClassifier::new();

        let (tier, _) = classifier.classify(30.2, &policy());
        assert_eq!(tier, Tier::Yellow);

        let (tier, _) = classifier.classify(14.9, &policy());
        assert_eq!(tier, Tier::Red);
    }

    #[test]
    fn test_degenerate_policy_no_panic() {
        // 违例策略 (yellow < orange < red): 不承诺分级一致性,但不得 panic
        let classifier = TierClassifier::new();
        let bad = ThresholdPolicy::new(10, 20, 30);

        let _ = classifier.classify(5.0, &bad);
        let _ = classifier.classify(15.0, &bad);
        let _ = classifier.classify(25.0, &bad);
        let _ = classifier.classify(35.0, &bad);
    }
}
