// ==========================================
// 设备合规期限跟踪系统 - 预警阈值策略
// ==========================================
// 依据: Deadline_Engine_Specs_v0.2.md - 1. Threshold Policy
// 红线: 不变式 yellow ≥ orange ≥ red ≥ 0 在写入时校验,
//       引擎读取时不再校验 (违例策略产出尽力而为的分级)
// ==========================================

use serde::{Deserialize, Serialize};

/// 阈值天数上限 (约10年)
pub const MAX_THRESHOLD_DAYS: i64 = 3650;

/// 默认阈值: 黄60天 / 橙30天 / 红15天
pub const DEFAULT_YELLOW_DAYS: i64 = 60;
pub const DEFAULT_ORANGE_DAYS: i64 = 30;
pub const DEFAULT_RED_DAYS: i64 = 15;

// ==========================================
// ThresholdPolicy - 预警阈值策略
// ==========================================
// 租户级配置,未持久化时使用默认值 {60, 30, 15}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub yellow_days: i64, // 黄色预警线 (天)
    pub orange_days: i64, // 橙色预警线 (天)
    pub red_days: i64,    // 红色预警线 (天)
}

impl ThresholdPolicy {
    /// 创建阈值策略 (不校验,校验在写入路径)
    pub fn new(yellow_days: i64, orange_days: i64, red_days: i64) -> Self {
        Self {
            yellow_days,
            orange_days,
            red_days,
        }
    }

    /// 写入时校验: yellow ≥ orange ≥ red ≥ 0,且全部 ≤ 上限
    ///
    /// # 返回
    /// - Ok(()): 合法
    /// - Err(String): 违反不变式的原因
    pub fn validate(&self) -> Result<(), String> {
        if self.red_days < 0 {
            return Err(format!("red_days 不能为负: {}", self.red_days));
        }
        if self.orange_days < self.red_days {
            return Err(format!(
                "阈值顺序违例: orange_days={} < red_days={}",
                self.orange_days, self.red_days
            ));
        }
        if self.yellow_days < self.orange_days {
            return Err(format!(
                "阈值顺序违例: yellow_days={} < orange_days={}",
                self.yellow_days, self.orange_days
            ));
        }
        if self.yellow_days > MAX_THRESHOLD_DAYS {
            return Err(format!(
                "yellow_days 超过上限 {}: {}",
                MAX_THRESHOLD_DAYS, self.yellow_days
            ));
        }
        Ok(())
    }
}

impl Default for ThresholdPolicy {
    /// 默认策略 {60, 30, 15}
    fn default() -> Self {
        Self {
            yellow_days: DEFAULT_YELLOW_DAYS,
            orange_days: DEFAULT_ORANGE_DAYS,
            red_days: DEFAULT_RED_DAYS,
        }
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = ThresholdPolicy::default();

        assert_eq!(policy.yellow_days, 60);
        assert_eq!(policy.orange_days, 30);
        assert_eq!(policy.red_days, 15);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_validate_order_violation() {
        // orange < red → 拒绝
        let policy = ThresholdPolicy::new(60, 10, 15);
        assert!(policy.validate().is_err());

        // yellow < orange → 拒绝
        let policy = ThresholdPolicy::new(20, 30, 15);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_validate_negative() {
        let policy = ThresholdPolicy::new(60, 30, -1);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_validate_cap() {
        let policy = ThresholdPolicy::new(MAX_THRESHOLD_DAYS + 1, 30, 15);
        assert!(policy.validate().is_err());

        // 上限本身合法
        let policy = ThresholdPolicy::new(MAX_THRESHOLD_DAYS, 30, 15);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_validate_equal_thresholds() {
        // 相等合法 (≥ 语义)
        let policy = ThresholdPolicy::new(30, 30, 30);
        assert!(policy.validate().is_ok());

        // red = 0 合法 ("过期→红"规则不依赖 red_days)
        let policy = ThresholdPolicy::new(60, 30, 0);
        assert!(policy.validate().is_ok());
    }
}
