// ==========================================
// 设备合规期限跟踪系统 - 配置 API
// ==========================================
// 职责: 阈值策略/估算窗口的查询与更新
// 红线: 阈值不变式在写入路径校验;违例请求以 ValidationError 拒绝
// ==========================================

use std::sync::Arc;

use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::threshold::ThresholdPolicy;

// ==========================================
// ConfigApi - 配置 API
// ==========================================
pub struct ConfigApi {
    config: Arc<ConfigManager>,
}

impl ConfigApi {
    /// 创建新的 ConfigApi 实例
    pub fn new(config: Arc<ConfigManager>) -> Self {
        Self { config }
    }

    /// 查询阈值策略 (未持久化时返回默认值 {60, 30, 15})
    pub fn get_threshold_policy(&self) -> ApiResult<ThresholdPolicy> {
        self.config
            .get_threshold_policy()
            .map_err(|e| ApiError::InternalError(format!("阈值策略读取失败: {}", e)))
    }

    /// 更新阈值策略
    ///
    /// # 校验
    /// yellow ≥ orange ≥ red ≥ 0,且 ≤ 3650
    #[instrument(skip(self))]
    pub fn update_threshold_policy(&self, policy: ThresholdPolicy) -> ApiResult<()> {
        // 在 API 边界先行校验,错误归类为 ValidationError
        policy
            .validate()
            .map_err(ApiError::ValidationError)?;

        self.config
            .set_threshold_policy(&policy)
            .map_err(|e| ApiError::InternalError(format!("阈值策略写入失败: {}", e)))?;

        info!(
            yellow = policy.yellow_days,
            orange = policy.orange_days,
            red = policy.red_days,
            "阈值策略已更新"
        );
        Ok(())
    }

    /// 查询日均用量估算窗口 (天)
    pub fn get_usage_rate_window_days(&self) -> ApiResult<i64> {
        self.config
            .get_usage_rate_window_days()
            .map_err(|e| ApiError::InternalError(format!("估算窗口读取失败: {}", e)))
    }

    /// 更新估算窗口
    #[instrument(skip(self))]
    pub fn update_usage_rate_window_days(&self, days: i64) -> ApiResult<()> {
        self.config
            .set_usage_rate_window_days(days)
            .map_err(|e| ApiError::ValidationError(e.to_string()))?;

        info!(days, "估算窗口已更新");
        Ok(())
    }
}
