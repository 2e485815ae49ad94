// ==========================================
// 设备合规期限跟踪系统 - 状态看板 API
// ==========================================
// 职责: 聚合仓储快照,驱动引擎层,产出看板/列表视图数据
// 架构: API 层 → Repository 层 (快照) → Engine 层 (纯计算)
// 红线: 引擎不做 I/O;快照在本层一次取齐后交给引擎
// 红线: 两级排序 — 对象内按最近到期归并,对象列表按等级+日期排序
// 红线: "今天"由调用方传入,同一次看板计算共用同一评估日期
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::{debug, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::entity::UsageLog;
use crate::domain::obligation::{EntityStatusSummary, Obligation, ObligationType, StatusResult};
use crate::domain::threshold::ThresholdPolicy;
use crate::domain::types::{MeasureBy, RateSource};
use crate::engine::{NearestObligationReducer, StatusCalculator, UsageRateEstimator};
use crate::repository::{ObligationRepository, TrackedEntityRepository, UsageLogRepository};

// ==========================================
// StatusApi - 状态看板 API
// ==========================================
pub struct StatusApi {
    entity_repo: Arc<TrackedEntityRepository>,
    obligation_repo: Arc<ObligationRepository>,
    usage_log_repo: Arc<UsageLogRepository>,
    config: Arc<ConfigManager>,
    calculator: StatusCalculator,
    reducer: NearestObligationReducer,
}

impl StatusApi {
    /// 创建新的 StatusApi 实例
    pub fn new(
        entity_repo: Arc<TrackedEntityRepository>,
        obligation_repo: Arc<ObligationRepository>,
        usage_log_repo: Arc<UsageLogRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            entity_repo,
            obligation_repo,
            usage_log_repo,
            config,
            calculator: StatusCalculator::new(),
            reducer: NearestObligationReducer::new(),
        }
    }

    // ==========================================
    // 看板接口
    // ==========================================

    /// 状态看板: 每个启用对象一条摘要,按"等级优先、日期次之"排序
    ///
    /// # 参数
    /// - `today`: 评估日期 (整次计算共用,避免跨午夜偏差)
    #[instrument(skip(self))]
    pub fn get_status_board(&self, today: NaiveDate) -> ApiResult<Vec<EntityStatusSummary>> {
        let entities = self.entity_repo.list_active()?;
        let type_map = self.obligation_repo.load_type_map()?;
        let policy = self
            .config
            .get_threshold_policy()
            .map_err(|e| ApiError::InternalError(format!("阈值策略读取失败: {}", e)))?;
        let estimator = self.build_estimator()?;

        let mut summaries = Vec::with_capacity(entities.len());
        for entity in entities {
            let obligations = self.obligation_repo.list_by_entity(&entity.entity_id)?;
            let statuses = self.compute_statuses(
                &entity.entity_id,
                &obligations,
                &type_map,
                &policy,
                &estimator,
                today,
            )?;

            let headline = self.reducer.reduce(&statuses);
            summaries.push(EntityStatusSummary {
                entity_id: entity.entity_id,
                entity_name: entity.name,
                obligation_count: statuses.len(),
                headline,
            });
        }

        // 外层排序: 等级优先,同等级按到期日
        self.reducer.sort_by_tier_then_date(&mut summaries);

        debug!(count = summaries.len(), "状态看板计算完成");
        Ok(summaries)
    }

    /// 单对象的全部义务状态 (详情视图)
    #[instrument(skip(self))]
    pub fn list_obligation_statuses(
        &self,
        entity_id: &str,
        today: NaiveDate,
    ) -> ApiResult<Vec<StatusResult>> {
        if entity_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("对象ID不能为空".to_string()));
        }

        if self.entity_repo.find_by_id(entity_id)?.is_none() {
            return Err(ApiError::NotFound(format!("TrackedEntity(id={})不存在", entity_id)));
        }

        let obligations = self.obligation_repo.list_by_entity(entity_id)?;
        let type_map = self.obligation_repo.load_type_map()?;
        let policy = self
            .config
            .get_threshold_policy()
            .map_err(|e| ApiError::InternalError(format!("阈值策略读取失败: {}", e)))?;
        let estimator = self.build_estimator()?;

        self.compute_statuses(entity_id, &obligations, &type_map, &policy, &estimator, today)
    }

    // ==========================================
    // 内部编排
    // ==========================================

    /// 按配置窗口构造估算引擎
    fn build_estimator(&self) -> ApiResult<UsageRateEstimator> {
        let window_days = self
            .config
            .get_usage_rate_window_days()
            .map_err(|e| ApiError::InternalError(format!("估算窗口读取失败: {}", e)))?;
        Ok(UsageRateEstimator::with_window_days(window_days))
    }

    /// 计算一个对象的全部义务状态
    ///
    /// - 停用类型的义务不参与计算
    /// - 类型缺失的义务保留,产出 NONE/"No type" (数据问题要可见)
    /// - usage 义务按手动/自动回退链解析有效日均用量
    fn compute_statuses(
        &self,
        entity_id: &str,
        obligations: &[Obligation],
        type_map: &HashMap<String, ObligationType>,
        policy: &ThresholdPolicy,
        estimator: &UsageRateEstimator,
        today: NaiveDate,
    ) -> ApiResult<Vec<StatusResult>> {
        // 用量快照按对象取一次,对象内所有 usage 义务复用
        let latest_log = self.usage_log_repo.find_latest(entity_id)?;
        let window_logs = self.load_window_logs(entity_id, estimator, today)?;
        let evaluated_at = Self::evaluated_at(today);

        let mut statuses = Vec::with_capacity(obligations.len());
        for obligation in obligations {
            let obligation_type = type_map.get(&obligation.type_id);

            // 停用类型不参与状态计算
            if let Some(t) = obligation_type {
                if !t.is_active {
                    continue;
                }
            }

            // 仅 usage 义务需要日均用量
            let effective_rate = match obligation_type.map(|t| t.measure_by) {
                Some(MeasureBy::Usage) => estimator.resolve_effective_rate(
                    obligation.rate_mode,
                    obligation.manual_daily_average,
                    &window_logs,
                    evaluated_at,
                ),
                _ => RateSource::None,
            };

            statuses.push(self.calculator.calculate(
                obligation,
                obligation_type,
                latest_log.as_ref(),
                &effective_rate,
                policy,
                today,
            ));
        }

        Ok(statuses)
    }

    /// 取估算窗口内的用量记录 (按时间升序)
    fn load_window_logs(
        &self,
        entity_id: &str,
        estimator: &UsageRateEstimator,
        today: NaiveDate,
    ) -> ApiResult<Vec<UsageLog>> {
        let to = Self::evaluated_at(today);
        let from = to - Duration::days(estimator.window_days());
        Ok(self.usage_log_repo.find_window(entity_id, from, to)?)
    }

    /// 评估时刻 = 评估日期的当日末尾 (当天的读数计入窗口)
    fn evaluated_at(today: NaiveDate) -> chrono::NaiveDateTime {
        today.and_hms_opt(23, 59, 59).unwrap_or_else(|| {
            // and_hms_opt(23,59,59) 对任意日期均有效;兜底到午夜
            today.and_time(chrono::NaiveTime::MIN)
        })
    }
}
