// ==========================================
// 设备合规期限跟踪系统 - 最近义务归并引擎
// ==========================================
// 依据: Deadline_Engine_Specs_v0.2.md - 4. Nearest-Obligation Reducer
// 红线: 归并只比较到期日,不比较状态等级
//       (昨天到期的 RED 胜过 20 天后到期的 YELLOW,因为日期更早)
// 红线: 两级排序不可合并 — 对象内按最近到期归并,
//       对象列表再按"等级优先、日期次之"排序
// ==========================================
// 职责: 一个对象的全部有效义务 → 单条代表状态
// 输入: StatusResult 列表 (调用方已过滤停用类型)
// 输出: Option<StatusResult>
// ==========================================

use crate::domain::obligation::{EntityStatusSummary, StatusResult};

// ==========================================
// NearestObligationReducer - 最近义务归并引擎
// ==========================================
pub struct NearestObligationReducer {
    // 无状态引擎,不需要注入依赖
}

impl NearestObligationReducer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 选出代表状态
    ///
    /// # 规则
    /// - 最早的非空 due_at 胜出
    /// - due_at 为空的结果绝不挤掉非空结果
    /// - 全部为空时返回首条 (稳定,保持输入顺序 — NONE 状态无时间信息可比)
    /// - 空输入返回 None ("无代表状态")
    pub fn reduce(&self, statuses: &[StatusResult]) -> Option<StatusResult> {
        let mut best: Option<&StatusResult> = None;

        for candidate in statuses {
            match best {
                None => best = Some(candidate),
                Some(current) => {
                    let replace = match (candidate.due_at, current.due_at) {
                        // 严格更早才替换: 同日期保持先到者 (稳定)
                        (Some(c), Some(b)) => c < b,
                        (Some(_), None) => true,
                        _ => false,
                    };
                    if replace {
                        best = Some(candidate);
                    }
                }
            }
        }

        best.cloned()
    }

    /// 对象列表两级排序: 等级优先 (RED < ORANGE < YELLOW < GREEN < NONE),
    /// 同等级按到期日升序,无到期日排最后
    ///
    /// 稳定排序: 完全同序的对象保持输入顺序
    pub fn sort_by_tier_then_date(&self, summaries: &mut [EntityStatusSummary]) {
        summaries.sort_by(|a, b| {
            a.tier()
                .priority()
                .cmp(&b.tier().priority())
                .then_with(|| match (a.due_at(), b.due_at()) {
                    (Some(da), Some(db)) => da.cmp(&db),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
        });
    }
}

impl Default for NearestObligationReducer {
    fn default() -> Self {
        Self::new()
    }
}
