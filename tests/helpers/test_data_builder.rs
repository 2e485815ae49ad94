// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use compliance_deadline_engine::domain::entity::{TrackedEntity, UsageLog};
use compliance_deadline_engine::domain::obligation::{Obligation, ObligationType};
use compliance_deadline_engine::domain::types::{MeasureBy, RateMode};

// ==========================================
// TrackedEntity 构建器
// ==========================================

pub struct EntityBuilder {
    entity_id: String,
    name: String,
    tracks_usage: bool,
    is_active: bool,
}

impl EntityBuilder {
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            name: format!("对象 {}", entity_id),
            tracks_usage: false,
            is_active: true,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn tracks_usage(mut self, tracks: bool) -> Self {
        self.tracks_usage = tracks;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn build(self) -> TrackedEntity {
        let mut entity = TrackedEntity::new(self.entity_id, self.name, self.tracks_usage);
        entity.is_active = self.is_active;
        entity
    }
}

// ==========================================
// ObligationType 构建器
// ==========================================

pub struct TypeBuilder {
    type_id: String,
    name: String,
    measure_by: MeasureBy,
    is_active: bool,
}

impl TypeBuilder {
    pub fn date(type_id: &str) -> Self {
        Self {
            type_id: type_id.to_string(),
            name: format!("类型 {}", type_id),
            measure_by: MeasureBy::Date,
            is_active: true,
        }
    }

    pub fn usage(type_id: &str) -> Self {
        Self {
            type_id: type_id.to_string(),
            name: format!("类型 {}", type_id),
            measure_by: MeasureBy::Usage,
            is_active: true,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn build(self) -> ObligationType {
        let mut t = ObligationType::new(self.type_id, self.name, self.measure_by);
        t.is_active = self.is_active;
        t
    }
}

// ==========================================
// Obligation 构建器
// ==========================================

pub struct ObligationBuilder {
    obligation_id: String,
    entity_id: String,
    type_id: String,
    last_done_date: Option<NaiveDate>,
    next_due_date: Option<NaiveDate>,
    last_done_usage: Option<f64>,
    frequency: Option<f64>,
    frequency_unit: Option<String>,
    rate_mode: RateMode,
    manual_daily_average: Option<f64>,
}

impl ObligationBuilder {
    pub fn new(obligation_id: &str, entity_id: &str, type_id: &str) -> Self {
        Self {
            obligation_id: obligation_id.to_string(),
            entity_id: entity_id.to_string(),
            type_id: type_id.to_string(),
            last_done_date: None,
            next_due_date: None,
            last_done_usage: None,
            frequency: None,
            frequency_unit: None,
            rate_mode: RateMode::Manual,
            manual_daily_average: None,
        }
    }

    pub fn next_due_date(mut self, date: NaiveDate) -> Self {
        self.next_due_date = Some(date);
        self
    }

    pub fn last_done_date(mut self, date: NaiveDate) -> Self {
        self.last_done_date = Some(date);
        self
    }

    pub fn last_done_usage(mut self, value: f64) -> Self {
        self.last_done_usage = Some(value);
        self
    }

    pub fn frequency(mut self, value: f64) -> Self {
        self.frequency = Some(value);
        self
    }

    pub fn frequency_unit(mut self, unit: &str) -> Self {
        self.frequency_unit = Some(unit.to_string());
        self
    }

    pub fn rate_mode(mut self, mode: RateMode) -> Self {
        self.rate_mode = mode;
        self
    }

    pub fn manual_daily_average(mut self, value: f64) -> Self {
        self.manual_daily_average = Some(value);
        self
    }

    pub fn build(self) -> Obligation {
        let mut ob = Obligation::new(self.obligation_id, self.entity_id, self.type_id);
        ob.last_done_date = self.last_done_date;
        ob.next_due_date = self.next_due_date;
        ob.last_done_usage = self.last_done_usage;
        ob.frequency = self.frequency;
        ob.frequency_unit = self.frequency_unit;
        ob.rate_mode = self.rate_mode;
        ob.manual_daily_average = self.manual_daily_average;
        ob
    }
}

// ==========================================
// UsageLog 辅助
// ==========================================

pub fn usage_log(entity_id: &str, value: f64, logged_at: NaiveDateTime) -> UsageLog {
    UsageLog::new(entity_id.to_string(), value, logged_at)
}

pub fn at_midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}
