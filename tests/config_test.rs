// ==========================================
// 配置层集成测试
// ==========================================
// 测试目标: config_kv 持久化 + 写入路径校验 + 默认值语义
// ==========================================

use compliance_deadline_engine::api::{ApiError, ConfigApi};
use compliance_deadline_engine::config::ConfigManager;
use compliance_deadline_engine::db::{init_schema, open_sqlite_connection};
use compliance_deadline_engine::domain::threshold::ThresholdPolicy;
use std::sync::Arc;
use tempfile::TempDir;

// ==========================================
// 测试辅助函数
// ==========================================

fn setup_config() -> (TempDir, Arc<ConfigManager>) {
    let dir = TempDir::new().expect("创建临时目录失败");
    let db_path = dir.path().join("test.db");

    // 先建 schema,再交给 ConfigManager
    let conn = open_sqlite_connection(db_path.to_str().unwrap()).unwrap();
    init_schema(&conn).unwrap();
    drop(conn);

    let manager = ConfigManager::new(db_path.to_str().unwrap()).unwrap();
    (dir, Arc::new(manager))
}

// ==========================================
// 测试用例 1: 默认值与持久化
// ==========================================

#[test]
fn test_threshold_defaults_then_persist() {
    let (_dir, manager) = setup_config();

    // 未持久化 → 文档化默认值
    let policy = manager.get_threshold_policy().unwrap();
    assert_eq!(policy, ThresholdPolicy::new(60, 30, 15));

    // 写入后读回
    manager.set_threshold_policy(&ThresholdPolicy::new(90, 45, 20)).unwrap();
    let policy = manager.get_threshold_policy().unwrap();
    assert_eq!(policy, ThresholdPolicy::new(90, 45, 20));
}

#[test]
fn test_threshold_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let path_str = db_path.to_str().unwrap().to_string();

    {
        let conn = open_sqlite_connection(&path_str).unwrap();
        init_schema(&conn).unwrap();
        let manager = ConfigManager::new(&path_str).unwrap();
        manager.set_threshold_policy(&ThresholdPolicy::new(90, 45, 20)).unwrap();
    }

    // 新实例读到同一配置
    let manager = ConfigManager::new(&path_str).unwrap();
    assert_eq!(
        manager.get_threshold_policy().unwrap(),
        ThresholdPolicy::new(90, 45, 20)
    );
}

// ==========================================
// 测试用例 2: 写入路径校验
// ==========================================

#[test]
fn test_config_api_rejects_invalid_policy() {
    let (_dir, manager) = setup_config();
    let api = ConfigApi::new(manager.clone());

    // yellow < orange → ValidationError
    let err = api
        .update_threshold_policy(ThresholdPolicy::new(20, 30, 15))
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    // 负值 → ValidationError
    let err = api
        .update_threshold_policy(ThresholdPolicy::new(60, 30, -5))
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    // 超上限 → ValidationError
    let err = api
        .update_threshold_policy(ThresholdPolicy::new(4000, 30, 15))
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    // 被拒绝的写入不影响读路径
    assert_eq!(
        api.get_threshold_policy().unwrap(),
        ThresholdPolicy::default()
    );
}

// ==========================================
// 测试用例 3: 估算窗口配置
// ==========================================

#[test]
fn test_window_days_config() {
    let (_dir, manager) = setup_config();
    let api = ConfigApi::new(manager);

    // 默认 30 天
    assert_eq!(api.get_usage_rate_window_days().unwrap(), 30);

    api.update_usage_rate_window_days(60).unwrap();
    assert_eq!(api.get_usage_rate_window_days().unwrap(), 60);

    // 窗口跨度不足 2 天无法产出日均 → 拒绝
    let err = api.update_usage_rate_window_days(1).unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
}
