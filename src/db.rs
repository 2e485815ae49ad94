// ==========================================
// 设备合规期限跟踪系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 集中建表语句 (CREATE TABLE IF NOT EXISTS,幂等)
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// # 表
/// - tracked_entity: 跟踪对象
/// - obligation_type: 义务类型
/// - obligation: 合规义务
/// - usage_log: 用量记录（仅追加）
/// - config_kv: 配置键值（scope + key → value）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tracked_entity (
            entity_id     TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            tracks_usage  INTEGER NOT NULL DEFAULT 0,
            is_active     INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS obligation_type (
            type_id            TEXT PRIMARY KEY,
            name               TEXT NOT NULL,
            measure_by         TEXT NOT NULL,
            requires_document  INTEGER NOT NULL DEFAULT 0,
            is_active          INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS obligation (
            obligation_id        TEXT PRIMARY KEY,
            entity_id            TEXT NOT NULL REFERENCES tracked_entity(entity_id),
            type_id              TEXT NOT NULL REFERENCES obligation_type(type_id),
            last_done_date       TEXT,
            next_due_date        TEXT,
            last_done_usage      REAL,
            frequency            REAL,
            frequency_unit       TEXT,
            rate_mode            TEXT NOT NULL DEFAULT 'manual',
            manual_daily_average REAL,
            created_at           TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at           TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_obligation_entity
          ON obligation(entity_id);

        CREATE TABLE IF NOT EXISTS usage_log (
            log_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            entity_id  TEXT NOT NULL REFERENCES tracked_entity(entity_id),
            value      REAL NOT NULL,
            logged_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_usage_log_entity_time
          ON usage_log(entity_id, logged_at);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id   TEXT NOT NULL,
            key        TEXT NOT NULL,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )
}
