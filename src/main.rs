// ==========================================
// 设备合规期限跟踪系统 - 主入口
// ==========================================
// 轻量看板工具,不启动图形界面
//
// 用法:
//   compliance-deadline-engine [db_path]
//   compliance-deadline-engine [db_path] import <file.csv>...
// ==========================================

use chrono::Local;
use compliance_deadline_engine::app::{get_default_db_path, AppState};
use compliance_deadline_engine::i18n;
use compliance_deadline_engine::importer::UsageLogImporter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志系统
    compliance_deadline_engine::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", compliance_deadline_engine::APP_NAME);
    tracing::info!("系统版本: {}", compliance_deadline_engine::VERSION);
    tracing::info!("==================================================");

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    // 第一个参数若不是子命令,视为数据库路径
    let db_path = if !args.is_empty() && args[0] != "import" {
        args.remove(0)
    } else {
        get_default_db_path()
    };
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(&db_path)?;

    // import 子命令: 批量导入用量 CSV
    if args.first().map(String::as_str) == Some("import") {
        let files: Vec<String> = args.into_iter().skip(1).collect();
        if files.is_empty() {
            return Err("import 需要至少一个 CSV 文件路径".into());
        }

        let results = app_state.usage_importer.batch_import(files).await?;
        for result in &results {
            match result {
                Ok(outcome) => {
                    println!(
                        "{}: 共{}行, 追加{}行, 跳过{}行",
                        outcome.file, outcome.total_rows, outcome.appended, outcome.skipped
                    );
                    for err in &outcome.errors {
                        println!("  - {}", err);
                    }
                }
                Err(e) => println!("导入失败: {}", e),
            }
        }
    }

    // 状态看板: 评估日期取本地日历日
    let today = Local::now().date_naive();
    let board = app_state.status_api.get_status_board(today)?;

    println!();
    println!("=== {} ({}) ===", i18n::t("board.title"), today);
    for summary in &board {
        match &summary.headline {
            Some(status) => {
                let due = status
                    .due_at
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "[{}] {} | {} | {} {} | {}",
                    i18n::tier_text(status.tier),
                    summary.entity_name,
                    status.type_name.as_deref().unwrap_or("-"),
                    i18n::t("board.due_at"),
                    due,
                    i18n::label_text(status.label),
                );
            }
            None => {
                println!(
                    "[{}] {} | {}",
                    i18n::tier_text(compliance_deadline_engine::Tier::None),
                    summary.entity_name,
                    i18n::t("board.no_obligations"),
                );
            }
        }
    }

    Ok(())
}
