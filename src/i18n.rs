// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 引擎输出的规范标签为英文,界面展示经本模块翻译
// ==========================================

use crate::domain::types::{StatusLabel, Tier};

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 状态标签的本地化文本
pub fn label_text(label: StatusLabel) -> String {
    t(label.i18n_key())
}

/// 状态等级的本地化文本
pub fn tier_text(tier: Tier) -> String {
    match tier {
        Tier::Red => t("tier.red"),
        Tier::Orange => t("tier.orange"),
        Tier::Yellow => t("tier.yellow"),
        Tier::Green => t("tier.green"),
        Tier::None => t("tier.none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_label_text_zh() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");

        assert_eq!(label_text(StatusLabel::Expired), "已过期");
        assert_eq!(label_text(StatusLabel::Incomplete), "信息不足");
    }

    #[test]
    fn test_label_text_en() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");

        assert_eq!(label_text(StatusLabel::Expired), "Expired");
        assert_eq!(label_text(StatusLabel::DueSoon), "Due soon");

        set_locale("zh-CN");
    }

    #[test]
    fn test_tier_text() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");

        assert_eq!(tier_text(Tier::Red), "红");
        assert_eq!(tier_text(Tier::None), "无信息");
    }
}
