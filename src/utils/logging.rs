//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数
use crate::config::Config;
use crate::orchestrator::RunSummary;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 日志写到 stderr，stdout 只留给报告。`RUST_LOG` 优先于 `verbose`。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 题库记录检查");
    info!("📊 期望选项数: {}", config.expected_choice_count);
    info!("❓ 疑问后缀: {}", config.question_suffixes.join(" "));
    info!("{}", "=".repeat(60));
}

/// 记录数据源数量
pub fn log_sources_found(total: usize) {
    info!("✓ 找到 {} 个待检查的数据源", total);
}

/// 记录单个数据源开始
pub fn log_source_start(index: usize, total: usize, path: &Path) {
    info!("📦 [{}/{}] {}", index, total, path.display());
}

/// 打印最终统计信息
///
/// # 参数
/// - `summary`: 运行统计
/// - `warn_file`: 警告文件路径（如有）
pub fn print_final_stats(summary: &RunSummary, warn_file: Option<&str>) {
    info!("{}", "=".repeat(60));
    info!("📊 检查完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 数据源: {}  记录: {}", summary.sources, summary.records);
    info!("❌ 结构违规: {}", summary.violations);
    if summary.has_failures() {
        info!("❌ 无法解析: {} 个数据源", summary.failed_sources);
    }
    if summary.integrity_issues > 0 {
        info!("⚠️ 一致性问题: {} 个数据源", summary.integrity_issues);
    }
    if let Some(path) = warn_file {
        info!("警告已保存至: {}", path);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("이것은 무엇인가", 3), "이것은...");
        assert_eq!(truncate_text("짧다", 10), "짧다");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
