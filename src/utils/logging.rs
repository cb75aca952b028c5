/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::services::facet_index::FacetIndex;
use crate::services::result_presenter::DisplayRecord;
use tracing::{info, warn};

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 题库筛选与导出");
    info!("📂 数据来源: {}", config.dataset_source);
    info!("{}", "=".repeat(60));
}

/// 记录数据集和分面索引概况
pub fn log_dataset_loaded(total: usize, index: &FacetIndex) {
    info!("✓ 共 {} 道题", total);
    info!(
        "📋 年份 {} 个, 科目 {} 个, 考试 {} 个",
        index.years().len(),
        index.subjects().len(),
        index.exams().len()
    );
}

/// 预览前若干条结果
///
/// # 参数
/// - `records`: 展示数据
/// - `limit`: 最多输出条数
pub fn log_results_preview(records: &[DisplayRecord], limit: usize) {
    if records.is_empty() {
        warn!("⚠️ No questions found.");
        return;
    }

    info!("\n{}", "─".repeat(60));
    info!("🔎 匹配 {} 道题", records.len());
    for (i, record) in records.iter().take(limit).enumerate() {
        let marked: Vec<&str> = record.highlights().collect();
        info!("{}. {}", i + 1, record.heading);
        info!("   {}", truncate_text(&record.plain_text(), 80));
        info!("   {}", record.breadcrumb);
        if !marked.is_empty() {
            info!("   高亮: {}", marked.join(" | "));
        }
    }
    if records.len() > limit {
        info!("... 其余 {} 道题省略", records.len() - limit);
    }
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `matched`: 匹配题数
/// - `total`: 题库总数
/// - `export_path`: 导出文件路径
/// - `bytes`: 导出文件大小
pub fn print_final_stats(matched: usize, total: usize, export_path: &str, bytes: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 匹配: {}/{}", matched, total);
    info!("📄 导出文件: {} ({} 字节)", export_path, bytes);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
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
