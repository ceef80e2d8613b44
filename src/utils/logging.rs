/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::{info, warn};

use crate::config::Config;
use crate::error::SubmitError;
use crate::workflow::SubmitOutcome;

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前生效的配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📡 提取模式: {}", config.mode);
    match config.mode {
        crate::config::ExtractMode::Relay => info!("🔗 后端地址: {}", config.relay_endpoint),
        crate::config::ExtractMode::Direct => info!(
            "🤖 模型: {} @ {}",
            config.gemini_model_name, config.gemini_api_base_url
        ),
    }
    info!("{}", "=".repeat(60));
}

/// 记录一次提交的结果
pub fn log_submit_result(result: &Result<SubmitOutcome, SubmitError>) {
    match result {
        Ok(outcome) => info!(
            "✅ 提交 #{} 完成: 提取到 {} 道题目",
            outcome.generation, outcome.question_count
        ),
        Err(SubmitError::Superseded { generation, latest }) => {
            info!("⏭️ 提交 #{} 被 #{} 取代，结果已丢弃", generation, latest)
        }
        Err(e) => warn!("❌ 提交失败: {}", e),
    }
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
