//! # Question Extract
//!
//! 从试卷图片中提取选择题的 Rust 应用程序（Ayotto）
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有图片字节，只暴露读取 / 编码能力
//! - `ImageFile` - 异步读取、MIME 推断、base64
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - 每个客户端只负责一次 HTTP 调用
//! - `RelayClient` - multipart 上传到 `/generate`
//! - `GeminiClient` - 调用 `generateContent`
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `QuestionExtractor` - 一张图片 → 题目列表（中转 / 直连两种实现）
//! - `response_parser` - 取候选文本、去代码围栏、解析 JSON
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一次提交"的完整流程
//! - `FormState` - 选中的图片、题目列表、阶段
//! - `SubmitFlow` - 置忙 → 提取 → 丢弃过期结果 → 写回
//!
//! ### ⑤ 展示层（Render）
//! - `render/` - 把题目列表或错误渲染成终端文本
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod render;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, OutputFormat};
pub use config::{Config, ExtractMode};
pub use error::{AppError, AppResult, SubmitError};
pub use infrastructure::ImageFile;
pub use models::{AnswerOption, Question};
pub use services::{GeminiExtractor, QuestionExtractor, RelayExtractor};
pub use workflow::{FormPhase, SubmitFlow, SubmitOutcome};
