//! 题目提取服务 - 业务能力层
//!
//! 只负责"从一张图片中提取题目"的能力，不关心表单状态和流程
//!
//! ## 两种实现
//! - `RelayExtractor`: 上传到本地后端，由后端调用模型
//! - `GeminiExtractor`: 直接调用 Gemini API，本地完成清理和解析

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::clients::{GeminiClient, RelayClient};
use crate::config::{Config, ExtractMode};
use crate::error::SubmitError;
use crate::infrastructure::ImageFile;
use crate::models::{GeminiContent, GeminiPart, GeminiRequest, Question};
use crate::services::prompt::EXTRACTION_PROMPT;
use crate::services::response_parser;

/// 题目提取能力
///
/// 职责：
/// - 接收一张图片，返回题目列表
/// - 一次调用只发出一次请求
/// - 不修改任何表单状态
#[async_trait]
pub trait QuestionExtractor: Send + Sync {
    /// 提取器名称（用于日志）
    fn name(&self) -> &'static str;

    /// 列表为空时是否显示占位提示
    fn shows_placeholder(&self) -> bool {
        true
    }

    async fn extract(&self, image: &ImageFile) -> Result<Vec<Question>, SubmitError>;
}

/// 根据配置创建提取器
pub fn extractor_from_config(config: &Config) -> Result<Box<dyn QuestionExtractor>, SubmitError> {
    let extractor: Box<dyn QuestionExtractor> = match config.mode {
        ExtractMode::Relay => Box::new(RelayExtractor::new(config)?),
        ExtractMode::Direct => Box::new(GeminiExtractor::new(config)?),
    };
    debug!("使用提取器: {}", extractor.name());
    Ok(extractor)
}

/// 通过中转后端提取
pub struct RelayExtractor {
    client: RelayClient,
}

impl RelayExtractor {
    pub fn new(config: &Config) -> Result<Self, SubmitError> {
        Ok(Self {
            client: RelayClient::new(config)?,
        })
    }
}

#[async_trait]
impl QuestionExtractor for RelayExtractor {
    fn name(&self) -> &'static str {
        "relay"
    }

    fn shows_placeholder(&self) -> bool {
        false
    }

    async fn extract(&self, image: &ImageFile) -> Result<Vec<Question>, SubmitError> {
        info!("📤 正在上传图片到后端: {}", self.client.endpoint());

        let response = self.client.upload(image).await?;

        if !response.success {
            warn!("⚠️ 后端返回 success = false");
            return Err(SubmitError::RelayRejected);
        }

        Ok(response.questions)
    }
}

/// 直接调用 Gemini 提取
pub struct GeminiExtractor {
    client: GeminiClient,
}

impl GeminiExtractor {
    /// 创建 Gemini 提取器，未配置 API Key 时返回 `MissingApiKey`
    pub fn new(config: &Config) -> Result<Self, SubmitError> {
        Ok(Self {
            client: GeminiClient::new(config)?,
        })
    }

    /// 构建请求：提示词在前，内联图片在后
    pub fn build_request(image: &ImageFile) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::text(EXTRACTION_PROMPT),
                    GeminiPart::inline_data(image.mime_type(), image.to_base64()),
                ],
            }],
        }
    }
}

#[async_trait]
impl QuestionExtractor for GeminiExtractor {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn extract(&self, image: &ImageFile) -> Result<Vec<Question>, SubmitError> {
        info!("🤖 正在调用 {} 提取题目...", self.client.model_name());

        let request = Self::build_request(image);
        let response = self.client.generate_content(&request).await?;

        response_parser::questions_from_response(&response)
    }
}
