/// Gemini API 客户端
///
/// 只负责一次 `generateContent` 调用，不关心 prompt 和响应内容
use tracing::debug;

use crate::config::Config;
use crate::error::SubmitError;
use crate::models::{GeminiRequest, GeminiResponse};

/// Gemini API 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    ///
    /// API Key 必须由配置显式提供，没有占位默认值
    pub fn new(config: &Config) -> Result<Self, SubmitError> {
        let api_key = config
            .gemini_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(SubmitError::MissingApiKey)?;

        Ok(Self {
            http: super::build_http_client(config.request_timeout_secs)?,
            api_key,
            api_base_url: config.gemini_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.gemini_model_name.clone(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 不带 key 的接口地址，用于日志和错误信息
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model_name
        )
    }

    /// 调用 generateContent
    pub async fn generate_content(
        &self,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse, SubmitError> {
        let endpoint = self.endpoint();
        debug!("调用 Gemini API，模型: {}", self.model_name);

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| SubmitError::transport(&endpoint, e.without_url()))?;

        let body = super::read_success_body(&endpoint, response).await?;

        debug!("Gemini API 调用成功，响应长度: {} 字符", body.len());

        serde_json::from_str(&body).map_err(|e| SubmitError::malformed_json(e, &body))
    }
}
