/// 中转后端客户端
///
/// 把图片以 multipart 形式上传到后端的 `/generate` 接口
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::config::Config;
use crate::error::SubmitError;
use crate::infrastructure::ImageFile;
use crate::models::RelayResponse;

/// multipart 中图片字段的名字
pub const IMAGE_FIELD: &str = "image";

/// 中转后端客户端
pub struct RelayClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    /// 创建新的中转客户端
    pub fn new(config: &Config) -> Result<Self, SubmitError> {
        Ok(Self {
            http: super::build_http_client(config.request_timeout_secs)?,
            endpoint: config.relay_endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 上传图片
    ///
    /// # 参数
    /// - `image`: 选中的图片
    ///
    /// # 返回
    /// 返回后端的原始响应，`success` 由调用方判断
    pub async fn upload(&self, image: &ImageFile) -> Result<RelayResponse, SubmitError> {
        debug!(
            "上传图片到 {}: {} ({} 字节)",
            self.endpoint,
            image.file_name(),
            image.len()
        );

        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())
            .map_err(|e| SubmitError::transport(&self.endpoint, e))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::transport(&self.endpoint, e))?;

        let body = super::read_success_body(&self.endpoint, response).await?;

        serde_json::from_str(&body).map_err(|e| SubmitError::malformed_json(e, &body))
    }
}
