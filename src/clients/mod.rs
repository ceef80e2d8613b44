pub mod gemini_client;
pub mod relay_client;

pub use gemini_client::GeminiClient;
pub use relay_client::RelayClient;

use std::time::Duration;

use crate::error::SubmitError;

/// 构建共享的 HTTP 客户端，`timeout_secs` 为空时不设超时
pub(crate) fn build_http_client(timeout_secs: Option<u64>) -> Result<reqwest::Client, SubmitError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(SubmitError::ClientBuild)
}

/// 读取响应体，非 2xx 时返回 `BadStatus`
pub(crate) async fn read_success_body(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<String, SubmitError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SubmitError::transport(endpoint, e))?;

    if !status.is_success() {
        return Err(SubmitError::BadStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body: crate::utils::truncate_text(&body, 500),
        });
    }

    Ok(body)
}
