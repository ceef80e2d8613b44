use thiserror::Error;

/// 单次提交的错误类型
///
/// 每一次提交失败都是终止性的，不会自动重试。
/// 如何展示给用户由展示层（`render`）决定。
#[derive(Debug, Error)]
pub enum SubmitError {
    /// 未选择图片，不会发出任何请求
    #[error("未选择图片")]
    MissingImage,

    /// 读取图片文件失败
    #[error("读取图片失败 ({path}): {source}")]
    ImageRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 服务端返回非 2xx 状态码
    #[error("服务端返回错误状态 ({endpoint}): {status}, body={body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// 中转后端返回 success = false
    #[error("后端处理图片失败")]
    RelayRejected,

    /// 模型响应中没有候选文本
    #[error("模型返回结果为空")]
    NoCandidate,

    /// 模型输出不是合法的题目 JSON
    #[error("无法解析模型输出的 JSON: {source} (内容: {text})")]
    MalformedJson {
        #[source]
        source: serde_json::Error,
        text: String,
    },

    /// 直连模式下未配置 API Key
    #[error("未配置 GEMINI_API_KEY")]
    MissingApiKey,

    /// 构建 HTTP 客户端失败
    #[error("构建 HTTP 客户端失败: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// 已有更新的提交，本次结果被丢弃
    #[error("提交 #{generation} 已被更新的提交 #{latest} 取代")]
    Superseded { generation: u64, latest: u64 },
}

impl SubmitError {
    /// 创建网络请求失败错误
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        SubmitError::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建 JSON 解析失败错误，原文会被截断后保存
    pub fn malformed_json(source: serde_json::Error, text: &str) -> Self {
        SubmitError::MalformedJson {
            source,
            text: crate::utils::logging::truncate_text(text, 200),
        }
    }
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 文件读写错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败: {0}")]
    Toml(#[from] toml::de::Error),

    /// 提交失败
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl AppError {
    /// 创建文件读取错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
