//! 图片文件 - 基础设施层
//!
//! 持有用户选中的图片字节，只暴露"读取 / 编码"的能力

use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use phf::phf_map;
use tracing::{debug, warn};

use crate::error::SubmitError;

/// 扩展名到 MIME 类型的映射
static MIME_TYPES: phf::Map<&'static str, &'static str> = phf_map! {
    "png" => "image/png",
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "bmp" => "image/bmp",
    "heic" => "image/heic",
    "heif" => "image/heif",
    "svg" => "image/svg+xml",
    "tif" => "image/tiff",
    "tiff" => "image/tiff",
};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// 选中的图片
///
/// 职责：
/// - 持有图片的原始字节
/// - 提供文件名和 MIME 类型
/// - 提供 base64 编码
/// - 不校验图片类型和大小
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    /// 异步读取图片文件
    ///
    /// # 参数
    /// - `path`: 图片路径
    ///
    /// # 返回
    /// 读取失败时返回 `SubmitError::ImageRead`
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SubmitError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| SubmitError::ImageRead {
                path: path.display().to_string(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());

        let image = Self::from_bytes(file_name, bytes);
        if image.is_empty() {
            warn!("⚠️ 图片文件为空: {}", path.display());
        }
        debug!(
            "已读取图片 {} ({} 字节, {})",
            image.file_name,
            image.len(),
            image.mime_type
        );

        Ok(image)
    }

    /// 从内存中的字节构造，MIME 类型由文件名推断
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_type_for(Path::new(&file_name)).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 标准 base64 编码（不带 data URL 前缀）
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// 根据扩展名推断 MIME 类型，未知扩展名返回 `application/octet-stream`
pub fn mime_type_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| MIME_TYPES.get(ext.to_ascii_lowercase().as_str()).copied())
        .unwrap_or(FALLBACK_MIME_TYPE)
}
