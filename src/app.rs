use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::error::SubmitError;
use crate::render::{self, RenderOptions};
use crate::services::extractor_from_config;
use crate::utils::logging::{log_startup, log_submit_result};
use crate::workflow::{SubmitFlow, SubmitOutcome};

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 终端渲染
    #[default]
    Rendered,
    /// 题目列表的 JSON
    Json,
}

/// 应用主结构
pub struct App {
    flow: SubmitFlow,
    render_options: RenderOptions,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let extractor = extractor_from_config(&config).context("无法创建题目提取器")?;
        let render_options = RenderOptions {
            color: config.color && render::supports_color(),
            show_placeholder: extractor.shows_placeholder(),
        };

        Ok(Self {
            flow: SubmitFlow::new(extractor),
            render_options,
        })
    }

    /// 运行一次"选图 → 提交 → 渲染"
    ///
    /// # 返回
    /// 返回写到 stdout 的文本，以及提交结果
    pub async fn run(
        &self,
        image_path: Option<&Path>,
        format: OutputFormat,
    ) -> Result<(String, Result<SubmitOutcome, SubmitError>)> {
        if let Some(path) = image_path {
            info!("📁 正在读取图片: {}", path.display());
            if let Err(e) = self.flow.select_file(path).await {
                let output = render::render_error(&e, &self.render_options);
                return Ok((output, Err(e)));
            }
        }

        let result = self.flow.submit().await;
        log_submit_result(&result);

        let output = match (&result, format) {
            (Err(e), _) => render::render_error(e, &self.render_options),
            (Ok(_), OutputFormat::Json) => {
                let mut json = serde_json::to_string_pretty(&self.flow.questions())
                    .context("无法序列化题目列表")?;
                json.push('\n');
                json
            }
            (Ok(_), OutputFormat::Rendered) => {
                let mut text = render::render_header(&self.render_options);
                text.push('\n');
                text.push_str(&render::render_questions(
                    &self.flow.questions(),
                    &self.render_options,
                ));
                text
            }
        };

        Ok((output, result))
    }
}
