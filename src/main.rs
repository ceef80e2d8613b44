use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use question_extract::app::{App, OutputFormat};
use question_extract::config::{Config, ExtractMode};
use question_extract::logger;

#[derive(Parser)]
#[command(name = "question_extract")]
#[command(about = "Extract multiple-choice questions from an exam page image")]
#[command(version)]
struct Cli {
    /// 要提取题目的图片
    image: Option<PathBuf>,

    /// 提取模式，覆盖配置
    #[arg(short, long, value_enum)]
    mode: Option<ExtractMode>,

    /// TOML 配置文件，环境变量优先级更高
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 以 JSON 输出题目列表
    #[arg(long)]
    json: bool,

    /// 关闭彩色输出
    #[arg(long)]
    no_color: bool,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?.with_env_overrides(),
        None => Config::from_env(),
    };
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if cli.no_color {
        config.color = false;
    }
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logger::init(config.verbose_logging);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Rendered
    };

    // 初始化并运行应用
    let app = App::initialize(config)?;
    let (output, result) = app.run(cli.image.as_deref(), format).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
