use tracing_subscriber::{
    fmt::{self, layer},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// 初始化日志系统
///
/// 日志写到 stderr，stdout 只留给渲染结果和 JSON 输出。
/// `RUST_LOG` 优先，否则 `verbose` 时为 debug，默认 info。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).init();
}

/// 测试用日志，重复调用不会报错
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            layer()
                .with_test_writer()
                .with_file(true)
                .with_line_number(true)
                .with_target(false),
        )
        .try_init();
}
