//! 日志初始化
//!
//! - 未配置目录：输出到 stderr，stdout 留给行情快照
//! - 配置目录：按天滚动写入 `chartfeed.log`

use chartfeed_core::config::LogConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化全局日志，返回的 guard 必须存活到进程结束以保证日志落盘。
pub fn init_logging(config: &LogConfig) -> WorkerGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let to_file = config.dir.is_some();
    let (writer, guard) = match &config.dir {
        Some(dir) => tracing_appender::non_blocking(tracing_appender::rolling::daily(
            dir,
            "chartfeed.log",
        )),
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(!to_file)
                .with_writer(writer),
        )
        .init();

    guard
}
