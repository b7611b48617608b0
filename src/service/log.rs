use tracing::{warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::log::LogConfig;

const DEFAULT_TIME_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";

pub fn init_logger(config: &LogConfig) -> [WorkerGuard; 3] {
    let local_offset = time::UtcOffset::current_local_offset();

    let (time_format, format_err) = match time::format_description::parse_owned::<2>(
        &config.time_format,
    ) {
        Ok(f) => (f, None),
        Err(e) => (
            time::format_description::parse_owned::<2>(DEFAULT_TIME_FORMAT)
                .expect("Invalid default time format"),
            Some(e),
        ),
    };

    let (s, s_guard) = tracing_appender::non_blocking(std::io::stdout());

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(s.with_max_level(config.max_level.as_tracing_level()));

    let file_writer = tracing_appender::rolling::daily("log", "atri_red.log");
    let (f, f_guard) = tracing_appender::non_blocking(file_writer);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(f.with_max_level(Level::INFO));

    let file_error_writer = tracing_appender::rolling::daily("log/error", "atri_red.err");
    let (f_err, f_err_guard) = tracing_appender::non_blocking(file_error_writer);

    let file_error_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(f_err.with_max_level(Level::ERROR));

    let (offset, offset_err) = match local_offset {
        Ok(ofs) => (ofs, None),
        Err(e) => (time::UtcOffset::from_hms(8, 0, 0).unwrap_or(time::UtcOffset::UTC), Some(e)),
    };

    let timer = OffsetTime::new(offset, time_format);
    let (stdout_layer, file_layer, file_error_layer) = (
        stdout_layer.with_timer(timer.clone()),
        file_layer.with_timer(timer.clone()),
        file_error_layer.with_timer(timer),
    );

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .with(file_error_layer)
        .init();

    if let Some(e) = offset_err {
        warn!("初始化日志时间错误: {}, 使用默认时区UTC+8", e);
    }

    if let Some(e) = format_err {
        warn!("日志时间格式({})无效: {}, 使用默认格式", config.time_format, e);
    }

    [s_guard, f_guard, f_err_guard]
}
