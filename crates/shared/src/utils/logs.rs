use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use tracing_appender::{
    non_blocking,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|val| val == "true" || val == "1")
        .unwrap_or(false)
}

/// Wires the tracing registry for one service: a pretty console layer
/// (env-filtered), an optional daily-rolling JSON file layer, and a bridge
/// that forwards events to the OTLP log exporter.
pub fn init_logger(sdk_logger_provider: SdkLoggerProvider, component: &str) {
    let is_dev = env_flag("DEV_MODE");
    let enable_file_log = env_flag("ENABLE_FILE_LOG");

    let console_layer = fmt::layer()
        .pretty()
        .with_thread_names(true)
        .with_ansi(true)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let file_layer = if enable_file_log {
        let log_dir = if is_dev { "./logs" } else { "/var/log/app" };
        let appender = RollingFileAppender::new(
            Rotation::DAILY,
            log_dir,
            format!("marketplace_{component}.log"),
        );
        let (writer, guard) = non_blocking(appender);
        // the guard must outlive the process for the writer to flush
        std::mem::forget(guard);

        Some(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .json()
                .with_filter(EnvFilter::new("info")),
        )
    } else {
        None
    };

    let mut otel_filter = EnvFilter::new("info");
    for noisy in ["hyper", "opentelemetry", "tonic", "h2", "reqwest"] {
        if let Ok(directive) = format!("{noisy}=off").parse() {
            otel_filter = otel_filter.add_directive(directive);
        }
    }

    let otel_layer = OpenTelemetryTracingBridge::new(&sdk_logger_provider).with_filter(otel_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(otel_layer)
        .init();
}
