// Centralized logging setup for tracing with runtime log level, file logging, and structured output
use std::env;
use std::fs;
use std::sync::OnceLock; // For global file guard
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{Id, Subscriber, debug, field::Field, field::Visit, span};
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Context, Layer, SubscriberExt},
    util::SubscriberInitExt,
};

static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to install global subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

pub fn init_logging(bin_name: String) -> Result<(), LoggingError> {
    // Load log levels for console and file from env
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());

    // Load file log flag from env
    let log_to_file = env::var("LOG_TO_FILE").unwrap_or_else(|_| "false".to_string()) == "true";

    // Filter globally to "warn", filter our own crate to the specified levels
    let env_filter_console = EnvFilter::try_new(format!("warn,conservador_fleet={console_log_level},{bin_name}={console_log_level}"))?;
    let env_filter_file = EnvFilter::try_new(format!("warn,conservador_fleet={file_log_level},{bin_name}={file_log_level}"))?;

    // Console layer: always enabled, pretty human-readable logs
    let console_layer = fmt::Layer::new().pretty().with_filter(env_filter_console);

    let timing_layer = SpanTimingLayer;

    if log_to_file {
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let log_dir = std::path::Path::new("logs");
        fs::create_dir_all(log_dir)?;
        let log_file_name = format!("{bin_name}_{timestamp}.log");

        let file_appender = tracing_appender::rolling::never(log_dir, log_file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        FILE_GUARD.set(guard).ok();

        // File layer: structured JSON logs with UTC timestamps
        let file_layer = fmt::Layer::new()
            .json()
            .with_writer(non_blocking)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(env_filter_file);

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .with(timing_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(console_layer)
            .with(timing_layer)
            .try_init()?;
    }

    Ok(())
}

// Tracks busy/idle time for spans declared with `on_close = true`
struct SpanTimingLayer;

struct StartInstant(Instant);
struct LastInstant(Instant);
struct BusyTime(Duration);
struct IdleTime(Duration);

struct OnCloseVisitor<'a> {
    on_close: &'a mut bool,
}

impl Visit for OnCloseVisitor<'_> {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "on_close" {
            *self.on_close = value;
        }
    }
    fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
}

impl<S> Layer<S> for SpanTimingLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut on_close = false;
        attrs.record(&mut OnCloseVisitor { on_close: &mut on_close });
        if on_close {
            let mut extensions = span.extensions_mut();
            let now = Instant::now();
            extensions.insert(StartInstant(now));
            extensions.insert(LastInstant(now));
            extensions.insert(BusyTime(Duration::ZERO));
            extensions.insert(IdleTime(Duration::ZERO));
        }
    }

    fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let mut exts = span.extensions_mut();
            if exts.get_mut::<StartInstant>().is_none() {
                return;
            }
            // Time since the last exit was spent idle
            let last_instant = exts.remove::<LastInstant>().map(|li| li.0).unwrap_or_else(Instant::now);
            let mut idle_time = exts.remove::<IdleTime>().map(|it| it.0).unwrap_or(Duration::ZERO);
            idle_time += last_instant.elapsed();
            exts.insert(IdleTime(idle_time));
            exts.insert(LastInstant(Instant::now()));
        }
    }

    fn on_exit(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let mut exts = span.extensions_mut();
            if exts.get_mut::<StartInstant>().is_none() {
                return;
            }
            let last_instant = exts.remove::<LastInstant>().map(|li| li.0).unwrap_or_else(Instant::now);
            let mut busy_time = exts.remove::<BusyTime>().map(|bt| bt.0).unwrap_or(Duration::ZERO);
            busy_time += last_instant.elapsed();
            exts.insert(BusyTime(busy_time));
            exts.insert(LastInstant(Instant::now()));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(&id) {
            let mut exts = span.extensions_mut();
            if let Some(StartInstant(start)) = exts.remove::<StartInstant>() {
                let total_duration = start.elapsed();
                let busy_time = exts.remove::<BusyTime>().map(|bt| bt.0).unwrap_or(Duration::ZERO);
                let idle_time = exts.remove::<IdleTime>().map(|it| it.0).unwrap_or(Duration::ZERO);
                debug!(
                    span = span.name(),
                    busy_time = ?busy_time,
                    idle_time = ?idle_time,
                    total_time = ?total_duration,
                    "span closed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing::{Event, info_span};
    use tracing_subscriber::registry::LookupSpan;

    #[derive(Clone, Default)]
    struct RecordedMessages(Arc<Mutex<Vec<String>>>);

    struct MessageVisitor<'a>(&'a mut Option<String>);

    impl Visit for MessageVisitor<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                *self.0 = Some(format!("{value:?}"));
            }
        }
    }

    impl<S> Layer<S> for RecordedMessages
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut message = None;
            event.record(&mut MessageVisitor(&mut message));
            if let Some(message) = message {
                self.0.lock().unwrap().push(message);
            }
        }
    }

    #[test]
    fn timed_spans_report_on_close() {
        let recorded = RecordedMessages::default();
        let subscriber = tracing_subscriber::registry().with(SpanTimingLayer).with(recorded.clone());

        tracing::subscriber::with_default(subscriber, || {
            let timed = info_span!("timed", on_close = true);
            for _ in 0..2 {
                let _entered = timed.enter();
            }
            drop(timed);

            let untimed = info_span!("untimed");
            let _entered = untimed.enter();
        });

        let messages = recorded.0.lock().unwrap().clone();
        assert_eq!(messages, vec!["span closed".to_string()]);
    }
}
