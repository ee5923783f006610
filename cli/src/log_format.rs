//! File log formatter that tags each line with the request it belongs to.
//!
//! Concurrent requests in `quill serve` interleave in the log file; the `req=` tag (id of the
//! outermost span) and the span path let lines of one request be grepped together.

use std::fmt;

use tracing_core::Subscriber;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// Plain-text format: `TIMESTAMP LEVEL req=ID root>child target: fields`.
///
/// Events outside any span are written as `TIMESTAMP LEVEL target: fields`.
#[derive(Default)]
pub struct RequestTagged {
    timer: SystemTime,
}

impl RequestTagged {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, N> FormatEvent<S, N> for RequestTagged
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing_core::Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        write!(writer, " {:>5}", event.metadata().level())?;

        if let Some(scope) = ctx.event_scope() {
            let spans: Vec<_> = scope.from_root().collect();
            if let Some(root) = spans.first() {
                write!(writer, " req={}", root.id().into_u64())?;
            }
            let path = spans
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(">");
            write!(writer, " {}", path)?;
        }

        write!(writer, " {}: ", event.metadata().target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
