//! Plain-text event formatter that tags each line with its run.
//!
//! Every planning run opens a `planning_run` span carrying `run_id` and `destination`.
//! File logs of concurrent or back-to-back runs are correlated by the root span's id and
//! fields, which this formatter writes before the level.

use std::fmt;

use tracing_core::Subscriber;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// `TIMESTAMP [trace_id=X span_id=Y {root fields}] LEVEL target: fields`
///
/// The bracketed part is written only when the event happens inside a span.
pub struct RunTaggedFormat {
    timer: SystemTime,
    with_target: bool,
}

impl Default for RunTaggedFormat {
    fn default() -> Self {
        Self {
            timer: SystemTime::default(),
            with_target: true,
        }
    }
}

impl RunTaggedFormat {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn with_target(mut self, on: bool) -> Self {
        self.with_target = on;
        self
    }
}

impl<S, N> FormatEvent<S, N> for RunTaggedFormat
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
        if let Some(span) = ctx.parent_span() {
            let span_id = span.id().into_u64();
            let root = span.scope().from_root().next();
            let trace_id = root.as_ref().map(|r| r.id().into_u64()).unwrap_or(span_id);
            write!(writer, " trace_id={} span_id={}", trace_id, span_id)?;
            if let Some(root) = root {
                let ext = root.extensions();
                if let Some(fields) = ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, " {{{}}}", fields)?;
                    }
                }
            }
        }

        write!(writer, " {}:", event.metadata().level())?;
        if self.with_target {
            write!(writer, " {}:", event.metadata().target())?;
        }
        write!(writer, " ")?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
