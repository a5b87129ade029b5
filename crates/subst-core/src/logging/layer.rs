//! Tracing layer that writes one JSON object per event.
//!
//! Logs go to stderr; stdout carries only the command payload.

use std::io::{self, Write};
use std::sync::Mutex;

use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::events::LogEvent;

/// Correlation fields picked up from enclosing spans.
#[derive(Debug, Clone, Default)]
struct SpanContext {
    run_id: Option<String>,
    host_id: Option<String>,
    stage: Option<String>,
}

impl SpanContext {
    fn fill_from(&mut self, other: &SpanContext) {
        if self.run_id.is_none() {
            self.run_id.clone_from(&other.run_id);
        }
        if self.host_id.is_none() {
            self.host_id.clone_from(&other.host_id);
        }
        if self.stage.is_none() {
            self.stage.clone_from(&other.stage);
        }
    }

    /// Returns false when `name` is not a correlation field.
    fn set(&mut self, name: &str, value: String) -> bool {
        match name {
            "run_id" => self.run_id = Some(value),
            "host_id" => self.host_id = Some(value),
            "stage" => self.stage = Some(value),
            _ => return false,
        }
        true
    }
}

/// Collects event fields. Correlation fields logged directly on the event
/// (as `log_event!` does) are lifted to the top level.
struct JsonFieldVisitor {
    context: SpanContext,
    fields: serde_json::Map<String, serde_json::Value>,
    message: Option<String>,
}

impl JsonFieldVisitor {
    fn new() -> Self {
        JsonFieldVisitor {
            context: SpanContext::default(),
            fields: serde_json::Map::new(),
            message: None,
        }
    }

    fn insert_text(&mut self, name: &str, value: String) {
        if name == "message" {
            self.message = Some(value);
        } else if !self.context.set(name, value.clone()) {
            self.fields
                .insert(name.to_string(), serde_json::Value::String(value));
        }
    }
}

impl tracing::field::Visit for JsonFieldVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.insert_text(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.insert_text(field.name(), format!("{:?}", value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        // NaN and infinities have no JSON form; keep them readable
        let v = serde_json::Number::from_f64(value)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(value.to_string()));
        self.fields.insert(field.name().to_string(), v);
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::Bool(value));
    }
}

struct SpanContextVisitor {
    context: SpanContext,
}

impl tracing::field::Visit for SpanContextVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.context.set(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.context.set(field.name(), format!("{:?}", value));
    }
}

/// JSONL tracing layer, stderr by default.
pub struct JsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
}

impl JsonlLayer<io::Stderr> {
    pub fn stderr() -> Self {
        JsonlLayer {
            writer: Mutex::new(io::stderr()),
        }
    }
}

impl<W: Write> JsonlLayer<W> {
    pub fn new(writer: W) -> Self {
        JsonlLayer {
            writer: Mutex::new(writer),
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = SpanContextVisitor {
            context: SpanContext::default(),
        };
        attrs.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(visitor.context);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut visitor = JsonFieldVisitor::new();
        event.record(&mut visitor);

        // Event fields win; innermost span fills the rest.
        let mut context = visitor.context;
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope {
                if let Some(span_ctx) = span.extensions().get::<SpanContext>() {
                    context.fill_from(span_ctx);
                }
            }
        }

        let mut line = LogEvent::new(
            (*event.metadata().level()).into(),
            event.metadata().target(),
        );
        line.run_id = context.run_id;
        line.host_id = context.host_id;
        line.stage = context.stage;
        line.message = visitor.message;
        line.fields = visitor.fields;

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line.to_jsonl());
        }
    }
}
