// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-JSON-object-per-line record formatting.
//!
//! Each event becomes `{"time":..,"level":..,"msg":..,<static>,<fields>}`
//! followed by a newline. Fields of enclosing spans are included, outermost
//! first, with event fields taking precedence. A field that collides with a
//! reserved or static key is kept under `fields.<name>`.
//!
//! The finished line is handed to the writer in a single `write_all`, which
//! the sink turns into a single locked write.

use std::fmt::{self, Write as _};
use std::io::Write as _;

use chrono::Local;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{span, Event, Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

pub const TIME_KEY: &str = "time";
pub const LEVEL_KEY: &str = "level";
pub const MESSAGE_KEY: &str = "msg";
pub const HOST_KEY: &str = "host";

/// `tracing-subscriber` layer rendering events as JSON lines.
pub struct JsonLayer<W> {
    make_writer: W,
    timestamp_format: String,
    static_fields: Map<String, Value>,
}

impl<W> JsonLayer<W> {
    /// `timestamp_format` is a chrono strftime layout; an unusable layout
    /// falls back to RFC 3339.
    pub fn new(make_writer: W, timestamp_format: impl Into<String>) -> Self {
        Self {
            make_writer,
            timestamp_format: timestamp_format.into(),
            static_fields: Map::new(),
        }
    }

    /// Add a field emitted with every record.
    pub fn with_static_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.static_fields.insert(key.into(), value.into());
        self
    }

    fn timestamp(&self) -> String {
        let now = Local::now();
        let mut out = String::new();
        if write!(out, "{}", now.format(&self.timestamp_format)).is_err() {
            return now.to_rfc3339();
        }
        out
    }

    fn render(&self, level: &Level, fields: Map<String, Value>) -> Option<Vec<u8>> {
        let mut record = Map::new();
        record.insert(TIME_KEY.to_string(), Value::String(self.timestamp()));
        record.insert(
            LEVEL_KEY.to_string(),
            Value::String(level.as_str().to_ascii_lowercase()),
        );
        for (key, value) in &self.static_fields {
            record.insert(key.clone(), value.clone());
        }
        for (key, value) in fields {
            let key = if record.contains_key(&key) {
                format!("fields.{key}")
            } else {
                key
            };
            record.insert(key, value);
        }

        let mut line = serde_json::to_vec(&Value::Object(record)).ok()?;
        line.push(b'\n');
        Some(line)
    }
}

/// Fields recorded on a span, stored in its extensions.
struct SpanFields(Map<String, Value>);

struct JsonVisitor<'a>(&'a mut Map<String, Value>);

impl JsonVisitor<'_> {
    fn insert(&mut self, field: &Field, value: Value) {
        let name = match field.name() {
            "message" => MESSAGE_KEY,
            name => name,
        };
        self.0.insert(name.to_string(), value);
    }
}

impl Visit for JsonVisitor<'_> {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        self.insert(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::from(format!("{value:?}")));
    }
}

impl<S, W> Layer<S> for JsonLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = Map::new();
        attrs.record(&mut JsonVisitor(&mut fields));
        span.extensions_mut().insert(SpanFields(fields));
    }

    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(SpanFields(fields)) = extensions.get_mut::<SpanFields>() {
            values.record(&mut JsonVisitor(fields));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = Map::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(SpanFields(span_fields)) = span.extensions().get::<SpanFields>() {
                    fields.extend(span_fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }
        event.record(&mut JsonVisitor(&mut fields));

        let Some(line) = self.render(event.metadata().level(), fields) else {
            return;
        };
        let mut writer = self.make_writer.make_writer_for(event.metadata());
        if let Err(e) = writer.write_all(&line) {
            // The sink is the log; stderr is the only place left to report this
            eprintln!("tidelog: failed to write log record: {e}");
        }
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
