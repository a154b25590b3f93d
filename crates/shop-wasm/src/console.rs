//! Forwards `tracing` events to the browser console.

use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Minimal subscriber: events only, spans are ignored
pub struct ConsoleSubscriber {
    max_level: Level,
    next_span: AtomicU64,
}

impl ConsoleSubscriber {
    pub fn new(max_level: Level) -> Self {
        Self {
            max_level,
            next_span: AtomicU64::new(1),
        }
    }
}

/// Install the console subscriber once. Later calls are no-ops.
pub fn install(max_level: Level) {
    let _ = tracing::subscriber::set_global_default(ConsoleSubscriber::new(max_level));
}

impl Subscriber for ConsoleSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= &self.max_level
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(self.next_span.fetch_add(1, Ordering::Relaxed))
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let metadata = event.metadata();
        let mut line = LineVisitor::default();
        event.record(&mut line);

        let text = JsValue::from_str(&format_line(
            *metadata.level(),
            metadata.target(),
            &line.message,
            &line.fields,
        ));
        let level = *metadata.level();
        if level == Level::ERROR {
            console::error_1(&text);
        } else if level == Level::WARN {
            console::warn_1(&text);
        } else if level == Level::INFO {
            console::info_1(&text);
        } else {
            console::debug_1(&text);
        }
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

fn format_line(level: Level, target: &str, message: &str, fields: &str) -> String {
    format!("{:>5} {target}: {message}{fields}", level.as_str())
}
