//! Layer `tracing` qui alimente le buffer circulaire et le canal SSE

use std::fmt;
use std::time::SystemTime;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use super::{LogEntry, LogState};

/// Capture chaque évènement de log dans le [`LogState`] partagé
pub struct SseLayer {
    state: LogState,
}

impl SseLayer {
    pub fn new(state: LogState) -> Self {
        Self { state }
    }
}

impl<S: Subscriber> Layer<S> for SseLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        self.state.push(LogEntry {
            timestamp: SystemTime::now(),
            level: meta.level().to_string(),
            target: meta.target().to_string(),
            message: visitor.finish(),
        });
    }
}

/// Collecte le champ `message` et les champs additionnels d'un évènement
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }

        let fields = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");

        if self.message.is_empty() {
            fields
        } else {
            format!("{} {}", self.message, fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_message_only() {
        let visitor = MessageVisitor {
            message: "hello".to_string(),
            fields: vec![],
        };
        assert_eq!(visitor.finish(), "hello");
    }

    #[test]
    fn test_finish_appends_extra_fields() {
        let visitor = MessageVisitor {
            message: "loaded".to_string(),
            fields: vec![("path".to_string(), "playlist.m3u".to_string())],
        };
        assert_eq!(visitor.finish(), "loaded path=playlist.m3u");
    }

    #[test]
    fn test_finish_fields_without_message() {
        let visitor = MessageVisitor {
            message: String::new(),
            fields: vec![("code".to_string(), "1".to_string())],
        };
        assert_eq!(visitor.finish(), "code=1");
    }
}
